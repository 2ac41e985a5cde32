//! SMTP delivery through lettre.

use std::str::FromStr;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use scribe_core::ports::{MailError, Mailer, OutgoingMail};

/// Implicit-TLS submission port; every other port uses STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Mailer backed by an async SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let relay = if config.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        };
        let builder = relay
            .map_err(|e| MailError::Transport(format!("invalid smtp host {}: {e}", config.host)))?;

        let mut builder = builder.port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        tracing::info!(host = %config.host, port = config.port, "SMTP mailer configured");
        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    Mailbox::from_str(address).map_err(|e| MailError::Address(format!("{address}: {e}")))
}

/// Build a plain-text lettre message.
fn build_message(mail: &OutgoingMail) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(mailbox(&mail.from)?)
        .subject(mail.subject.as_str());
    for to in &mail.to {
        builder = builder.to(mailbox(to)?);
    }

    builder
        .body(mail.body.clone())
        .map_err(|e| MailError::Message(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = build_message(&mail)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        tracing::info!(to = ?mail.to, "Mail delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(from: &str, to: &str) -> OutgoingMail {
        OutgoingMail {
            subject: "Ada recommends for you Ownership".into(),
            body: "Read Ownership".into(),
            from: from.into(),
            to: vec![to.into()],
        }
    }

    #[test]
    fn test_build_message() {
        let message = build_message(&mail("blog@example.com", "bob@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Ada recommends for you Ownership"));
        assert!(raw.contains("To: bob@example.com"));
    }

    #[test]
    fn test_bad_recipient_is_an_address_error() {
        let result = build_message(&mail("blog@example.com", "not an address"));
        assert!(matches!(result, Err(MailError::Address(_))));
    }

    #[tokio::test]
    async fn test_new_accepts_plain_relay() {
        let config = SmtpConfig {
            host: "localhost".into(),
            port: 2525,
            username: None,
            password: None,
        };
        assert!(SmtpMailer::new(&config).is_ok());
    }
}

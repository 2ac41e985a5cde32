//! In-memory outbox - used when no SMTP relay is configured, and in tests.

use async_trait::async_trait;
use tokio::sync::RwLock;

use scribe_core::ports::{MailError, Mailer, OutgoingMail};

/// Mailer that keeps every message instead of delivering it.
///
/// Messages are logged at info level so a development server still shows
/// what would have been sent.
pub struct InMemoryMailer {
    outbox: RwLock<Vec<OutgoingMail>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self {
            outbox: RwLock::new(Vec::new()),
        }
    }

    /// Messages sent so far, oldest first.
    pub async fn sent(&self) -> Vec<OutgoingMail> {
        self.outbox.read().await.clone()
    }
}

impl Default for InMemoryMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        if mail.to.is_empty() {
            return Err(MailError::Address("no recipient".to_string()));
        }

        tracing::info!(
            to = ?mail.to,
            subject = %mail.subject,
            "Mail kept in memory outbox"
        );
        self.outbox.write().await.push(mail);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(to: &[&str]) -> OutgoingMail {
        OutgoingMail {
            subject: "Hi".into(),
            body: "Body".into(),
            from: "blog@example.com".into(),
            to: to.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_keeps_sent_mail() {
        let mailer = InMemoryMailer::new();
        mailer.send(mail(&["ada@example.com"])).await.unwrap();

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["ada@example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_rejects_mail_without_recipient() {
        let mailer = InMemoryMailer::new();
        let result = mailer.send(mail(&[])).await;

        assert!(matches!(result, Err(MailError::Address(_))));
        assert!(mailer.sent().await.is_empty());
    }
}

//! Mail transports - SMTP and an in-memory outbox.

mod memory;

pub use memory::InMemoryMailer;

#[cfg(feature = "smtp")]
mod smtp;
#[cfg(feature = "smtp")]
pub use smtp::{SmtpConfig, SmtpMailer};

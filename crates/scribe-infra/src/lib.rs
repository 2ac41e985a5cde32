//! # Scribe Infrastructure
//!
//! Concrete implementations of the ports defined in `scribe-core`.
//! This crate contains the database repositories and mail transports.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `smtp` - SMTP mail delivery via lettre

pub mod database;
pub mod mail;

// Re-exports - In-Memory
pub use database::InMemoryBlogStore;
pub use mail::InMemoryMailer;

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;

#[cfg(feature = "smtp")]
pub use mail::{SmtpConfig, SmtpMailer};

//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use scribe_core::feed::FeedChannel;
use scribe_core::pagination::DEFAULT_PAGE_SIZE;

#[cfg(feature = "postgres")]
use scribe_infra::database::DatabaseConfig;
#[cfg(feature = "smtp")]
use scribe_infra::SmtpConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Posts per list page.
    pub page_size: u64,
    /// Address share mails are sent from.
    pub sender: String,
    pub channel: FeedChannel,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    #[cfg(feature = "smtp")]
    pub smtp: Option<SmtpConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            page_size: DEFAULT_PAGE_SIZE,
            sender: "noreply@localhost".to_string(),
            channel: FeedChannel::default(),
            #[cfg(feature = "postgres")]
            database: None,
            #[cfg(feature = "smtp")]
            smtp: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port),
            page_size: parse_var("BLOG_PAGE_SIZE", defaults.page_size).max(1),
            sender: env::var("EMAIL_HOST_USER").unwrap_or(defaults.sender),
            channel: FeedChannel {
                title: env::var("SITE_TITLE").unwrap_or(defaults.channel.title),
                link: defaults.channel.link,
                description: env::var("SITE_DESCRIPTION")
                    .unwrap_or(defaults.channel.description),
            },
            #[cfg(feature = "postgres")]
            database: env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
                url,
                max_connections: parse_var("DB_MAX_CONNECTIONS", 100),
                min_connections: parse_var("DB_MIN_CONNECTIONS", 10),
            }),
            #[cfg(feature = "smtp")]
            smtp: env::var("SMTP_HOST").ok().map(|host| SmtpConfig {
                host,
                port: parse_var("SMTP_PORT", 587),
                username: env::var("SMTP_USERNAME").ok(),
                password: env::var("SMTP_PASSWORD").ok(),
            }),
        }
    }
}

/// Read and parse a variable, keeping `default` when it is unset or invalid.
fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

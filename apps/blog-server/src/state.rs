//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::feed::LatestPostsFeed;
use scribe_core::ports::{CommentRepository, Mailer, PostRepository, TagRepository};
use scribe_core::{DiscoveryLimits, Interactions, PostDiscovery};
use scribe_infra::{InMemoryBlogStore, InMemoryMailer};

#[cfg(feature = "postgres")]
use scribe_infra::database::{
    DatabaseConnections, PostgresCommentRepository, PostgresPostRepository,
    PostgresTagRepository,
};
#[cfg(feature = "smtp")]
use scribe_infra::SmtpMailer;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub discovery: Arc<PostDiscovery>,
    pub interactions: Arc<Interactions>,
    pub feed: Arc<LatestPostsFeed>,
}

/// The three repositories, backed by one store.
struct Repositories {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    fn in_memory(store: Arc<InMemoryBlogStore>) -> Self {
        Self {
            posts: store.clone(),
            tags: store.clone(),
            comments: store,
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = Self::repositories(config).await;
        let mailer = Self::mailer(config);

        tracing::info!("Application state initialized");
        Self::assemble(repos, mailer, config)
    }

    /// State over an in-memory store and outbox.
    pub fn in_memory(
        store: Arc<InMemoryBlogStore>,
        mailer: Arc<dyn Mailer>,
        config: &AppConfig,
    ) -> Self {
        Self::assemble(Repositories::in_memory(store), mailer, config)
    }

    fn assemble(repos: Repositories, mailer: Arc<dyn Mailer>, config: &AppConfig) -> Self {
        let limits = DiscoveryLimits {
            page_size: config.page_size,
            ..DiscoveryLimits::default()
        };
        let discovery = Arc::new(
            PostDiscovery::new(repos.posts.clone(), repos.tags, repos.comments.clone())
                .with_limits(limits),
        );
        let interactions = Arc::new(Interactions::new(
            repos.posts,
            repos.comments,
            mailer,
            config.sender.clone(),
        ));
        let feed = Arc::new(LatestPostsFeed::new(
            discovery.clone(),
            config.channel.clone(),
        ));

        Self {
            discovery,
            interactions,
            feed,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Repositories::in_memory(Arc::new(InMemoryBlogStore::new()));
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => Repositories {
                posts: Arc::new(PostgresPostRepository::new(connections.main.clone())),
                tags: Arc::new(PostgresTagRepository::new(connections.main.clone())),
                comments: Arc::new(PostgresCommentRepository::new(connections.main)),
            },
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Repositories::in_memory(Arc::new(InMemoryBlogStore::new()))
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> Repositories {
        tracing::info!("Running without postgres feature - using in-memory store");
        Repositories::in_memory(Arc::new(InMemoryBlogStore::new()))
    }

    #[cfg(feature = "smtp")]
    fn mailer(config: &AppConfig) -> Arc<dyn Mailer> {
        let Some(smtp) = &config.smtp else {
            tracing::warn!("SMTP_HOST not set. Shared posts go to the in-memory outbox.");
            return Arc::new(InMemoryMailer::new());
        };

        match SmtpMailer::new(smtp) {
            Ok(mailer) => Arc::new(mailer),
            Err(e) => {
                tracing::error!("Failed to configure SMTP: {}. Using in-memory outbox.", e);
                Arc::new(InMemoryMailer::new())
            }
        }
    }

    #[cfg(not(feature = "smtp"))]
    fn mailer(_config: &AppConfig) -> Arc<dyn Mailer> {
        tracing::info!("Running without smtp feature - using in-memory outbox");
        Arc::new(InMemoryMailer::new())
    }
}

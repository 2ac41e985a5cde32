//! Syndication feed of the latest posts.
//!
//! This is the protocol a serializer walks: channel metadata, then
//! `items()` and one accessor per item field. The wire format lives with the
//! HTTP layer.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::Post;
use crate::error::DomainError;
use crate::markdown;
use crate::services::PostDiscovery;

/// Words kept in an item description.
pub const DESCRIPTION_WORDS: usize = 30;

/// Channel-level metadata.
#[derive(Debug, Clone)]
pub struct FeedChannel {
    pub title: String,
    pub link: String,
    pub description: String,
}

impl Default for FeedChannel {
    fn default() -> Self {
        Self {
            title: "My blog".to_string(),
            link: "/blog".to_string(),
            description: "New posts of my blog.".to_string(),
        }
    }
}

/// Feed of the most recently published posts.
pub struct LatestPostsFeed {
    discovery: Arc<PostDiscovery>,
    channel: FeedChannel,
}

impl LatestPostsFeed {
    pub fn new(discovery: Arc<PostDiscovery>, channel: FeedChannel) -> Self {
        Self { discovery, channel }
    }

    pub fn channel(&self) -> &FeedChannel {
        &self.channel
    }

    pub async fn items(&self) -> Result<Vec<Post>, DomainError> {
        let limit = self.discovery.limits().feed;
        self.discovery.latest_posts(limit).await
    }

    pub fn item_title<'a>(&self, item: &'a Post) -> &'a str {
        &item.title
    }

    /// Rendered body, cut to [`DESCRIPTION_WORDS`] words.
    pub fn item_description(&self, item: &Post) -> String {
        markdown::to_html_truncated(&item.body, DESCRIPTION_WORDS)
    }

    pub fn item_pubdate(&self, item: &Post) -> DateTime<Utc> {
        item.publish
    }

    pub fn item_link(&self, item: &Post) -> String {
        item.absolute_path()
    }
}

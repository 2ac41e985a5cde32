//! Published-scoped post queries.
//!
//! `PostQuery` is the only way to ask a repository for posts, and it can only
//! be built already restricted to what readers may see: status published and
//! publish timestamp not in the future. Callers then narrow it down.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Post, PostStatus};

/// Ordering on the publish timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublishOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Filter, order and window over the published posts.
#[derive(Debug, Clone, PartialEq)]
pub struct PostQuery {
    now: DateTime<Utc>,
    pub id: Option<Uuid>,
    pub slug: Option<String>,
    pub published_on: Option<NaiveDate>,
    pub tag_id: Option<Uuid>,
    pub exclude_id: Option<Uuid>,
    pub order: PublishOrder,
    pub limit: Option<u64>,
    pub offset: u64,
}

impl PostQuery {
    /// Posts visible to readers right now.
    pub fn published() -> Self {
        Self::published_at(Utc::now())
    }

    /// Posts visible to readers at `now`.
    pub fn published_at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            id: None,
            slug: None,
            published_on: None,
            tag_id: None,
            exclude_id: None,
            order: PublishOrder::NewestFirst,
            limit: None,
            offset: 0,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Restrict to posts whose publish timestamp falls on `date` (UTC).
    pub fn published_on(mut self, date: NaiveDate) -> Self {
        self.published_on = Some(date);
        self
    }

    pub fn with_tag(mut self, tag_id: Uuid) -> Self {
        self.tag_id = Some(tag_id);
        self
    }

    pub fn excluding(mut self, id: Uuid) -> Self {
        self.exclude_id = Some(id);
        self
    }

    pub fn order(mut self, order: PublishOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Drop ordering and window, keeping only the filter. Used for counts.
    pub fn unwindowed(mut self) -> Self {
        self.limit = None;
        self.offset = 0;
        self
    }

    /// Evaluate the filter against a post and the ids of its tags.
    pub fn matches(&self, post: &Post, tag_ids: &HashSet<Uuid>) -> bool {
        if post.status != PostStatus::Published || post.publish > self.now {
            return false;
        }
        if self.id.is_some_and(|id| id != post.id) {
            return false;
        }
        if self.exclude_id == Some(post.id) {
            return false;
        }
        if self.slug.as_deref().is_some_and(|slug| slug != post.slug) {
            return false;
        }
        if self
            .published_on
            .is_some_and(|date| date != post.publish.date_naive())
        {
            return false;
        }
        if self.tag_id.is_some_and(|tag| !tag_ids.contains(&tag)) {
            return false;
        }
        true
    }

    /// Sort matching posts by publish timestamp, then id, and apply the window.
    pub fn arrange(&self, mut posts: Vec<Post>) -> Vec<Post> {
        posts.sort_by(|a, b| (a.publish, a.id).cmp(&(b.publish, b.id)));
        if self.order == PublishOrder::NewestFirst {
            posts.reverse();
        }
        let window = posts.into_iter().skip(self.offset as usize);
        match self.limit {
            Some(limit) => window.take(limit as usize).collect(),
            None => window.collect(),
        }
    }
}

//! Post discovery: listing, detail, recommendations and search.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Comment, Post, Tag};
use crate::error::DomainError;
use crate::pagination::{DEFAULT_PAGE_SIZE, Page, Paginator};
use crate::ports::{CommentRepository, PostRepository, TagRepository};
use crate::query::PostQuery;
use crate::ranking::{self, CommentedPost, SEARCH_THRESHOLD, SearchHit};

use super::{first_published, published_by_id};

/// Result sizes of the discovery operations.
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryLimits {
    pub page_size: u64,
    pub similar: usize,
    pub most_commented: usize,
    pub latest: usize,
    pub feed: usize,
}

impl Default for DiscoveryLimits {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            similar: 4,
            most_commented: 5,
            latest: 3,
            feed: 5,
        }
    }
}

/// One page of the post list, with the tag it was filtered by.
#[derive(Debug, Clone)]
pub struct PostListing {
    pub tag: Option<Tag>,
    pub page: Page<Post>,
}

/// Everything the detail page shows.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub tags: Vec<Tag>,
    pub comments: Vec<Comment>,
    pub similar: Vec<Post>,
}

/// The post query planner.
pub struct PostDiscovery {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
    limits: DiscoveryLimits,
}

impl PostDiscovery {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            posts,
            tags,
            comments,
            limits: DiscoveryLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: DiscoveryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> DiscoveryLimits {
        self.limits
    }

    /// Newest posts first, optionally by tag, one page at a time.
    ///
    /// `page` is the raw query value; see [`Paginator::window`].
    pub async fn list_posts(
        &self,
        tag_slug: Option<&str>,
        page: Option<&str>,
    ) -> Result<PostListing, DomainError> {
        let mut query = PostQuery::published();

        let tag = match tag_slug.filter(|s| !s.is_empty()) {
            Some(slug) => {
                let tag = self
                    .tags
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| DomainError::not_found("tag", slug))?;
                query = query.with_tag(tag.id);
                Some(tag)
            }
            None => None,
        };

        let total = self.posts.count(&query).await?;
        let window = Paginator::new(self.limits.page_size, total).window(page);
        let items = self
            .posts
            .find(&query.offset(window.offset).limit(window.limit))
            .await?;

        tracing::debug!(
            tag = tag_slug,
            page = window.number,
            num_pages = window.num_pages,
            "Listed posts"
        );

        Ok(PostListing {
            tag,
            page: Page::new(items, window, total),
        })
    }

    /// A published post by id.
    pub async fn published_post(&self, id: Uuid) -> Result<Post, DomainError> {
        published_by_id(self.posts.as_ref(), id).await
    }

    /// The published post with `slug` published on the given UTC day.
    pub async fn post_detail(
        &self,
        year: i32,
        month: u32,
        day: u32,
        slug: &str,
    ) -> Result<PostDetail, DomainError> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DomainError::not_found("post", slug))?;

        let post = first_published(
            self.posts.as_ref(),
            PostQuery::published().with_slug(slug).published_on(date),
            slug,
        )
        .await?;

        let tags = self
            .tags
            .tags_for_posts(&[post.id])
            .await?
            .remove(&post.id)
            .unwrap_or_default();
        let comments = self.comments.active_for_post(post.id).await?;
        let similar = self.similar_posts(&post, self.limits.similar).await?;

        Ok(PostDetail {
            post,
            tags,
            comments,
            similar,
        })
    }

    /// Posts sharing tags with `post`, most shared tags first.
    pub async fn similar_posts(&self, post: &Post, limit: usize) -> Result<Vec<Post>, DomainError> {
        let tag_ids: Vec<Uuid> = self
            .tags
            .tags_for_posts(&[post.id])
            .await?
            .remove(&post.id)
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.id)
            .collect();

        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .posts
            .find_similar(
                &PostQuery::published().excluding(post.id),
                &tag_ids,
                limit as u64,
            )
            .await?)
    }

    /// Posts with the most active comments, older first on ties.
    pub async fn most_commented(&self, limit: usize) -> Result<Vec<CommentedPost>, DomainError> {
        Ok(self
            .posts
            .most_commented(&PostQuery::published(), limit as u64)
            .await?)
    }

    /// The most recently published posts.
    pub async fn latest_posts(&self, limit: usize) -> Result<Vec<Post>, DomainError> {
        Ok(self
            .posts
            .find(&PostQuery::published().limit(limit as u64))
            .await?)
    }

    /// Number of published posts.
    pub async fn total_posts(&self) -> Result<u64, DomainError> {
        Ok(self.posts.count(&PostQuery::published()).await?)
    }

    /// Fuzzy title search. A missing or blank query finds nothing.
    pub async fn search_posts(&self, text: Option<&str>) -> Result<Vec<SearchHit>, DomainError> {
        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(Vec::new());
        };

        let hits = self
            .posts
            .title_similarity(&PostQuery::published(), text, SEARCH_THRESHOLD)
            .await?
            .into_iter()
            .map(|(post, similarity)| SearchHit { post, similarity })
            .collect();

        let ranked = ranking::rank_search(hits);
        tracing::debug!(query = text, hits = ranked.len(), "Searched posts");
        Ok(ranked)
    }
}

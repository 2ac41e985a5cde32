//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tag as shown next to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagDto {
    pub slug: String,
    pub name: String,
}

/// A post in a list: everything but the full body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    /// Canonical detail page path.
    pub url: String,
    pub publish: DateTime<Utc>,
    /// Rendered body cut to a few dozen words.
    pub excerpt: String,
}

/// One page of a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDto<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// `GET /blog` and `GET /blog/tag/{slug}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<TagDto>,
    pub page: PageDto<PostSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDto {
    pub id: Uuid,
    pub name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// `GET /blog/{year}/{month}/{day}/{slug}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub url: String,
    pub publish: DateTime<Utc>,
    /// Body rendered from markdown.
    pub body_html: String,
    pub tags: Vec<TagDto>,
    pub comments: Vec<CommentDto>,
    pub similar_posts: Vec<PostSummary>,
}

/// A search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHitDto {
    pub post: PostSummary,
    pub similarity: f32,
}

/// `GET /blog/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: Option<String>,
    pub results: Vec<SearchHitDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentedPostDto {
    pub post: PostSummary,
    pub total_comments: u64,
}

/// Sidebar widgets: post count, latest and most commented posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetsResponse {
    pub total_posts: u64,
    pub latest_posts: Vec<PostSummary>,
    pub most_commented: Vec<CommentedPostDto>,
}

/// `GET /blog/{id}/share` - what the share form is about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareTargetResponse {
    /// Always false: nothing has been sent yet.
    pub sent: bool,
    pub post: PostSummary,
    pub fields: Vec<String>,
}

/// `POST /blog/{id}/share` on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    pub sent: bool,
    pub post: PostSummary,
    pub to: String,
}

/// `POST /blog/{id}/comment` on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreatedResponse {
    pub post_id: Uuid,
    pub comment: CommentDto,
}

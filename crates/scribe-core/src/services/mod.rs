//! Application services - the use cases the HTTP layer calls.

mod discovery;
mod interactions;

pub use discovery::{DiscoveryLimits, PostDetail, PostDiscovery, PostListing};
pub use interactions::Interactions;

use uuid::Uuid;

use crate::domain::Post;
use crate::error::DomainError;
use crate::ports::PostRepository;
use crate::query::PostQuery;

/// The first post of `query`, or not found under `key`.
async fn first_published(
    posts: &dyn PostRepository,
    query: PostQuery,
    key: impl ToString,
) -> Result<Post, DomainError> {
    posts
        .find(&query.limit(1))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| DomainError::not_found("post", key))
}

/// A post readers may see, by id.
async fn published_by_id(posts: &dyn PostRepository, id: Uuid) -> Result<Post, DomainError> {
    first_published(posts, PostQuery::published().with_id(id), id).await
}

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, PostStatus, Tag};
use crate::error::RepoError;
use crate::query::PostQuery;
use crate::ranking::CommentedPost;

/// Generic repository trait shared by every entity store.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID, whatever its state.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Store a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// Post repository. Reader-facing lookups always go through a `PostQuery`,
/// so the published scope cannot be forgotten.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts matching the query, ordered and windowed as it says.
    async fn find(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError>;

    /// Number of posts matching the query filter, ignoring its window.
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError>;

    /// Trigram similarity between `text` and the title of every post matching
    /// the query, keeping scores above `min_score`. Unordered.
    async fn title_similarity(
        &self,
        query: &PostQuery,
        text: &str,
        min_score: f32,
    ) -> Result<Vec<(Post, f32)>, RepoError>;

    /// Posts matching the query that carry any of `tag_ids`, most shared tags
    /// first, newest first on ties. At most `limit` posts.
    async fn find_similar(
        &self,
        query: &PostQuery,
        tag_ids: &[Uuid],
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    /// Posts matching the query by active comment count, highest first and
    /// oldest first on ties. Posts without comments count as zero.
    async fn most_commented(
        &self,
        query: &PostQuery,
        limit: u64,
    ) -> Result<Vec<CommentedPost>, RepoError>;

    /// Change a post's status. Either direction is allowed.
    async fn set_status(&self, id: Uuid, status: PostStatus) -> Result<(), RepoError>;
}

/// Tag repository - the tagging collaborator.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    /// Tags of each post. Posts without tags may be absent from the map.
    async fn tags_for_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Tag>>, RepoError>;

    /// Attach existing tags to a post. Already attached tags are ignored.
    async fn attach(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Active comments of a post, oldest first.
    async fn active_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// Activate or deactivate a comment.
    async fn set_active(&self, id: Uuid, active: bool) -> Result<(), RepoError>;
}

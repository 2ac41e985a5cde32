//! In-memory blog store - used when no database is configured, and in tests.
//!
//! One store backs all three repositories so that tag and comment lookups see
//! the same posts. Data is lost on process restart.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use scribe_core::domain::{Comment, Post, PostStatus, Tag};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, CommentRepository, PostRepository, TagRepository};
use scribe_core::query::PostQuery;
use scribe_core::ranking::{self, CommentedPost};
use scribe_core::trigram;

#[derive(Default)]
struct BlogData {
    posts: HashMap<Uuid, Post>,
    tags: HashMap<Uuid, Tag>,
    post_tags: HashMap<Uuid, HashSet<Uuid>>,
    comments: Vec<Comment>,
}

impl BlogData {
    fn matching<'a>(&'a self, query: &'a PostQuery) -> impl Iterator<Item = &'a Post> + 'a {
        let untagged = HashSet::new();
        self.posts.values().filter(move |post| {
            let tags = self.post_tags.get(&post.id).unwrap_or(&untagged);
            query.matches(post, tags)
        })
    }
}

/// Posts, tags and comments kept in memory behind an async RwLock.
pub struct InMemoryBlogStore {
    data: RwLock<BlogData>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BlogData::default()),
        }
    }
}

impl Default for InMemoryBlogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.data.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut data = self.data.write().await;
        if data.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("post already exists".to_string()));
        }
        data.posts.insert(post.id, post.clone());
        Ok(post)
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn find(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let data = self.data.read().await;
        let posts = data.matching(query).cloned().collect();
        Ok(query.arrange(posts))
    }

    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        let data = self.data.read().await;
        Ok(data.matching(query).count() as u64)
    }

    async fn title_similarity(
        &self,
        query: &PostQuery,
        text: &str,
        min_score: f32,
    ) -> Result<Vec<(Post, f32)>, RepoError> {
        let data = self.data.read().await;
        Ok(data
            .matching(query)
            .filter_map(|post| {
                let score = trigram::similarity(text, &post.title);
                (score > min_score).then(|| (post.clone(), score))
            })
            .collect())
    }

    async fn find_similar(
        &self,
        query: &PostQuery,
        tag_ids: &[Uuid],
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let data = self.data.read().await;
        let wanted: HashSet<Uuid> = tag_ids.iter().copied().collect();
        let candidates = data.matching(query).cloned().collect();

        Ok(ranking::rank_similar(
            &wanted,
            candidates,
            &data.post_tags,
            limit as usize,
        ))
    }

    async fn most_commented(
        &self,
        query: &PostQuery,
        limit: u64,
    ) -> Result<Vec<CommentedPost>, RepoError> {
        let data = self.data.read().await;
        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for comment in data.comments.iter().filter(|c| c.active) {
            *counts.entry(comment.post_id).or_insert(0) += 1;
        }
        let posts = data.matching(query).cloned().collect();

        Ok(ranking::rank_most_commented(posts, &counts, limit as usize))
    }

    async fn set_status(&self, id: Uuid, status: PostStatus) -> Result<(), RepoError> {
        let mut data = self.data.write().await;
        let post = data.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.status = status;
        post.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        Ok(self.data.read().await.tags.get(&id).cloned())
    }

    async fn insert(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut data = self.data.write().await;
        if data.tags.values().any(|t| t.slug == tag.slug) {
            return Err(RepoError::Constraint(format!(
                "tag slug '{}' already exists",
                tag.slug
            )));
        }
        data.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }
}

#[async_trait]
impl TagRepository for InMemoryBlogStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let data = self.data.read().await;
        Ok(data.tags.values().find(|t| t.slug == slug).cloned())
    }

    async fn tags_for_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Tag>>, RepoError> {
        let data = self.data.read().await;
        let mut by_post = HashMap::new();

        for post_id in post_ids {
            let Some(tag_ids) = data.post_tags.get(post_id) else {
                continue;
            };
            let mut tags: Vec<Tag> = tag_ids
                .iter()
                .filter_map(|id| data.tags.get(id).cloned())
                .collect();
            tags.sort_by(|a, b| a.name.cmp(&b.name));
            by_post.insert(*post_id, tags);
        }

        Ok(by_post)
    }

    async fn attach(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        let mut data = self.data.write().await;
        if !data.posts.contains_key(&post_id) {
            return Err(RepoError::Constraint(format!("unknown post {post_id}")));
        }
        if let Some(missing) = tag_ids.iter().find(|id| !data.tags.contains_key(*id)) {
            return Err(RepoError::Constraint(format!("unknown tag {missing}")));
        }

        data.post_tags
            .entry(post_id)
            .or_default()
            .extend(tag_ids.iter().copied());
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let data = self.data.read().await;
        Ok(data.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut data = self.data.write().await;
        if !data.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "unknown post {}",
                comment.post_id
            )));
        }
        data.comments.push(comment.clone());
        Ok(comment)
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn active_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let data = self.data.read().await;
        let mut comments: Vec<Comment> = data
            .comments
            .iter()
            .filter(|c| c.post_id == post_id && c.active)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<(), RepoError> {
        let mut data = self.data.write().await;
        let comment = data
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepoError::NotFound)?;
        comment.active = active;
        comment.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn published(title: &str) -> Post {
        Post::new(Uuid::new_v4(), title.into(), title.to_lowercase(), String::new())
            .publish_at(Utc::now() - Duration::days(1))
    }

    #[tokio::test]
    async fn test_insert_and_find_post() {
        let store = InMemoryBlogStore::new();
        let post = store.insert(published("Hello")).await.unwrap();

        let found: Option<Post> = store.find_by_id(post.id).await.unwrap();
        assert_eq!(found.unwrap().title, "Hello");
    }

    #[tokio::test]
    async fn test_duplicate_tag_slug_is_rejected() {
        let store = InMemoryBlogStore::new();
        store.insert(Tag::new("Rust")).await.unwrap();

        let result = store.insert(Tag::new("rust")).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_comment_needs_existing_post() {
        let store = InMemoryBlogStore::new();
        let orphan = Comment::new(Uuid::new_v4(), "Ada".into(), "a@b.c".into(), "Hi".into());

        let result = store.insert(orphan).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_attach_is_idempotent() {
        let store = InMemoryBlogStore::new();
        let post = store.insert(published("Hello")).await.unwrap();
        let tag = store.insert(Tag::new("Rust")).await.unwrap();

        store.attach(post.id, &[tag.id]).await.unwrap();
        store.attach(post.id, &[tag.id]).await.unwrap();

        let tags = store.tags_for_posts(&[post.id]).await.unwrap();
        assert_eq!(tags[&post.id], vec![tag]);
    }

    #[tokio::test]
    async fn test_set_status_on_missing_post() {
        let store = InMemoryBlogStore::new();
        let result = store.set_status(Uuid::new_v4(), PostStatus::Draft).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}

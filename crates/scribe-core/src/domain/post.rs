use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    /// Two-letter code stored in the `posts.status` column.
    pub fn code(self) -> &'static str {
        match self {
            PostStatus::Draft => "DF",
            PostStatus::Published => "PB",
        }
    }

    /// Parse a stored code. Anything unknown is treated as a draft so it
    /// never leaks to readers.
    pub fn from_code(code: &str) -> Self {
        match code {
            "PB" => PostStatus::Published,
            _ => PostStatus::Draft,
        }
    }
}

/// Post entity - a blog article written in markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub status: PostStatus,
    pub publish: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new draft post.
    pub fn new(author_id: Uuid, title: String, slug: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug,
            body,
            status: PostStatus::Draft,
            publish: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the post as published at the given instant.
    pub fn publish_at(mut self, publish: DateTime<Utc>) -> Self {
        self.status = PostStatus::Published;
        self.publish = publish;
        self.updated_at = Utc::now();
        self
    }

    /// Whether readers can see this post at `now`.
    pub fn is_published_at(&self, now: DateTime<Utc>) -> bool {
        self.status == PostStatus::Published && self.publish <= now
    }

    /// Canonical path of the detail page, keyed on the UTC publish date.
    pub fn absolute_path(&self) -> String {
        format!(
            "/blog/{}/{}/{}/{}",
            self.publish.year(),
            self.publish.month(),
            self.publish.day(),
            self.slug
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_draft_is_never_published() {
        let post = Post::new(Uuid::new_v4(), "T".into(), "t".into(), String::new());
        assert!(!post.is_published_at(Utc::now() + Duration::days(365)));
    }

    #[test]
    fn test_future_publish_is_hidden_until_due() {
        let publish = Utc::now() + Duration::hours(1);
        let post =
            Post::new(Uuid::new_v4(), "T".into(), "t".into(), String::new()).publish_at(publish);
        assert!(!post.is_published_at(Utc::now()));
        assert!(post.is_published_at(publish));
    }

    #[test]
    fn test_absolute_path_uses_unpadded_date() {
        let publish = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 0).unwrap();
        let post = Post::new(Uuid::new_v4(), "T".into(), "hello-world".into(), String::new())
            .publish_at(publish);
        assert_eq!(post.absolute_path(), "/blog/2024/3/7/hello-world");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(PostStatus::from_code(PostStatus::Published.code()), PostStatus::Published);
        assert_eq!(PostStatus::from_code("??"), PostStatus::Draft);
    }
}

//! Reader interactions: sharing a post by email and commenting on it.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::error::DomainError;
use crate::forms::{CommentForm, ShareForm};
use crate::ports::{CommentRepository, Mailer, OutgoingMail, PostRepository};

use super::published_by_id;

/// Use cases that accept reader input.
pub struct Interactions {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    mailer: Arc<dyn Mailer>,
    sender: String,
}

impl Interactions {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        mailer: Arc<dyn Mailer>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            posts,
            comments,
            mailer,
            sender: sender.into(),
        }
    }

    /// Recommend a published post to someone by email.
    ///
    /// `site_url` is the scheme and host the post link is built on. Nothing is
    /// sent when the form is invalid; delivery errors are returned as is.
    pub async fn share_post(
        &self,
        post_id: Uuid,
        form: ShareForm,
        site_url: &str,
    ) -> Result<Post, DomainError> {
        let post = published_by_id(self.posts.as_ref(), post_id).await?;
        let form = form.validate_into().map_err(DomainError::Validation)?;

        let post_url = format!("{}{}", site_url.trim_end_matches('/'), post.absolute_path());
        let mail = share_mail(&post, &post_url, &form, &self.sender);
        self.mailer.send(mail).await?;

        tracing::info!(post_id = %post.id, "Post shared by email");
        Ok(post)
    }

    /// Add an active comment to a published post.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        form: CommentForm,
    ) -> Result<(Post, Comment), DomainError> {
        let post = published_by_id(self.posts.as_ref(), post_id).await?;
        let form = form.validate_into().map_err(DomainError::Validation)?;

        let comment = self
            .comments
            .insert(Comment::new(post.id, form.name, form.email, form.body))
            .await?;

        tracing::info!(post_id = %post.id, comment_id = %comment.id, "Comment added");
        Ok((post, comment))
    }
}

fn share_mail(post: &Post, post_url: &str, form: &ShareForm, sender: &str) -> OutgoingMail {
    OutgoingMail {
        subject: format!("{} recommends for you {}", form.name, post.title),
        body: format!(
            "Read {} at {}\n\n{}'s comments: {}",
            post.title, post_url, form.name, form.comments
        ),
        from: sender.to_string(),
        to: vec![form.to.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_share_mail_layout() {
        let publish = Utc.with_ymd_and_hms(2024, 2, 9, 12, 0, 0).unwrap();
        let post = Post::new(Uuid::new_v4(), "Ownership".into(), "ownership".into(), String::new())
            .publish_at(publish);
        let form = ShareForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            to: "bob@example.com".into(),
            comments: "Worth it".into(),
        };

        let mail = share_mail(
            &post,
            "https://blog.example.com/blog/2024/2/9/ownership",
            &form,
            "noreply@example.com",
        );
        assert_eq!(mail.subject, "Ada recommends for you Ownership");
        assert_eq!(
            mail.body,
            "Read Ownership at https://blog.example.com/blog/2024/2/9/ownership\n\nAda's comments: Worth it"
        );
        assert_eq!(mail.from, "noreply@example.com");
        assert_eq!(mail.to, vec!["bob@example.com".to_string()]);
    }
}

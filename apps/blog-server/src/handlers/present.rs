//! Domain to wire conversions shared by the handlers.

use scribe_core::domain::{Comment, Post, Tag};
use scribe_core::feed::DESCRIPTION_WORDS;
use scribe_core::markdown;
use scribe_core::pagination::Page;
use scribe_shared::dto::{CommentDto, PageDto, PostSummary, TagDto};

pub fn post_summary(post: &Post) -> PostSummary {
    PostSummary {
        id: post.id,
        title: post.title.clone(),
        slug: post.slug.clone(),
        url: post.absolute_path(),
        publish: post.publish,
        excerpt: markdown::to_html_truncated(&post.body, DESCRIPTION_WORDS),
    }
}

pub fn tag_dto(tag: &Tag) -> TagDto {
    TagDto {
        slug: tag.slug.clone(),
        name: tag.name.clone(),
    }
}

/// Commenter emails stay private.
pub fn comment_dto(comment: &Comment) -> CommentDto {
    CommentDto {
        id: comment.id,
        name: comment.name.clone(),
        body: comment.body.clone(),
        created_at: comment.created_at,
    }
}

pub fn page_dto(page: Page<Post>) -> PageDto<PostSummary> {
    let has_next = page.has_next();
    let has_previous = page.has_previous();
    let page = page.map(|post| post_summary(&post));

    PageDto {
        items: page.items,
        number: page.number,
        num_pages: page.num_pages,
        total: page.total,
        has_next,
        has_previous,
    }
}

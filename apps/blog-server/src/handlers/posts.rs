//! Post list and detail endpoints.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use scribe_core::markdown;
use scribe_shared::dto::{PostDetailResponse, PostListResponse};

use super::present::{comment_dto, page_dto, post_summary, tag_dto};
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Raw page number; anything unparsable means the first page.
    pub page: Option<String>,
}

/// Newest published posts, one page at a time.
///
/// GET /blog?page=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    list(&state, None, query.page.as_deref()).await
}

/// Published posts carrying a tag.
///
/// GET /blog/tag/{tag_slug}?page=
pub async fn list_posts_by_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    list(&state, Some(path.as_str()), query.page.as_deref()).await
}

async fn list(state: &AppState, tag: Option<&str>, page: Option<&str>) -> AppResult<HttpResponse> {
    let listing = state.discovery.list_posts(tag, page).await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        tag: listing.tag.as_ref().map(tag_dto),
        page: page_dto(listing.page),
    }))
}

/// A published post with its tags, active comments and similar posts.
///
/// GET /blog/{year}/{month}/{day}/{slug}
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let detail = state.discovery.post_detail(year, month, day, &slug).await?;
    let post = detail.post;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        id: post.id,
        url: post.absolute_path(),
        body_html: markdown::to_html(&post.body),
        title: post.title,
        slug: post.slug,
        publish: post.publish,
        tags: detail.tags.iter().map(tag_dto).collect(),
        comments: detail.comments.iter().map(comment_dto).collect(),
        similar_posts: detail.similar.iter().map(post_summary).collect(),
    }))
}

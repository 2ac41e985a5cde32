//! Share-by-email and comment endpoints.
//!
//! Both accept the form either url-encoded or as JSON.

use actix_web::{Either, HttpRequest, HttpResponse, web};
use uuid::Uuid;

use scribe_core::forms::{CommentForm, ShareForm};
use scribe_shared::dto::{CommentCreatedResponse, ShareResponse, ShareTargetResponse};

use super::present::{comment_dto, post_summary};
use crate::middleware::error::AppResult;
use crate::observability::RequestId;
use crate::state::AppState;

type FormBody<T> = Either<web::Json<T>, web::Form<T>>;

fn into_form<T>(body: FormBody<T>) -> T {
    match body {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    }
}

/// Scheme and host the client reached us on.
fn site_url(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}

/// The post a share form is about.
///
/// GET /blog/{post_id}/share
pub async fn share_target(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.discovery.published_post(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ShareTargetResponse {
        sent: false,
        post: post_summary(&post),
        fields: ["name", "email", "to", "comments"]
            .into_iter()
            .map(String::from)
            .collect(),
    }))
}

/// Recommend a post by email.
///
/// POST /blog/{post_id}/share
pub async fn share_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: FormBody<ShareForm>,
    request_id: RequestId,
) -> AppResult<HttpResponse> {
    let form = into_form(body);
    let to = form.to.trim().to_string();

    let post = state
        .interactions
        .share_post(path.into_inner(), form, &site_url(&req))
        .await
        .inspect_err(|e| {
            tracing::warn!(request_id = request_id.as_str(), error = %e, "Share rejected");
        })?;

    Ok(HttpResponse::Ok().json(ShareResponse {
        sent: true,
        post: post_summary(&post),
        to,
    }))
}

/// Leave a comment on a post.
///
/// POST /blog/{post_id}/comment
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: FormBody<CommentForm>,
) -> AppResult<HttpResponse> {
    let (post, comment) = state
        .interactions
        .add_comment(path.into_inner(), into_form(body))
        .await?;

    Ok(HttpResponse::Created().json(CommentCreatedResponse {
        post_id: post.id,
        comment: comment_dto(&comment),
    }))
}

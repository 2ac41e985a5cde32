//! Sidebar widgets.

use actix_web::{HttpResponse, web};

use scribe_shared::dto::{CommentedPostDto, WidgetsResponse};

use super::present::post_summary;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Published post count, latest posts and most commented posts.
///
/// GET /blog/widgets
pub async fn widgets(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let discovery = &state.discovery;
    let limits = discovery.limits();

    let (total_posts, latest, most_commented) = tokio::try_join!(
        discovery.total_posts(),
        discovery.latest_posts(limits.latest),
        discovery.most_commented(limits.most_commented),
    )?;

    Ok(HttpResponse::Ok().json(WidgetsResponse {
        total_posts,
        latest_posts: latest.iter().map(post_summary).collect(),
        most_commented: most_commented
            .iter()
            .map(|c| CommentedPostDto {
                post: post_summary(&c.post),
                total_comments: c.comments,
            })
            .collect(),
    }))
}

//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::observability::RequestId;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    /// Published posts, when the store answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_posts: Option<u64>,
    pub request_id: String,
}

/// Reports whether the post store answers.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>, request_id: RequestId) -> HttpResponse {
    let published_posts = match state.discovery.total_posts().await {
        Ok(total) => Some(total),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the post store");
            None
        }
    };

    let response = HealthResponse {
        status: if published_posts.is_some() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        published_posts,
        request_id: request_id.0,
    };

    if published_posts.is_some() {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

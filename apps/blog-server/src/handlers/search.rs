//! Title search endpoint.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use scribe_shared::dto::{SearchHitDto, SearchResponse};

use super::present::post_summary;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// Published posts whose title resembles the query, best match first.
///
/// GET /blog/search?query=
pub async fn search_posts(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner().query;
    let hits = state.discovery.search_posts(query.as_deref()).await?;

    Ok(HttpResponse::Ok().json(SearchResponse {
        query,
        results: hits
            .iter()
            .map(|hit| SearchHitDto {
                post: post_summary(&hit.post),
                similarity: hit.similarity,
            })
            .collect(),
    }))
}

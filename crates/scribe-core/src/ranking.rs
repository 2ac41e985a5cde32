//! Ranking rules of the discovery pipeline.
//!
//! Repositories supply candidates and annotations (tags, comment counts,
//! similarity scores); these functions decide the order.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use crate::domain::Post;

/// Minimum title similarity for a search hit.
pub const SEARCH_THRESHOLD: f32 = 0.1;

/// A post with the number of comments it received.
#[derive(Debug, Clone, Serialize)]
pub struct CommentedPost {
    pub post: Post,
    pub comments: u64,
}

/// A post matched by a search query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub post: Post,
    pub similarity: f32,
}

/// Order candidates by shared tags with `target_tags`, newest first on ties.
///
/// Candidates sharing nothing with the target are dropped.
pub fn rank_similar(
    target_tags: &HashSet<Uuid>,
    candidates: Vec<Post>,
    candidate_tags: &HashMap<Uuid, HashSet<Uuid>>,
    limit: usize,
) -> Vec<Post> {
    let mut scored: Vec<(usize, Post)> = candidates
        .into_iter()
        .filter_map(|p| {
            let shared = candidate_tags
                .get(&p.id)
                .map(|tags| tags.intersection(target_tags).count())
                .unwrap_or(0);
            (shared > 0).then_some((shared, p))
        })
        .collect();

    scored.sort_by(|(a_shared, a), (b_shared, b)| {
        b_shared
            .cmp(a_shared)
            .then_with(|| b.publish.cmp(&a.publish))
            .then_with(|| b.id.cmp(&a.id))
    });
    scored.truncate(limit);
    scored.into_iter().map(|(_, p)| p).collect()
}

/// Order posts by comment count, oldest first on ties.
pub fn rank_most_commented(
    posts: Vec<Post>,
    counts: &HashMap<Uuid, u64>,
    limit: usize,
) -> Vec<CommentedPost> {
    let mut ranked: Vec<CommentedPost> = posts
        .into_iter()
        .map(|post| CommentedPost {
            comments: counts.get(&post.id).copied().unwrap_or(0),
            post,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.comments
            .cmp(&a.comments)
            .then_with(|| a.post.publish.cmp(&b.post.publish))
            .then_with(|| a.post.id.cmp(&b.post.id))
    });
    ranked.truncate(limit);
    ranked
}

/// Keep hits above the threshold, best match first, newest first on ties.
pub fn rank_search(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut kept: Vec<SearchHit> = hits
        .into_iter()
        .filter(|h| h.similarity > SEARCH_THRESHOLD)
        .collect();

    kept.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.post.publish.cmp(&a.post.publish))
            .then_with(|| b.post.id.cmp(&a.post.id))
    });
    kept
}

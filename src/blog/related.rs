use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::blog::post::Post;

pub const DEFAULT_MAX_RELATED: usize = 3;

const SHARED_TAG_POINTS: u32 = 10;
const RECENT_POINTS: u32 = 5;
const RECENT_WINDOW_DAYS: i64 = 30;
/// Below this top score nothing is really related; show the latest posts instead.
const SIGNIFICANT_SCORE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelatedReason {
    Tags,
    Recent,
    Other,
}

#[derive(Debug, Clone, Copy)]
pub struct RelatedPost<'a> {
    pub post: &'a Post,
    pub score: u32,
    pub reason: RelatedReason,
}

/// Ranks the other posts by shared tags and recency relative to `now`.
pub fn related_posts<'a>(
    current: &Post,
    all_posts: &'a [Post],
    max_related: usize,
    now: DateTime<Utc>,
) -> Vec<RelatedPost<'a>> {
    let recent_threshold = now - Duration::days(RECENT_WINDOW_DAYS);
    let mut candidates: Vec<RelatedPost<'a>> = all_posts
        .iter()
        .filter(|post| post.slug != current.slug)
        .map(|post| {
            let shared_tags = current
                .metadata
                .tags
                .iter()
                .filter(|tag| post.has_tag(tag))
                .count() as u32;
            let is_recent = post.metadata.published_at > recent_threshold;

            let score = shared_tags * SHARED_TAG_POINTS + if is_recent { RECENT_POINTS } else { 0 };
            let reason = if shared_tags > 0 {
                RelatedReason::Tags
            } else if is_recent {
                RelatedReason::Recent
            } else {
                RelatedReason::Other
            };

            RelatedPost { post, score, reason }
        })
        .collect();

    let best_score = candidates.iter().map(|candidate| candidate.score).max();
    if best_score.is_some_and(|score| score < SIGNIFICANT_SCORE) {
        candidates.sort_by(newest_first);
        return candidates
            .into_iter()
            .take(max_related)
            .map(|candidate| RelatedPost {
                score: 1,
                reason: RelatedReason::Recent,
                ..candidate
            })
            .collect();
    }

    candidates.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| newest_first(a, b)));
    candidates.truncate(max_related);

    candidates
}

fn newest_first(a: &RelatedPost, b: &RelatedPost) -> Ordering {
    b.post
        .metadata
        .published_at
        .cmp(&a.post.metadata.published_at)
}

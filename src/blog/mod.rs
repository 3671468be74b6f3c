pub mod loader;
pub mod post;
pub mod related;
pub mod search;
pub mod sort;
pub mod stats;

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::blog::loader::{load_posts, BlogError};
use crate::blog::post::Post;
use crate::blog::related::{related_posts, RelatedPost};
use crate::blog::search::{search, DEFAULT_MIN_SEARCH_LENGTH};
use crate::blog::sort::{sort_posts, SortOption};
use crate::blog::stats::{compute_statistics, reading_time, BlogStatistics};

/// Listing parameters, applied as search, tag filter, sort, exclude, window.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub search: Option<String>,
    pub tags: Vec<String>,
    pub sort: SortOption,
    pub exclude: Vec<String>,
    pub offset: usize,
    pub limit: Option<usize>,
}

#[derive(Debug)]
pub struct QueryResult<'a> {
    /// Number of matches before the offset/limit window.
    pub total: usize,
    pub posts: Vec<&'a Post>,
}

/// Every published post, held in memory newest first.
pub struct BlogIndex {
    posts: Vec<Post>,
    words_per_minute: u32,
}

impl BlogIndex {
    pub fn new(mut posts: Vec<Post>, words_per_minute: u32) -> Self {
        posts.sort_by(|a, b| b.metadata.published_at.cmp(&a.metadata.published_at));

        Self {
            posts,
            words_per_minute,
        }
    }

    pub fn load(directory: &Path, words_per_minute: u32) -> Result<Self, BlogError> {
        Ok(Self::new(load_posts(directory)?, words_per_minute))
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn find(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.slug == slug)
    }

    /// Sorted, de-duplicated union of every post's tags.
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .posts
            .iter()
            .flat_map(|post| post.metadata.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();

        tags
    }

    pub fn query(&self, query: &PostQuery) -> QueryResult<'_> {
        let posts: Vec<&Post> = self.posts.iter().collect();
        let posts = match query.search.as_deref() {
            Some(term) => search(posts, term, DEFAULT_MIN_SEARCH_LENGTH),
            None => posts,
        };

        let mut posts = filter_by_tags(posts, &query.tags);
        sort_posts(&mut posts, query.sort);
        posts.retain(|post| !query.exclude.contains(&post.slug));

        let total = posts.len();
        let posts = posts
            .into_iter()
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();

        QueryResult { total, posts }
    }

    pub fn related(
        &self,
        current: &Post,
        max_related: usize,
        now: DateTime<Utc>,
    ) -> Vec<RelatedPost<'_>> {
        related_posts(current, &self.posts, max_related, now)
    }

    pub fn statistics(&self, max_top_tags: Option<usize>) -> BlogStatistics {
        compute_statistics(&self.posts, self.words_per_minute, max_top_tags)
    }

    pub fn reading_time(&self, post: &Post) -> u32 {
        reading_time(&post.content, self.words_per_minute)
    }
}

/// Keeps posts carrying at least one of `selected`; no selection keeps everything.
pub fn filter_by_tags<'a>(posts: Vec<&'a Post>, selected: &[String]) -> Vec<&'a Post> {
    if selected.is_empty() {
        return posts;
    }

    posts
        .into_iter()
        .filter(|post| selected.iter().any(|tag| post.has_tag(tag)))
        .collect()
}

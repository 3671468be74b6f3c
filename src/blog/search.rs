use crate::blog::post::Post;

pub const DEFAULT_MIN_SEARCH_LENGTH: usize = 1;

/// Case-insensitive full-text match over title, summary, content and tags.
///
/// Queries that are blank or shorter than `min_length` characters match
/// everything. Besides plain substring matches, a title or summary word
/// longer than three characters that appears inside the query also counts
/// as a hit, so "rust-async" still finds a post titled "Async Rust".
pub fn search<'a>(posts: Vec<&'a Post>, query: &str, min_length: usize) -> Vec<&'a Post> {
    let term = query.trim().to_lowercase();

    if term.is_empty() || query.chars().count() < min_length {
        return posts;
    }

    posts
        .into_iter()
        .filter(|post| matches(post, &term))
        .collect()
}

fn matches(post: &Post, term: &str) -> bool {
    let title = post.metadata.title.to_lowercase();
    let summary = post.metadata.summary.to_lowercase();

    if title.contains(term)
        || summary.contains(term)
        || post.content.to_lowercase().contains(term)
        || post
            .metadata
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(term))
    {
        return true;
    }

    title
        .split_whitespace()
        .chain(summary.split_whitespace())
        .any(|word| word.chars().count() > 3 && term.contains(word))
}

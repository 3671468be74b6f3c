use std::collections::HashMap;

use serde::Serialize;

use crate::blog::post::Post;

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogStatistics {
    pub total_posts: usize,
    pub unique_tags: usize,
    pub total_reading_time: u32,
    pub top_tags: Vec<TagCount>,
    pub average_reading_time: u32,
}

/// Estimated reading time in whole minutes, rounded up.
pub fn reading_time(content: &str, words_per_minute: u32) -> u32 {
    let words = content.split_whitespace().count() as u32;
    let words_per_minute = words_per_minute.max(1);

    words.div_ceil(words_per_minute)
}

pub fn compute_statistics(
    posts: &[Post],
    words_per_minute: u32,
    max_top_tags: Option<usize>,
) -> BlogStatistics {
    let total_posts = posts.len();
    let mut tag_counts: HashMap<&str, usize> = HashMap::new();
    let mut total_reading_time = 0;

    for post in posts {
        for tag in &post.metadata.tags {
            *tag_counts.entry(tag.as_str()).or_default() += 1;
        }
        total_reading_time += reading_time(&post.content, words_per_minute);
    }

    let unique_tags = tag_counts.len();
    let mut top_tags: Vec<TagCount> = tag_counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
            percentage: (count as f64 / total_posts as f64 * 100.0).round() as u32,
        })
        .collect();
    top_tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    if let Some(max_top_tags) = max_top_tags {
        top_tags.truncate(max_top_tags);
    }

    let average_reading_time = if total_posts > 0 {
        (total_reading_time as f64 / total_posts as f64).round() as u32
    } else {
        0
    };

    BlogStatistics {
        total_posts,
        unique_tags,
        total_reading_time,
        top_tags,
        average_reading_time,
    }
}

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::blog::post::Post;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    Newest,
    Oldest,
    Alphabetical,
    ReverseAlphabetical,
    LastUpdated,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Newest => "newest",
            SortOption::Oldest => "oldest",
            SortOption::Alphabetical => "alphabetical",
            SortOption::ReverseAlphabetical => "reverse-alphabetical",
            SortOption::LastUpdated => "last-updated",
        }
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "newest" => Ok(SortOption::Newest),
            "oldest" => Ok(SortOption::Oldest),
            "alphabetical" => Ok(SortOption::Alphabetical),
            "reverse-alphabetical" => Ok(SortOption::ReverseAlphabetical),
            "last-updated" => Ok(SortOption::LastUpdated),
            unknown => Err(format!("{} is not a supported sort option", unknown)),
        }
    }
}

/// Stable sort; posts that compare equal keep their relative order.
pub fn sort_posts(posts: &mut [&Post], option: SortOption) {
    match option {
        SortOption::Newest => {
            posts.sort_by(|a, b| b.metadata.published_at.cmp(&a.metadata.published_at))
        }
        SortOption::Oldest => {
            posts.sort_by(|a, b| a.metadata.published_at.cmp(&b.metadata.published_at))
        }
        SortOption::Alphabetical => posts.sort_by(|a, b| compare_titles(a, b)),
        SortOption::ReverseAlphabetical => posts.sort_by(|a, b| compare_titles(b, a)),
        SortOption::LastUpdated => {
            posts.sort_by_key(|post| std::cmp::Reverse(post.last_updated_at()))
        }
    }
}

fn compare_titles(a: &Post, b: &Post) -> Ordering {
    collation_key(&a.metadata.title).cmp(&collation_key(&b.metadata.title))
}

/// Base-letter key: ignores case and Latin diacritics.
fn collation_key(title: &str) -> String {
    title.to_lowercase().chars().map(fold_diacritic).collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

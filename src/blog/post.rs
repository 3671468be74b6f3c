use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default, rename = "linkedIn")]
    pub linked_in: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetadata {
    pub title: String,
    pub summary: String,
    pub published_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub team: Vec<TeamMember>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// A statically authored article: frontmatter metadata plus its MDX body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub slug: String,
    pub metadata: PostMetadata,
    pub content: String,
}

impl Post {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata.tags.iter().any(|own| own == tag)
    }

    /// Date used by the `last-updated` ordering.
    pub fn last_updated_at(&self) -> DateTime<Utc> {
        self.metadata
            .updated_at
            .unwrap_or(self.metadata.published_at)
    }
}

/// `tag` may be written either as a single string or as a list.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum TagField {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Frontmatter {
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    published_at: String,
    updated_at: Option<String>,
    image: Option<String>,
    #[serde(default)]
    images: Vec<String>,
    tag: Option<TagField>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    team: Vec<TeamMember>,
    link: Option<String>,
}

impl Frontmatter {
    pub(crate) fn into_metadata(self) -> Result<PostMetadata, String> {
        let published_at = parse_date(&self.published_at)
            .ok_or_else(|| format!("{} is not a valid publishedAt date", self.published_at))?;
        let updated_at = match self.updated_at {
            Some(raw) => Some(
                parse_date(&raw).ok_or_else(|| format!("{} is not a valid updatedAt date", raw))?,
            ),
            None => None,
        };

        let mut tags: Vec<String> = Vec::new();
        let declared = match self.tag {
            Some(TagField::One(tag)) => vec![tag],
            Some(TagField::Many(tags)) => tags,
            None => Vec::new(),
        };
        for tag in declared.into_iter().chain(self.tags) {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        Ok(PostMetadata {
            title: self.title,
            summary: self.summary,
            published_at,
            updated_at,
            image: self.image.filter(|image| !image.is_empty()),
            images: self.images,
            tags,
            team: self.team,
            link: self.link.filter(|link| !link.is_empty()),
        })
    }
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

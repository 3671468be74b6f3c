use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::blog::post::{Post, PostMetadata};
use crate::blog::related::{RelatedReason, DEFAULT_MAX_RELATED};
use crate::blog::sort::SortOption;
use crate::blog::{BlogIndex, PostQuery};

/// Listing entry: metadata plus reading time, without the body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary<'a> {
    pub slug: &'a str,
    #[serde(flatten)]
    pub metadata: &'a PostMetadata,
    pub reading_time: u32,
}

impl<'a> PostSummary<'a> {
    fn new(post: &'a Post, blog: &BlogIndex) -> Self {
        Self {
            slug: &post.slug,
            metadata: &post.metadata,
            reading_time: blog.reading_time(post),
        }
    }
}

#[derive(Serialize)]
struct RelatedEntry<'a> {
    post: PostSummary<'a>,
    score: u32,
    reason: RelatedReason,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PostsParameters {
    pub q: Option<String>,
    /// Comma separated.
    pub tags: Option<String>,
    pub sort: Option<String>,
    /// Comma separated slugs.
    pub exclude: Option<String>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

impl TryFrom<PostsParameters> for PostQuery {
    type Error = String;

    fn try_from(parameters: PostsParameters) -> Result<Self, Self::Error> {
        let sort = match parameters.sort.as_deref() {
            Some(sort) if !sort.trim().is_empty() => sort.parse::<SortOption>()?,
            _ => SortOption::default(),
        };

        Ok(PostQuery {
            search: parameters.q,
            tags: split_list(parameters.tags.as_deref()),
            sort,
            exclude: split_list(parameters.exclude.as_deref()),
            offset: parameters.offset.unwrap_or(0),
            limit: parameters.limit,
        })
    }
}

#[tracing::instrument(name = "Listing blog posts", skip(blog))]
pub async fn list_posts(
    parameters: web::Query<PostsParameters>,
    blog: web::Data<BlogIndex>,
) -> Result<HttpResponse, BlogRouteError> {
    let query: PostQuery = parameters
        .into_inner()
        .try_into()
        .map_err(BlogRouteError::InvalidQuery)?;

    let result = blog.query(&query);
    let posts: Vec<PostSummary> = result
        .posts
        .iter()
        .map(|post| PostSummary::new(post, &blog))
        .collect();

    Ok(HttpResponse::Ok().json(json!({ "total": result.total, "posts": posts })))
}

#[tracing::instrument(name = "Fetching a blog post", skip(blog))]
pub async fn get_post(
    slug: web::Path<String>,
    blog: web::Data<BlogIndex>,
) -> Result<HttpResponse, BlogRouteError> {
    let post = blog
        .find(slug.as_str())
        .ok_or_else(|| BlogRouteError::NotFound(slug.into_inner()))?;

    let related: Vec<RelatedEntry> = blog
        .related(post, DEFAULT_MAX_RELATED, Utc::now())
        .into_iter()
        .map(|related| RelatedEntry {
            post: PostSummary::new(related.post, &blog),
            score: related.score,
            reason: related.reason,
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "post": post,
        "readingTime": blog.reading_time(post),
        "related": related,
    })))
}

#[tracing::instrument(name = "Listing blog tags", skip(blog))]
pub async fn list_tags(blog: web::Data<BlogIndex>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "tags": blog.all_tags() }))
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StatsParameters {
    pub max_top_tags: Option<usize>,
}

#[tracing::instrument(name = "Computing blog statistics", skip(blog))]
pub async fn blog_stats(
    parameters: web::Query<StatsParameters>,
    blog: web::Data<BlogIndex>,
) -> HttpResponse {
    HttpResponse::Ok().json(blog.statistics(parameters.max_top_tags))
}

#[derive(thiserror::Error, Debug)]
pub enum BlogRouteError {
    #[error("{0}")]
    InvalidQuery(String),
    #[error("Post {0} not found")]
    NotFound(String),
}

impl ResponseError for BlogRouteError {
    fn status_code(&self) -> StatusCode {
        match self {
            BlogRouteError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            BlogRouteError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

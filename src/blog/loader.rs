use std::fs;
use std::path::{Path, PathBuf};

use crate::blog::post::{Frontmatter, Post};

const POST_EXTENSIONS: [&str; 2] = ["mdx", "md"];

#[derive(thiserror::Error, Debug)]
pub enum BlogError {
    #[error("Failed to read the posts directory {}.", .path.display())]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Loads every post in `directory`. A missing directory means "no posts yet".
/// Files that cannot be read or parsed are skipped.
#[tracing::instrument(
    name = "Loading blog posts",
    skip(directory),
    fields(directory = %directory.display())
)]
pub fn load_posts(directory: &Path) -> Result<Vec<Post>, BlogError> {
    if !directory.exists() {
        tracing::warn!("Posts directory does not exist, serving an empty blog");
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(directory).map_err(|source| BlogError::ReadDirectory {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| POST_EXTENSIONS.contains(&extension))
        })
        .collect();
    paths.sort();

    let mut posts = Vec::with_capacity(paths.len());
    for path in paths {
        match load_post(&path) {
            Ok(post) => posts.push(post),
            Err(err) => tracing::warn!("Skipping post {}: {}", path.display(), err),
        }
    }

    tracing::info!("Loaded {} posts", posts.len());

    Ok(posts)
}

fn load_post(path: &Path) -> Result<Post, String> {
    let slug = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| String::from("file name is not valid UTF-8"))?
        .to_string();
    let raw = fs::read_to_string(path).map_err(|err| err.to_string())?;

    parse_post(slug, &raw)
}

pub fn parse_post(slug: String, raw: &str) -> Result<Post, String> {
    let (frontmatter, body) =
        split_frontmatter(raw).ok_or_else(|| String::from("missing frontmatter block"))?;
    let frontmatter: Frontmatter =
        serde_yaml::from_str(frontmatter).map_err(|err| err.to_string())?;

    Ok(Post {
        slug,
        metadata: frontmatter.into_metadata()?,
        content: body.trim_start_matches(['\r', '\n']).to_string(),
    })
}

/// Splits a `---` delimited YAML block off the top of the document.
fn split_frontmatter(raw: &str) -> Option<(&str, &str)> {
    let raw = raw.trim_start_matches('\u{feff}');
    let rest = raw.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

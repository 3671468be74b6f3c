use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEME_LENGTH: usize = 256;
const FORBIDDEN_CHARS: [char; 9] = ['/', '{', '}', '"', '>', '<', '\\', '(', ')'];

/// Display name attached to a blog comment.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CommenterName(String);

impl CommenterName {
    pub fn parse(name: String) -> Result<CommenterName, String> {
        let is_empty_or_whitespace = name.trim().is_empty();
        let is_too_long = name.graphemes(true).count() > MAX_GRAPHEME_LENGTH;
        let contains_forbidden_chars = name.chars().any(|char| FORBIDDEN_CHARS.contains(&char));

        if is_empty_or_whitespace || is_too_long || contains_forbidden_chars {
            return Err(format!("{} is not a valid name", name));
        }

        Ok(Self(name.trim().to_string()))
    }
}

impl AsRef<str> for CommenterName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

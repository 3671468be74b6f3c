use serde::Deserialize;

/// A freshly published post announced to newsletter subscribers.
#[derive(Debug, Clone)]
pub struct PostNotification {
    pub title: String,
    pub url: String,
    pub summary: Option<String>,
    pub slug: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PostNotificationBody {
    pub title: Option<String>,
    pub url: Option<String>,
    pub summary: Option<String>,
    pub slug: Option<String>,
    pub secret: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl TryFrom<PostNotificationBody> for PostNotification {
    type Error = String;

    fn try_from(body: PostNotificationBody) -> Result<Self, Self::Error> {
        let (Some(title), Some(url)) = (non_blank(body.title), non_blank(body.url)) else {
            return Err(String::from("Missing fields: title and url are required"));
        };

        Ok(PostNotification {
            title,
            url,
            summary: non_blank(body.summary),
            slug: non_blank(body.slug),
        })
    }
}

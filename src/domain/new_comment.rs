use serde::Deserialize;

use crate::domain::commenter_name::CommenterName;
use crate::domain::subscriber_email::SubscriberEmail;

const MIN_COMMENT_LENGTH: usize = 10;

#[derive(Debug)]
pub struct NewComment {
    pub name: CommenterName,
    pub email: SubscriberEmail,
    pub comment: String,
    pub post_title: String,
    pub post_slug: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub comment: Option<String>,
    pub post_title: Option<String>,
    pub post_slug: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl TryFrom<NewCommentBody> for NewComment {
    type Error = String;

    fn try_from(body: NewCommentBody) -> Result<Self, Self::Error> {
        let (Some(name), Some(email), Some(comment), Some(post_title)) = (
            required(body.name),
            required(body.email),
            required(body.comment),
            required(body.post_title),
        ) else {
            return Err(String::from("All fields are required"));
        };

        let email = SubscriberEmail::parse(email).map_err(|_| String::from("Invalid email"))?;

        if comment.trim().chars().count() < MIN_COMMENT_LENGTH {
            return Err(format!(
                "Comment must be at least {} characters long",
                MIN_COMMENT_LENGTH
            ));
        }

        let name = CommenterName::parse(name).map_err(|_| String::from("Invalid name"))?;

        Ok(NewComment {
            name,
            email,
            comment: comment.trim().to_string(),
            post_title: post_title.trim().to_string(),
            post_slug: body.post_slug.unwrap_or_default().trim().to_string(),
        })
    }
}

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use std::time;

use crate::domain::subscriber_email::SubscriberEmail;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);
const MEMBER_EXISTS: &str = "Member Exists";

/// Adds members to a Mailchimp audience through the Marketing API.
pub struct MailchimpClient {
    http_client: Client,
    base_url: String,
    audience_id: String,
    api_key: Secret<String>,
}

#[derive(serde::Serialize)]
struct AddListMemberBody<'a> {
    email_address: &'a str,
    status: &'a str,
}

#[derive(serde::Deserialize, Default)]
struct MailchimpProblem {
    #[serde(default)]
    title: String,
}

#[derive(thiserror::Error)]
pub enum MailchimpError {
    #[error("The email is already a member of the audience.")]
    MemberExists,
    #[error("Mailchimp rejected the request with status {status}: {title}.")]
    Rejected { status: StatusCode, title: String },
    #[error("Failed to reach Mailchimp.")]
    Request(#[from] reqwest::Error),
}

impl std::fmt::Debug for MailchimpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::error_chain_fmt(self, f)
    }
}

impl MailchimpClient {
    pub fn new(
        base_url: String,
        audience_id: String,
        api_key: Secret<String>,
        timeout: Option<time::Duration>,
    ) -> Result<MailchimpClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(MailchimpClient {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            audience_id,
            api_key,
        })
    }

    #[tracing::instrument(
        name = "Adding a member to the Mailchimp audience",
        skip(self, email),
        fields(subscriber_email = %email, audience_id = %self.audience_id)
    )]
    pub async fn add_list_member(&self, email: &SubscriberEmail) -> Result<(), MailchimpError> {
        let url = format!("{}/lists/{}/members", self.base_url, self.audience_id);
        let response = self
            .http_client
            .post(&url)
            // Mailchimp ignores the user name of basic auth
            .basic_auth("anystring", Some(self.api_key.expose_secret()))
            .json(&AddListMemberBody {
                email_address: email.as_ref(),
                status: "subscribed",
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let problem: MailchimpProblem = response.json().await.unwrap_or_default();
        if problem.title == MEMBER_EXISTS {
            return Err(MailchimpError::MemberExists);
        }

        Err(MailchimpError::Rejected {
            status,
            title: problem.title,
        })
    }
}

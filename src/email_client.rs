use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time;

use crate::domain::post_notification::PostNotification;
use crate::domain::subscriber_email::SubscriberEmail;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);

/// Client for the transactional email HTTP API (SendGrid-compatible `/mail/send`).
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: SubscriberEmail,
    api_key: Secret<String>,
}

#[derive(serde::Serialize)]
pub struct SendEmailBody {
    personalizations: Vec<SendgridPersonalization>,
    from: SendgridEmail,
    subject: String,
    content: Vec<SendgridContent>,
}

#[derive(serde::Serialize)]
struct SendgridEmail {
    email: String,
}

#[derive(serde::Serialize)]
struct SendgridPersonalization {
    to: Vec<SendgridEmail>,
}

#[derive(serde::Serialize)]
struct SendgridContent {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

/// Subject and bodies of a single email.
#[derive(Debug, Clone)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: SubscriberEmail,
        api_key: Secret<String>,
        timeout: Option<time::Duration>,
    ) -> Result<EmailClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(EmailClient {
            http_client,
            base_url,
            sender,
            api_key,
        })
    }

    pub fn sender(&self) -> &SubscriberEmail {
        &self.sender
    }

    pub async fn send_email(
        &self,
        recipient: &SubscriberEmail,
        content: &EmailContent,
    ) -> Result<(), reqwest::Error> {
        self.broadcast_email(std::slice::from_ref(recipient), content)
            .await
    }

    /// Sends one request with a personalization per recipient, so nobody sees
    /// the other addresses.
    #[tracing::instrument(
        name = "Sending an email",
        skip(self, recipients, content),
        fields(recipients = recipients.len(), subject = %content.subject)
    )]
    pub async fn broadcast_email(
        &self,
        recipients: &[SubscriberEmail],
        content: &EmailContent,
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/mail/send", self.base_url);
        let body = SendEmailBody {
            from: SendgridEmail {
                email: String::from(self.sender.as_ref()),
            },
            personalizations: recipients
                .iter()
                .map(|recipient| SendgridPersonalization {
                    to: vec![SendgridEmail {
                        email: String::from(recipient.as_ref()),
                    }],
                })
                .collect(),
            subject: content.subject.clone(),
            content: vec![
                SendgridContent {
                    content_type: String::from("text/plain"),
                    value: content.text.clone(),
                },
                SendgridContent {
                    content_type: String::from("text/html"),
                    value: content.html.clone(),
                },
            ],
        };

        self.http_client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&body)
            .send()
            .await?
            .error_for_status()?; // return an error when server response status code is 4xx or 5xx

        Ok(())
    }
}

/// Email announcing a new post, with an unsubscribe link back to the site.
pub fn post_notification_content(post: &PostNotification, site_base_url: &str) -> EmailContent {
    let unsubscribe_link = format!("{}/unsubscribe", site_base_url.trim_end_matches('/'));
    let summary_html = post
        .summary
        .as_deref()
        .map(|summary| {
            format!(
                r#"<p style="margin: 0 0 12px; color: #374151;">{}</p>"#,
                escape_html(summary)
            )
        })
        .unwrap_or_default();
    let html = format!(
        r#"<div style="font-family: system-ui, sans-serif; line-height: 1.5; color: #111827;">
    <h1 style="margin: 0 0 12px; font-size: 20px;">New post: {title}</h1>
    {summary_html}
    <p style="margin: 0 0 16px;">You can read it here:</p>
    <p style="margin: 0 0 24px;"><a href="{url}" style="color: #2563EB;">{url}</a></p>
    <hr style="border: none; border-top: 1px solid #e5e7eb; margin: 24px 0;" />
    <p style="font-size: 12px; color: #6B7280;">You are receiving this email because you subscribed to the newsletter.</p>
    <p style="font-size: 12px; color: #6B7280;">If you no longer want these emails you can <a href="{unsubscribe_link}" style="color: #2563EB;">unsubscribe</a>.</p>
</div>"#,
        title = escape_html(&post.title),
        summary_html = summary_html,
        url = escape_html(&post.url),
        unsubscribe_link = escape_html(&unsubscribe_link),
    );
    let text = format!(
        "New post: {}\n{}\n\nUnsubscribe: {}",
        post.title, post.url, unsubscribe_link
    );

    EmailContent {
        subject: format!("New post: {}", post.title),
        html,
        text,
    }
}

pub(crate) fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

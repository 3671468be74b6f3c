use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use secrecy::{ExposeSecret, Secret};
use serde_json::json;

use crate::domain::post_notification::{PostNotification, PostNotificationBody};
use crate::domain::subscriber_email::SubscriberEmail;
use crate::email_client::{post_notification_content, EmailClient};
use crate::startup::ApplicationBaseUrl;
use crate::storage::notified::NotifiedStore;
use crate::storage::subscribers::SubscriberStore;
use crate::storage::StoreError;

#[tracing::instrument(
    name = "Notifying subscribers about a new post",
    skip(body, notify_secret, subscriber_store, notified_store, email_client, base_url),
    fields(
        title = ?body.title,
        url = ?body.url,
        slug = ?body.slug
    )
)]
pub async fn publish_post_notification(
    body: web::Json<PostNotificationBody>,
    notify_secret: web::Data<NotifySecret>,
    subscriber_store: web::Data<SubscriberStore>,
    notified_store: web::Data<NotifiedStore>,
    email_client: web::Data<Option<EmailClient>>,
    base_url: web::Data<ApplicationBaseUrl>,
) -> Result<HttpResponse, NotifyError> {
    let mut body = body.into_inner();
    if !notify_secret.matches(body.secret.take().as_deref()) {
        return Err(NotifyError::Unauthorized);
    }

    let post: PostNotification = body.try_into().map_err(NotifyError::Validation)?;

    if let Some(slug) = post.slug.as_deref() {
        if notified_store.contains(slug).await? {
            tracing::info!("Post {} was already notified", slug);
            return Ok(HttpResponse::Ok().json(json!({
                "ok": true,
                "sent": 0,
                "alreadyNotified": true,
                "message": "This post was already notified",
            })));
        }
    }

    let recipients: Vec<SubscriberEmail> = subscriber_store
        .read_all()
        .await?
        .into_iter()
        .map(|subscriber| subscriber.email)
        .collect();

    if recipients.is_empty() {
        return Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "sent": 0,
            "message": "There are no subscribers",
        })));
    }

    let Some(email_client) = email_client.get_ref() else {
        tracing::warn!("Email delivery is not configured. Skipping notification.");
        return Ok(HttpResponse::Ok().json(json!({
            "ok": true,
            "sent": 0,
            "skipped": true,
            "message": "Email delivery not configured",
        })));
    };

    let content = post_notification_content(&post, base_url.0.as_str());
    email_client
        .broadcast_email(&recipients, &content)
        .await
        .map_err(NotifyError::SendEmail)?;

    if let Some(slug) = post.slug.as_deref() {
        notified_store.add(slug).await?;
    }

    Ok(HttpResponse::Ok().json(json!({ "ok": true, "sent": recipients.len() })))
}

/// Shared secret the publishing workflow sends along with each notification.
pub struct NotifySecret(pub Option<Secret<String>>);

impl NotifySecret {
    /// Without a configured secret every request is rejected.
    pub fn matches(&self, candidate: Option<&str>) -> bool {
        match (&self.0, candidate) {
            (Some(expected), Some(candidate)) => {
                !candidate.is_empty() && expected.expose_secret() == candidate
            }
            _ => false,
        }
    }
}

#[derive(thiserror::Error)]
pub enum NotifyError {
    #[error("Missing or wrong notify secret.")]
    Unauthorized,
    #[error("{0}")]
    Validation(String),
    #[error("Failed to send the notification email.")]
    SendEmail(#[source] reqwest::Error),
    #[error("Failed to access the newsletter store.")]
    Store(#[from] StoreError),
}

impl std::fmt::Debug for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::error_chain_fmt(self, f)
    }
}

impl ResponseError for NotifyError {
    fn status_code(&self) -> StatusCode {
        match self {
            NotifyError::Unauthorized => StatusCode::UNAUTHORIZED,
            NotifyError::Validation(_) => StatusCode::BAD_REQUEST,
            NotifyError::SendEmail(_) | NotifyError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!("Post notification failed: {:?}", self);

        let error = match self {
            NotifyError::Unauthorized => String::from("Unauthorized"),
            NotifyError::Validation(message) => message.clone(),
            NotifyError::SendEmail(_) | NotifyError::Store(_) => String::from("Internal error"),
        };

        HttpResponse::build(self.status_code()).json(json!({ "ok": false, "error": error }))
    }
}

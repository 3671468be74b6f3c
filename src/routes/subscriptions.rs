use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;
use serde_json::json;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::newsletter::{SubscribeError, SubscriptionOutcome, SubscriptionProvider};
use crate::storage::subscribers::SubscriberStore;
use crate::storage::StoreError;

#[derive(Deserialize, Debug)]
pub struct SubscriptionBody {
    pub email: Option<String>,
}

fn parse_email(body: SubscriptionBody) -> Result<SubscriberEmail, SubscriptionError> {
    SubscriberEmail::parse(body.email.unwrap_or_default()).map_err(SubscriptionError::Validation)
}

#[tracing::instrument(
    name = "Newsletter subscription handler",
    skip(body, provider),
    fields(subscriber_email = ?body.email, provider = provider.name())
)]
pub async fn handle_subscribe(
    body: web::Json<SubscriptionBody>,
    provider: web::Data<SubscriptionProvider>,
) -> Result<HttpResponse, SubscriptionError> {
    let email = parse_email(body.into_inner())?;

    let response = match provider.subscribe(&email).await? {
        SubscriptionOutcome::Subscribed => json!({
            "ok": true,
            "message": "Subscription completed successfully",
        }),
        SubscriptionOutcome::AlreadySubscribed => json!({
            "ok": true,
            "duplicated": true,
            "message": "You were already subscribed",
        }),
    };

    Ok(HttpResponse::Ok().json(response))
}

#[tracing::instrument(
    name = "Newsletter unsubscription handler",
    skip(body, store),
    fields(subscriber_email = ?body.email)
)]
pub async fn handle_unsubscribe(
    body: web::Json<SubscriptionBody>,
    store: web::Data<SubscriberStore>,
) -> Result<HttpResponse, SubscriptionError> {
    let email = parse_email(body.into_inner())?;

    let message = if store.remove(&email).await? {
        "You have been unsubscribed from the newsletter"
    } else {
        "The email was not subscribed"
    };

    Ok(HttpResponse::Ok().json(json!({ "ok": true, "message": message })))
}

#[derive(thiserror::Error)]
pub enum SubscriptionError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Subscribe(#[from] SubscribeError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl std::fmt::Debug for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscriptionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscriptionError::Validation(_) => StatusCode::BAD_REQUEST,
            SubscriptionError::Subscribe(_) | SubscriptionError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!("Subscription request failed: {:?}", self);

        let error = match self {
            SubscriptionError::Validation(_) => "Invalid email",
            SubscriptionError::Subscribe(SubscribeError::Mailchimp(_)) => {
                "Failed to reach the mailing list provider"
            }
            SubscriptionError::Subscribe(SubscribeError::Store(_))
            | SubscriptionError::Store(_) => "Internal error",
        };

        HttpResponse::build(self.status_code()).json(json!({ "ok": false, "error": error }))
    }
}

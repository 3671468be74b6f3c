use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;
use serde_json::json;

use crate::chat_client::{ChatClient, ChatError};
use crate::domain::chat_message::ChatMessage;

#[derive(Deserialize, Debug)]
pub struct ChatBody {
    pub message: Option<String>,
}

#[tracing::instrument(
    name = "Chat message handler",
    skip(body, chat_client),
    fields(message_length = body.message.as_ref().map(|message| message.len()))
)]
pub async fn handle_chat(
    body: web::Json<ChatBody>,
    chat_client: web::Data<Option<ChatClient>>,
) -> Result<HttpResponse, ChatRouteError> {
    let message = ChatMessage::parse(body.into_inner().message.unwrap_or_default())
        .map_err(ChatRouteError::Validation)?;

    let chat_client = chat_client
        .get_ref()
        .as_ref()
        .ok_or(ChatRouteError::NotConfigured)?;
    let reply = chat_client.send_message(&message).await?;

    Ok(HttpResponse::Ok().json(reply))
}

#[derive(thiserror::Error)]
pub enum ChatRouteError {
    #[error("{0}")]
    Validation(String),
    #[error("The chat webhook URL is not configured.")]
    NotConfigured,
    #[error(transparent)]
    Chat(#[from] ChatError),
}

impl std::fmt::Debug for ChatRouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::error_chain_fmt(self, f)
    }
}

impl ResponseError for ChatRouteError {
    fn status_code(&self) -> StatusCode {
        match self {
            ChatRouteError::Validation(_) => StatusCode::BAD_REQUEST,
            ChatRouteError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            ChatRouteError::Chat(ChatError::Upstream { status, .. }) => {
                StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ChatRouteError::Chat(ChatError::InvalidResponse(_)) => StatusCode::BAD_GATEWAY,
            ChatRouteError::Chat(ChatError::Request(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!("Chat request failed: {:?}", self);

        let body = match self {
            ChatRouteError::Validation(message) => json!({ "error": message }),
            ChatRouteError::NotConfigured => json!({ "error": "Chat webhook URL not configured" }),
            ChatRouteError::Chat(ChatError::Upstream { status, body }) => json!({
                "error": format!("Webhook error: {}", status.as_u16()),
                "details": body,
            }),
            ChatRouteError::Chat(ChatError::InvalidResponse(_)) => json!({
                "error": "Invalid response from webhook",
                "details": "Response not JSON",
            }),
            ChatRouteError::Chat(ChatError::Request(_)) => {
                json!({ "error": "Internal server error" })
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

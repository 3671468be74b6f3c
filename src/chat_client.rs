use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::time;

use crate::domain::chat_message::ChatMessage;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(30);
/// Fields the chat widget knows how to render.
const REPLY_FIELDS: [&str; 5] = ["response", "output", "message", "text", "result"];

/// Forwards chat messages to the workflow-automation (n8n) webhook.
pub struct ChatClient {
    http_client: Client,
    webhook_url: String,
    api_key: Option<Secret<String>>,
}

#[derive(serde::Serialize)]
struct ChatPayload<'a> {
    message: &'a str,
}

#[derive(thiserror::Error)]
pub enum ChatError {
    #[error("The chat webhook answered with status {status}.")]
    Upstream { status: StatusCode, body: String },
    #[error("The chat webhook answered with a body that is not JSON.")]
    InvalidResponse(#[source] serde_json::Error),
    #[error("Failed to reach the chat webhook.")]
    Request(#[from] reqwest::Error),
}

impl std::fmt::Debug for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::error_chain_fmt(self, f)
    }
}

impl ChatClient {
    pub fn new(
        webhook_url: String,
        api_key: Option<Secret<String>>,
        timeout: Option<time::Duration>,
    ) -> Result<ChatClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(ChatClient {
            http_client,
            webhook_url,
            api_key,
        })
    }

    #[tracing::instrument(name = "Forwarding a chat message to the webhook", skip(self, message))]
    pub async fn send_message(&self, message: &ChatMessage) -> Result<Value, ChatError> {
        let mut request = self.http_client.post(&self.webhook_url).json(&ChatPayload {
            message: message.as_ref(),
        });
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Chat webhook responded with {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Upstream { status, body });
        }

        let raw = response.text().await?;
        let reply: Value = serde_json::from_str(&raw).map_err(ChatError::InvalidResponse)?;

        Ok(normalize_reply(reply))
    }
}

/// Replies without any renderable field are wrapped as `{"response": "<raw json>"}`.
pub fn normalize_reply(reply: Value) -> Value {
    let has_reply_field = REPLY_FIELDS.iter().any(|field| {
        reply
            .get(field)
            .is_some_and(|value| is_truthy(value))
    });

    if has_reply_field {
        return reply;
    }

    tracing::warn!("Chat webhook reply has no known field, forwarding the raw payload");
    serde_json::json!({ "response": reply.to_string() })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

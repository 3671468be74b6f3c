/// A visitor message headed for the chat webhook.
#[derive(Debug, Clone)]
pub struct ChatMessage(String);

impl ChatMessage {
    pub fn parse(message: String) -> Result<ChatMessage, String> {
        if message.trim().is_empty() {
            return Err(String::from("Message is required"));
        }

        Ok(Self(message))
    }
}

impl AsRef<str> for ChatMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

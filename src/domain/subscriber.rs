use chrono::{DateTime, Utc};

use crate::domain::subscriber_email::SubscriberEmail;

/// A newsletter subscriber as persisted in the local store.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub email: SubscriberEmail,
    // Older entries may have been written without a date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribed_at: Option<DateTime<Utc>>,
}

impl Subscriber {
    pub fn new(email: SubscriberEmail) -> Self {
        Self {
            email,
            subscribed_at: Some(Utc::now()),
        }
    }
}

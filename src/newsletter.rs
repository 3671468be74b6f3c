use std::sync::Arc;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::mailchimp_client::{MailchimpClient, MailchimpError};
use crate::storage::subscribers::SubscriberStore;
use crate::storage::StoreError;

/// Where new subscriptions end up.
pub enum SubscriptionProvider {
    Mailchimp(MailchimpClient),
    File(Arc<SubscriberStore>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionOutcome {
    Subscribed,
    AlreadySubscribed,
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("Failed to add the subscriber to Mailchimp.")]
    Mailchimp(#[from] MailchimpError),
    #[error("Failed to add the subscriber to the local store.")]
    Store(#[from] StoreError),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::error_chain_fmt(self, f)
    }
}

impl SubscriptionProvider {
    pub fn name(&self) -> &'static str {
        match self {
            SubscriptionProvider::Mailchimp(_) => "mailchimp",
            SubscriptionProvider::File(_) => "file",
        }
    }

    #[tracing::instrument(
        name = "Subscribing to the newsletter",
        skip(self, email),
        fields(provider = self.name())
    )]
    pub async fn subscribe(
        &self,
        email: &SubscriberEmail,
    ) -> Result<SubscriptionOutcome, SubscribeError> {
        match self {
            SubscriptionProvider::Mailchimp(client) => match client.add_list_member(email).await {
                Ok(()) => Ok(SubscriptionOutcome::Subscribed),
                Err(MailchimpError::MemberExists) => Ok(SubscriptionOutcome::AlreadySubscribed),
                Err(err) => Err(err.into()),
            },
            SubscriptionProvider::File(store) => {
                if store.add(email).await? {
                    Ok(SubscriptionOutcome::Subscribed)
                } else {
                    Ok(SubscriptionOutcome::AlreadySubscribed)
                }
            }
        }
    }
}

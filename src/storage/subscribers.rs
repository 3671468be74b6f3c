use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::storage::json_file::JsonFile;
use crate::storage::StoreError;

const FILE_NAME: &str = "newsletter.json";

#[derive(Serialize, Deserialize, Default)]
struct NewsletterData {
    #[serde(default)]
    subscribers: Vec<Subscriber>,
}

/// Newsletter subscribers kept in `<data_directory>/newsletter.json`.
pub struct SubscriberStore {
    file: JsonFile,
    lock: Mutex<()>,
}

impl SubscriberStore {
    pub fn new(data_directory: &Path) -> Self {
        Self {
            file: JsonFile::new(data_directory.join(FILE_NAME)),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub async fn read_all(&self) -> Result<Vec<Subscriber>, StoreError> {
        let _guard = self.lock.lock().await;

        Ok(self.file.read::<NewsletterData>().await?.subscribers)
    }

    /// Returns `false` when the email was already subscribed.
    #[tracing::instrument(
        name = "Adding a subscriber to the local store",
        skip(self),
        fields(subscriber_email = %email)
    )]
    pub async fn add(&self, email: &SubscriberEmail) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut data: NewsletterData = self.file.read_for_update().await?;

        if data.subscribers.iter().any(|subscriber| &subscriber.email == email) {
            return Ok(false);
        }

        data.subscribers.push(Subscriber::new(email.clone()));
        self.file.write(&data).await?;

        Ok(true)
    }

    /// Returns `false` when the email was not subscribed.
    #[tracing::instrument(
        name = "Removing a subscriber from the local store",
        skip(self),
        fields(subscriber_email = %email)
    )]
    pub async fn remove(&self, email: &SubscriberEmail) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut data: NewsletterData = self.file.read_for_update().await?;
        let before = data.subscribers.len();

        data.subscribers.retain(|subscriber| &subscriber.email != email);
        if data.subscribers.len() == before {
            return Ok(false);
        }

        self.file.write(&data).await?;

        Ok(true)
    }
}

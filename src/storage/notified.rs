use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::storage::json_file::JsonFile;
use crate::storage::StoreError;

const FILE_NAME: &str = "notified.json";

#[derive(Serialize, Deserialize, Default)]
struct NotifiedData {
    #[serde(default)]
    slugs: Vec<String>,
}

/// Slugs of posts that were already announced to subscribers.
pub struct NotifiedStore {
    file: JsonFile,
    lock: Mutex<()>,
}

impl NotifiedStore {
    pub fn new(data_directory: &Path) -> Self {
        Self {
            file: JsonFile::new(data_directory.join(FILE_NAME)),
            lock: Mutex::new(()),
        }
    }

    pub async fn read_all(&self) -> Result<Vec<String>, StoreError> {
        let _guard = self.lock.lock().await;

        Ok(self.file.read::<NotifiedData>().await?.slugs)
    }

    pub async fn contains(&self, slug: &str) -> Result<bool, StoreError> {
        Ok(self.read_all().await?.iter().any(|notified| notified == slug))
    }

    pub async fn add(&self, slug: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut data: NotifiedData = self.file.read_for_update().await?;

        if data.slugs.iter().any(|notified| notified == slug) {
            return Ok(());
        }

        data.slugs.push(slug.to_string());
        self.file.write(&data).await
    }
}

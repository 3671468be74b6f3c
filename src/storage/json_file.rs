use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("Failed to access {}.", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid JSON, refusing to overwrite it.", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize the store contents.")]
    Serialize(#[from] serde_json::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::error_chain_fmt(self, f)
    }
}

/// A pretty-printed JSON document on disk, created with its default value on first use.
#[derive(Debug, Clone)]
pub(crate) struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure<T: Serialize + Default>(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|source| self.io_error(source))?;
        if !exists {
            self.write(&T::default()).await?;
        }

        Ok(())
    }

    /// Unreadable or malformed contents read as the default value.
    pub(crate) async fn read<T: DeserializeOwned + Serialize + Default>(
        &self,
    ) -> Result<T, StoreError> {
        self.ensure::<T>().await?;

        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("Failed to read {}: {:?}", self.path.display(), err);
                return Ok(T::default());
            }
        };

        match serde_json::from_str(&raw) {
            Ok(contents) => Ok(contents),
            Err(err) => {
                tracing::warn!("Ignoring malformed {}: {}", self.path.display(), err);
                Ok(T::default())
            }
        }
    }

    /// Strict read used before a write: anything that cannot be read in full is an error,
    /// so the document on disk is never replaced by a partial view of it.
    pub(crate) async fn read_for_update<T: DeserializeOwned + Serialize + Default>(
        &self,
    ) -> Result<T, StoreError> {
        self.ensure::<T>().await?;

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| self.io_error(source))?;

        serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    pub(crate) async fn write<T: Serialize>(&self, contents: &T) -> Result<(), StoreError> {
        let serialized = serde_json::to_string_pretty(contents)?;

        tokio::fs::write(&self.path, serialized)
            .await
            .map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

//! Storage manager: holds the configured provider and the presign policy.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::info;

use acervo_core::config::storage::StorageConfig;
use acervo_core::error::AppError;
use acervo_core::result::AppResult;
use acervo_core::traits::storage::{ByteStream, StorageProvider};

/// Front for the active object storage provider.
#[derive(Debug, Clone)]
pub struct StorageManager {
    provider: Arc<dyn StorageProvider>,
    presign_ttl: Duration,
}

impl StorageManager {
    /// Build the provider named by `config.provider`.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let provider: Arc<dyn StorageProvider> = match config.provider.as_str() {
            #[cfg(feature = "local")]
            "local" => {
                info!(root = %config.local.root_path, "Initializing local storage provider");
                Arc::new(crate::providers::LocalStorageProvider::new(&config.local.root_path).await?)
            }
            #[cfg(feature = "s3")]
            "s3" => Arc::new(crate::providers::S3StorageProvider::new(&config.s3).await?),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown storage provider: '{other}'. Supported: local, s3"
                )));
            }
        };

        Ok(Self::from_provider(
            provider,
            Duration::from_secs(config.presign_ttl_seconds),
        ))
    }

    /// Wrap an existing provider.
    pub fn from_provider(provider: Arc<dyn StorageProvider>, presign_ttl: Duration) -> Self {
        Self {
            provider,
            presign_ttl,
        }
    }

    /// Name of the active provider.
    pub fn provider_type(&self) -> &str {
        self.provider.provider_type()
    }

    /// Store an object.
    pub async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        self.provider.write(key, data, Some(content_type)).await
    }

    /// Stream an object.
    pub async fn stream(&self, key: &str) -> AppResult<ByteStream> {
        self.provider.read(key).await
    }

    /// Remove an object.
    pub async fn remove(&self, key: &str) -> AppResult<()> {
        self.provider.delete(key).await
    }

    /// Whether an object is present.
    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        self.provider.exists(key).await
    }

    /// Time-limited download URL using the configured lifetime, when the
    /// backend can issue one.
    pub async fn presigned_url(&self, key: &str) -> AppResult<Option<String>> {
        self.provider.presigned_url(key, self.presign_ttl).await
    }

    /// Check that the backend is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.provider.health_check().await
    }
}

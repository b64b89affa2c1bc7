//! Cache manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use acervo_core::config::cache::CacheConfig;
use acervo_core::error::AppError;
use acervo_core::result::AppResult;
use acervo_core::traits::cache::CacheProvider;

/// Cache manager that wraps the configured cache provider.
#[derive(Debug, Clone)]
pub struct CacheManager {
    inner: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Create a new cache manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn CacheProvider> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis cache provider");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisCacheProvider::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory cache provider");
                Arc::new(crate::memory::MemoryCacheProvider::new(&config.memory))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a cache manager from an existing provider.
    pub fn from_provider(provider: Arc<dyn CacheProvider>) -> Self {
        Self { inner: provider }
    }

    /// Name of the active provider.
    pub fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    /// Get a raw string value.
    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    /// Set a raw string value with a TTL.
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    /// Delete a key.
    pub async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    /// Check whether a key exists.
    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    /// Get a typed value by deserializing from JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.inner.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    /// Set a typed value by serializing to JSON.
    pub async fn set_json<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        let json = serde_json::to_string(value)?;
        self.inner.set(key, &json, ttl).await
    }

    /// Check that the backend is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use acervo_core::config::cache::MemoryCacheConfig;
    use serde::Deserialize;

    use crate::memory::MemoryCacheProvider;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        code: String,
        attempts: u32,
    }

    fn manager() -> CacheManager {
        let provider = MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 100 });
        CacheManager::from_provider(Arc::new(provider))
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        let cache = manager();
        let payload = Payload {
            code: "123456".into(),
            attempts: 0,
        };
        cache
            .set_json("p", &payload, Duration::from_secs(30))
            .await
            .unwrap();
        let back: Option<Payload> = cache.get_json("p").await.unwrap();
        assert_eq!(back, Some(payload));
    }

    #[tokio::test]
    async fn test_get_json_rejects_garbage() {
        let cache = manager();
        cache
            .set("p", "not json", Duration::from_secs(30))
            .await
            .unwrap();
        let err = cache.get_json::<Payload>("p").await.unwrap_err();
        assert_eq!(err.kind, acervo_core::error::ErrorKind::Serialization);
    }

    #[tokio::test]
    async fn test_unknown_provider_is_configuration_error() {
        let config = CacheConfig {
            provider: "memcached".into(),
            ..CacheConfig::default()
        };
        let err = CacheManager::new(&config).await.unwrap_err();
        assert_eq!(err.kind, acervo_core::error::ErrorKind::Configuration);
    }
}

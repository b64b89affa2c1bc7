//! Password-reset codes kept in the cache with a TTL.
//!
//! The payload records its own expiry and the cache entry outlives it by
//! [`EXPIRED_RETENTION`], so a stale code is reported as expired rather
//! than unknown for a short while. A code is discarded after
//! [`MAX_ATTEMPTS`] wrong guesses.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use acervo_cache::CacheManager;
use acervo_cache::keys;
use acervo_core::config::auth::AuthConfig;
use acervo_core::error::AppError;
use acervo_core::result::AppResult;

use crate::password::numeric_code;

/// Number of digits in a reset code.
pub const RESET_CODE_LENGTH: usize = 6;

/// Wrong guesses allowed before the pending code is discarded.
pub const MAX_ATTEMPTS: u32 = 5;

/// How long an expired code stays around to be reported as expired.
const EXPIRED_RETENTION: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCode {
    code: String,
    expires_at: DateTime<Utc>,
    #[serde(default)]
    attempts: u32,
}

/// Issues and checks password-reset codes.
#[derive(Debug, Clone)]
pub struct ResetCodeStore {
    cache: CacheManager,
    ttl: Duration,
}

impl ResetCodeStore {
    /// Creates a store with the configured code lifetime.
    pub fn new(cache: CacheManager, config: &AuthConfig) -> Self {
        Self::with_ttl(cache, Duration::from_secs(config.reset_code_ttl_minutes * 60))
    }

    /// Creates a store with an explicit code lifetime.
    pub fn with_ttl(cache: CacheManager, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Generates a fresh code for `email`, replacing any pending one.
    pub async fn issue(&self, email: &str) -> AppResult<String> {
        let code = numeric_code(RESET_CODE_LENGTH);
        let expires_at = Utc::now()
            + chrono::Duration::from_std(self.ttl)
                .map_err(|_| AppError::configuration("Reset code TTL is out of range"))?;

        self.cache
            .set_json(
                &keys::password_reset_code(email),
                &StoredCode {
                    code: code.clone(),
                    expires_at,
                    attempts: 0,
                },
                self.ttl + EXPIRED_RETENTION,
            )
            .await?;

        debug!(%expires_at, "Issued password reset code");
        Ok(code)
    }

    /// Checks `code` for `email` without consuming it.
    pub async fn verify(&self, email: &str, code: &str) -> AppResult<()> {
        let key = keys::password_reset_code(email);
        let mut stored: StoredCode = self
            .cache
            .get_json(&key)
            .await?
            .ok_or_else(|| AppError::validation("Invalid code"))?;

        if stored.code != code.trim() {
            stored.attempts += 1;
            if stored.attempts >= MAX_ATTEMPTS {
                self.cache.delete(&key).await?;
                warn!(attempts = stored.attempts, "Reset code discarded after repeated failures");
                return Err(AppError::validation("Too many attempts, request a new code"));
            }
            let remaining = (stored.expires_at - Utc::now())
                .to_std()
                .unwrap_or(Duration::ZERO);
            self.cache
                .set_json(&key, &stored, remaining + EXPIRED_RETENTION)
                .await?;
            return Err(AppError::validation("Invalid code"));
        }
        if Utc::now() > stored.expires_at {
            self.cache.delete(&key).await?;
            return Err(AppError::validation("Code expired"));
        }
        Ok(())
    }

    /// Removes the pending code for `email`.
    pub async fn consume(&self, email: &str) -> AppResult<()> {
        self.cache.delete(&keys::password_reset_code(email)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use acervo_cache::memory::MemoryCacheProvider;
    use acervo_core::config::cache::MemoryCacheConfig;

    use super::*;

    fn store(ttl: Duration) -> ResetCodeStore {
        let provider = MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 100 });
        ResetCodeStore::with_ttl(CacheManager::from_provider(Arc::new(provider)), ttl)
    }

    #[tokio::test]
    async fn test_issue_and_verify() {
        let store = store(Duration::from_secs(900));
        let code = store.issue("ana@uni.edu").await.unwrap();
        assert_eq!(code.len(), RESET_CODE_LENGTH);

        store.verify("ANA@uni.edu", &code).await.unwrap();
        store.consume("ana@uni.edu").await.unwrap();
        let err = store.verify("ana@uni.edu", &code).await.unwrap_err();
        assert_eq!(err.message, "Invalid code");
    }

    #[tokio::test]
    async fn test_wrong_code_is_invalid() {
        let store = store(Duration::from_secs(900));
        let code = store.issue("ana@uni.edu").await.unwrap();
        let wrong = if code == "111111" { "222222" } else { "111111" };
        let err = store.verify("ana@uni.edu", wrong).await.unwrap_err();
        assert_eq!(err.message, "Invalid code");
    }

    #[tokio::test]
    async fn test_code_discarded_after_max_attempts() {
        let store = store(Duration::from_secs(900));
        let code = store.issue("ana@uni.edu").await.unwrap();
        let wrong = if code == "111111" { "222222" } else { "111111" };

        for _ in 1..MAX_ATTEMPTS {
            let err = store.verify("ana@uni.edu", wrong).await.unwrap_err();
            assert_eq!(err.message, "Invalid code");
        }
        let err = store.verify("ana@uni.edu", wrong).await.unwrap_err();
        assert_eq!(err.message, "Too many attempts, request a new code");

        let err = store.verify("ana@uni.edu", &code).await.unwrap_err();
        assert_eq!(err.message, "Invalid code");
    }

    #[tokio::test]
    async fn test_correct_code_after_a_miss() {
        let store = store(Duration::from_secs(900));
        let code = store.issue("ana@uni.edu").await.unwrap();
        let wrong = if code == "111111" { "222222" } else { "111111" };

        assert!(store.verify("ana@uni.edu", wrong).await.is_err());
        store.verify("ana@uni.edu", &code).await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_code_is_reported() {
        let store = store(Duration::from_millis(20));
        let code = store.issue("ana@uni.edu").await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;

        let err = store.verify("ana@uni.edu", &code).await.unwrap_err();
        assert_eq!(err.message, "Code expired");
    }

    #[tokio::test]
    async fn test_reissue_replaces_code() {
        let store = store(Duration::from_secs(900));
        let first = store.issue("ana@uni.edu").await.unwrap();
        let second = store.issue("ana@uni.edu").await.unwrap();
        if first != second {
            assert!(store.verify("ana@uni.edu", &first).await.is_err());
        }
        store.verify("ana@uni.edu", &second).await.unwrap();
    }
}

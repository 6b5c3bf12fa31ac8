use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::storage::{CacheData, CacheStore, StorageError};
use crate::utils::gen_random_string;

const CSRF_PREFIX: &str = "csrf";
const CSRF_TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredState {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Issues and single-use-validates anti-forgery state tokens.
///
/// Each token is keyed by the caller's session identifier, so a state value
/// issued for one session never validates for another. Validation consumes
/// the stored value on every outcome, including mismatch, so a captured
/// state cannot be used to probe the store.
pub struct CsrfStateStore {
    cache: Arc<dyn CacheStore>,
    ttl_secs: u64,
}

impl CsrfStateStore {
    pub fn new(cache: Arc<dyn CacheStore>, ttl_secs: u64) -> Self {
        Self { cache, ttl_secs }
    }

    /// Generate a random state token and store it against `session_id`.
    ///
    /// A second issue for the same session replaces the first; a session
    /// holds at most one pending state.
    pub async fn issue(&self, session_id: &str) -> Result<String, StorageError> {
        let token = gen_random_string(CSRF_TOKEN_BYTES)
            .map_err(|e| StorageError::Storage(e.to_string()))?;
        let state = StoredState {
            token: token.clone(),
            expires_at: Utc::now() + Duration::seconds(self.ttl_secs as i64),
        };
        let data = CacheData {
            value: serde_json::to_string(&state)?,
        };
        self.cache
            .put_with_ttl(CSRF_PREFIX, session_id, data, self.ttl_secs)
            .await?;
        tracing::debug!(session_id, "Issued anti-forgery state token");
        Ok(token)
    }

    /// Check `candidate` against the state stored for `session_id`.
    ///
    /// Returns true iff a token exists for the session, is unexpired, and
    /// matches exactly. The stored value is removed whatever the outcome.
    pub async fn validate_and_consume(
        &self,
        session_id: &str,
        candidate: &str,
    ) -> Result<bool, StorageError> {
        let data = self.cache.get(CSRF_PREFIX, session_id).await?;
        self.cache.remove(CSRF_PREFIX, session_id).await?;

        let Some(data) = data else {
            tracing::warn!(session_id, "No anti-forgery state stored for session");
            return Ok(false);
        };
        let state: StoredState = serde_json::from_str(&data.value)?;

        if Utc::now() > state.expires_at {
            tracing::warn!(session_id, "Anti-forgery state expired");
            return Ok(false);
        }

        let matches: bool = state
            .token
            .as_bytes()
            .ct_eq(candidate.as_bytes())
            .into();
        if !matches {
            tracing::warn!(session_id, "Anti-forgery state mismatch");
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryCacheStore;

    fn store() -> CsrfStateStore {
        CsrfStateStore::new(Arc::new(InMemoryCacheStore::new()), 300)
    }

    #[tokio::test]
    async fn test_issued_token_validates_exactly_once() {
        let csrf = store();
        let token = csrf.issue("session-a").await.unwrap();

        assert!(csrf.validate_and_consume("session-a", &token).await.unwrap());
        // Second attempt with the same value must fail
        assert!(!csrf.validate_and_consume("session-a", &token).await.unwrap());
    }

    #[tokio::test]
    async fn test_mismatch_consumes_stored_state() {
        let csrf = store();
        let token = csrf.issue("session-a").await.unwrap();

        assert!(!csrf.validate_and_consume("session-a", "wrong").await.unwrap());
        // The real token was consumed by the failed attempt
        assert!(!csrf.validate_and_consume("session-a", &token).await.unwrap());
    }

    #[tokio::test]
    async fn test_token_bound_to_session() {
        let csrf = store();
        let token = csrf.issue("session-a").await.unwrap();

        assert!(!csrf.validate_and_consume("session-b", &token).await.unwrap());
    }

    #[tokio::test]
    async fn test_never_issued_state_fails() {
        let csrf = store();
        assert!(!csrf.validate_and_consume("session-a", "anything").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_state_fails() {
        let csrf = CsrfStateStore::new(Arc::new(InMemoryCacheStore::new()), 0);
        let token = csrf.issue("session-a").await.unwrap();

        assert!(!csrf.validate_and_consume("session-a", &token).await.unwrap());
    }

    #[tokio::test]
    async fn test_reissue_replaces_previous_state() {
        let csrf = store();
        let first = csrf.issue("session-a").await.unwrap();
        let second = csrf.issue("session-a").await.unwrap();

        assert!(!csrf.validate_and_consume("session-a", &first).await.unwrap());
        // First validation consumed the slot, even though it mismatched
        assert!(!csrf.validate_and_consume("session-a", &second).await.unwrap());
    }
}

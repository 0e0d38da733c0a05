//! Access token management for the QQ API
//!
//! Caches the token returned by `/api/getToken` together with its expiry
//! and refreshes it lazily, at most once per expired period. Concurrent
//! callers that find the cache expired share a single refresh.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::client::QqClient;
use crate::clock::{Clock, ExpiryArithmetic, SystemClock};
use crate::error::QqError;
use crate::types::AccessToken;

const TOKEN_PATH: &str = "/api/getToken";

/// Last fetched token and the clock tick at which it stops being valid.
///
/// Starts empty with `expires_at == 0`, so the first lookup always refreshes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedToken {
    pub value: String,
    pub expires_at: u64,
}

impl CachedToken {
    /// Fresh only while `expires_at` is strictly after `now`.
    pub fn is_fresh(&self, now: u64) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub(crate) access_token: String,
    #[serde(default)]
    pub(crate) expires_in: u64,
    #[serde(default)]
    pub(crate) errcode: Option<i32>,
    #[serde(default)]
    pub(crate) errmsg: String,
}

/// Manages access_token lifecycle with lazy refresh
pub struct TokenManager {
    client: QqClient,
    clock: Arc<dyn Clock>,
    arithmetic: ExpiryArithmetic,
    pub(crate) cache: Mutex<CachedToken>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("client", &self.client)
            .field("arithmetic", &self.arithmetic)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Token manager on the system clock with literal expiry arithmetic.
    pub fn new(client: QqClient) -> Self {
        Self::with_clock(client, Arc::new(SystemClock), ExpiryArithmetic::default())
    }

    pub fn with_clock(
        client: QqClient,
        clock: Arc<dyn Clock>,
        arithmetic: ExpiryArithmetic,
    ) -> Self {
        Self {
            client,
            clock,
            arithmetic,
            cache: Mutex::new(CachedToken::default()),
        }
    }

    /// Return a valid access token, fetching a new one if the cached one
    /// has expired.
    ///
    /// # Errors
    /// - `QqError::Api` when the token endpoint answers with a non-zero `errcode`
    /// - `QqError::MalformedResponse` when the reply has no `errcode` or no token
    /// - `QqError::Http` when the request itself fails
    pub async fn get_token(&self) -> Result<String, QqError> {
        let mut cache = self.cache.lock().await;

        if cache.is_fresh(self.clock.now()) {
            return Ok(cache.value.clone());
        }

        log::debug!("[QqMp] access token expired, refreshing");
        let response = self.fetch_token().await?;
        QqError::check_api(response.errcode, &response.errmsg)?;

        let token = AccessToken::new(response.access_token).map_err(QqError::MalformedResponse)?;

        let now = self.clock.now();
        *cache = CachedToken {
            value: token.as_str().to_string(),
            expires_at: self.arithmetic.expires_at(now, response.expires_in),
        };
        log::debug!(
            "[QqMp] access token refreshed, expires_at={}",
            cache.expires_at
        );

        Ok(cache.value.clone())
    }

    async fn fetch_token(&self) -> Result<TokenResponse, QqError> {
        let query = [
            ("grant_type", "client_credential"),
            ("appid", self.client.appid()),
            ("secret", self.client.secret()),
        ];

        self.client.get_json(TOKEN_PATH, &query).await
    }

    /// Drop the cached token; the next call to [`get_token`](Self::get_token) refreshes.
    pub async fn invalidate(&self) {
        *self.cache.lock().await = CachedToken::default();
    }

    /// Snapshot of the cached token
    pub async fn cached(&self) -> CachedToken {
        self.cache.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::types::{AppId, AppSecret};

    fn create_test_client() -> QqClient {
        let appid = AppId::new("1110797565").unwrap();
        let secret = AppSecret::new("secret1234567890ab").unwrap();
        QqClient::new(appid, secret, "https://api.q.qq.com").unwrap()
    }

    #[tokio::test]
    async fn test_token_manager_starts_expired() {
        let manager = TokenManager::new(create_test_client());
        let cached = manager.cached().await;
        assert!(cached.value.is_empty());
        assert_eq!(cached.expires_at, 0);
        assert!(!cached.is_fresh(0));
    }

    #[test]
    fn test_cached_token_freshness_is_strict() {
        let cached = CachedToken {
            value: "T1".to_string(),
            expires_at: 8200,
        };
        assert!(cached.is_fresh(8199));
        assert!(!cached.is_fresh(8200));
        assert!(!cached.is_fresh(8201));
    }

    #[test]
    fn test_token_response_parse() {
        let json = r#"{"errcode":0,"errmsg":"","access_token":"T1","expires_in":7200}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "T1");
        assert_eq!(response.expires_in, 7200);
        assert_eq!(response.errcode, Some(0));
    }

    #[test]
    fn test_token_response_error_defaults() {
        let json = r#"{"errcode":40013,"errmsg":"invalid appid"}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert!(response.access_token.is_empty());
        assert_eq!(response.expires_in, 0);
        assert_eq!(response.errmsg, "invalid appid");
    }

    #[test]
    fn test_token_response_without_errcode() {
        let json = r#"{"access_token":"T1","expires_in":7200}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.errcode, None);
        assert!(QqError::check_api(response.errcode, &response.errmsg).is_err());
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_network() {
        // Unroutable base URL: any network call would fail.
        let client = QqClient::new(
            AppId::new("1110797565").unwrap(),
            AppSecret::new("secret").unwrap(),
            "http://127.0.0.1:1",
        )
        .unwrap();
        let clock = Arc::new(ManualClock::new(10));
        let manager = TokenManager::with_clock(client, clock, ExpiryArithmetic::Literal);

        *manager.cache.lock().await = CachedToken {
            value: "cached".to_string(),
            expires_at: 11,
        };

        assert_eq!(manager.get_token().await.unwrap(), "cached");
    }

    #[tokio::test]
    async fn test_invalidate() {
        let manager = TokenManager::new(create_test_client());

        *manager.cache.lock().await = CachedToken {
            value: "test".to_string(),
            expires_at: u64::MAX,
        };

        manager.invalidate().await;

        assert_eq!(manager.cached().await, CachedToken::default());
    }
}

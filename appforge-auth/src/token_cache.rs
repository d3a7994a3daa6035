//! Single-slot bearer token cache.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use appforge_core::{Clock, CoreError, CredentialSource, PlatformConfig, SystemClock};

use crate::exchange::{AuthExchange, TokenAuthenticator};

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Process-wide cache of the current bearer token.
///
/// A token is served from cache while `now + buffer < expires_at`; the
/// buffer keeps a token from expiring mid-flight during a long downstream
/// call. On miss the full authentication exchange runs and the slot is
/// replaced; tokens are never mutated in place.
///
/// The slot lock is held across the refresh, so concurrent misses coalesce
/// into a single exchange: late arrivals re-check the freshly written slot
/// and hit.
pub struct TokenCache {
    authenticator: Arc<dyn TokenAuthenticator>,
    clock: Arc<dyn Clock>,
    buffer: Duration,
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Creates a cache backed by the real exchange and wall clock.
    pub fn new(config: Arc<PlatformConfig>) -> Self {
        let buffer_secs = config.token_buffer_secs;
        Self::with_parts(
            Arc::new(AuthExchange::new(config)),
            Arc::new(SystemClock),
            buffer_secs,
        )
    }

    /// Creates a cache from explicit parts, for tests and embedding.
    pub fn with_parts(
        authenticator: Arc<dyn TokenAuthenticator>,
        clock: Arc<dyn Clock>,
        buffer_secs: u64,
    ) -> Self {
        Self {
            authenticator,
            clock,
            buffer: Duration::seconds(i64::try_from(buffer_secs).unwrap_or(i64::MAX)),
            slot: Mutex::new(None),
        }
    }

    /// Returns a bearer token valid for immediate use, refreshing if needed.
    pub async fn get_valid_token(&self) -> Result<String, CoreError> {
        let mut slot = self.slot.lock().await;
        let now = self.clock.now();

        if let Some(cached) = slot.as_ref() {
            if now + self.buffer < cached.expires_at {
                debug!("Token cache hit");
                return Ok(cached.value.clone());
            }
        }

        debug!("Token cache miss, running authentication exchange");
        let issued = match self.authenticator.authenticate().await {
            Ok(issued) => issued,
            Err(error) => {
                // Detail stays in the logs; the caller gets the generic error.
                warn!(error = %error, "Authentication exchange failed");
                return Err(CoreError::AuthenticationFailed);
            }
        };

        let expires_at = now + Duration::seconds(i64::try_from(issued.expires_in).unwrap_or(i64::MAX));
        *slot = Some(CachedToken {
            value: issued.access_token.clone(),
            expires_at,
        });

        Ok(issued.access_token)
    }
}

#[async_trait]
impl CredentialSource for TokenCache {
    async fn bearer_token(&self) -> Result<String, CoreError> {
        self.get_valid_token().await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use crate::exchange::IssuedToken;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex as StdMutex;

    struct FakeClock {
        now: StdMutex<DateTime<Utc>>,
    }

    impl FakeClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                now: StdMutex::new(Utc::now()),
            })
        }

        fn advance(&self, seconds: i64) {
            let mut now = self.now.lock().unwrap();
            *now += Duration::seconds(seconds);
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    struct CountingAuthenticator {
        calls: AtomicU32,
        fail: bool,
    }

    impl CountingAuthenticator {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                fail,
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenAuthenticator for CountingAuthenticator {
        async fn authenticate(&self) -> Result<IssuedToken, AuthError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AuthError::PoolConfig("HTTP 500".to_string()));
            }
            Ok(IssuedToken {
                access_token: format!("token-{call}"),
                expires_in: 3600,
            })
        }
    }

    #[tokio::test]
    async fn test_hit_performs_no_exchange() {
        let authenticator = CountingAuthenticator::new(false);
        let clock = FakeClock::new();
        let cache = TokenCache::with_parts(authenticator.clone(), clock.clone(), 300);

        assert_eq!(cache.get_valid_token().await.unwrap(), "token-0");
        assert_eq!(cache.get_valid_token().await.unwrap(), "token-0");
        assert_eq!(authenticator.calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_inside_buffer_window() {
        let authenticator = CountingAuthenticator::new(false);
        let clock = FakeClock::new();
        let cache = TokenCache::with_parts(authenticator.clone(), clock.clone(), 300);

        assert_eq!(cache.get_valid_token().await.unwrap(), "token-0");

        // 3400s in: 200s of lifetime left, inside the 300s buffer.
        clock.advance(3400);
        assert_eq!(cache.get_valid_token().await.unwrap(), "token-1");
        assert_eq!(authenticator.calls(), 2);
    }

    #[tokio::test]
    async fn test_still_fresh_outside_buffer_window() {
        let authenticator = CountingAuthenticator::new(false);
        let clock = FakeClock::new();
        let cache = TokenCache::with_parts(authenticator.clone(), clock.clone(), 300);

        cache.get_valid_token().await.unwrap();

        // 3200s in: 400s left, outside the buffer.
        clock.advance(3200);
        assert_eq!(cache.get_valid_token().await.unwrap(), "token-0");
        assert_eq!(authenticator.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_surfaces_generic_error_only() {
        let authenticator = CountingAuthenticator::new(true);
        let clock = FakeClock::new();
        let cache = TokenCache::with_parts(authenticator, clock, 300);

        let error = cache.get_valid_token().await.unwrap_err();
        assert!(matches!(error, CoreError::AuthenticationFailed));
        // The internal "HTTP 500" detail never reaches the message.
        assert_eq!(error.to_string(), "Authentication failed");
    }

    #[tokio::test]
    async fn test_concurrent_misses_coalesce() {
        let authenticator = CountingAuthenticator::new(false);
        let clock = FakeClock::new();
        let cache = Arc::new(TokenCache::with_parts(
            authenticator.clone(),
            clock,
            300,
        ));

        let a = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get_valid_token().await.unwrap() })
        };
        let b = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get_valid_token().await.unwrap() })
        };

        assert_eq!(a.await.unwrap(), "token-0");
        assert_eq!(b.await.unwrap(), "token-0");
        assert_eq!(authenticator.calls(), 1);
    }
}

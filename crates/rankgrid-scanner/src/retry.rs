//! Retry with exponential back-off and jitter for provider queries.
//!
//! Retries happen inside the client, so the orchestrator still sees exactly
//! one outcome per grid point.

use std::future::Future;
use std::time::Duration;

use crate::error::ProviderError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** network timeouts and connect failures, HTTP 429, HTTP 5xx,
/// and provider-side internal errors (`5xxxx` status codes).
///
/// **Not retriable:** auth/validation errors, malformed responses, and
/// configuration errors.
pub(crate) fn is_retriable(err: &ProviderError) -> bool {
    match err {
        ProviderError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ProviderError::RateLimited { .. } => true,
        ProviderError::UnexpectedStatus { status, .. } => *status >= 500,
        ProviderError::Api { status_code, .. } => *status_code >= 50_000,
        ProviderError::Deserialize { .. } | ProviderError::InvalidBaseUrl { .. } => false,
    }
}

/// Delay before the `attempt`-th retry (1-based).
///
/// The exponential part is scaled by `jitter`; a 429 then waits at least its
/// `Retry-After`. Capped at 60 s either way.
fn backoff_delay_ms(err: &ProviderError, attempt: u32, backoff_base_ms: u64, jitter: f64) -> u64 {
    let computed = backoff_base_ms
        .saturating_mul(1u64 << (attempt - 1).min(10))
        .min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (computed as f64 * jitter) as u64;
    let floor = match err {
        ProviderError::RateLimited { retry_after_secs } => retry_after_secs.saturating_mul(1000),
        _ => 0,
    };
    jittered.max(floor).min(MAX_DELAY_MS)
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The n-th retry sleeps `backoff_base_ms * 2^(n-1)` ms ± 25 % jitter, but no
/// less than the server's `Retry-After` on a 429, capped at 60 s. Non-retriable
/// errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let jitter = rand::random::<f64>() * 0.5 + 0.75;
                let delay_ms = backoff_delay_ms(&err, attempt, backoff_base_ms, jitter);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "provider transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn api_error(status_code: i64) -> ProviderError {
        ProviderError::Api {
            status_code,
            message: "test".to_owned(),
        }
    }

    #[test]
    fn auth_error_is_not_retriable() {
        assert!(!is_retriable(&api_error(40_100)));
    }

    #[test]
    fn internal_provider_error_is_retriable() {
        assert!(is_retriable(&api_error(50_000)));
    }

    #[test]
    fn status_codes_split_on_server_errors() {
        let status = |status| ProviderError::UnexpectedStatus {
            status,
            url: "http://x".to_owned(),
        };
        assert!(is_retriable(&status(503)));
        assert!(!is_retriable(&status(401)));
    }

    #[test]
    fn deserialize_error_is_not_retriable() {
        let source = serde_json::from_str::<()>("invalid").unwrap_err();
        assert!(!is_retriable(&ProviderError::Deserialize {
            context: "test".to_owned(),
            source,
        }));
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let err = api_error(50_000);
        assert_eq!(backoff_delay_ms(&err, 1, 500, 1.0), 500);
        assert_eq!(backoff_delay_ms(&err, 2, 500, 1.0), 1_000);
        assert_eq!(backoff_delay_ms(&err, 3, 500, 1.0), 2_000);
    }

    #[test]
    fn rate_limit_waits_at_least_retry_after() {
        let err = ProviderError::RateLimited {
            retry_after_secs: 7,
        };
        assert_eq!(backoff_delay_ms(&err, 1, 500, 1.0), 7_000);
        assert_eq!(backoff_delay_ms(&err, 5, 1_000, 1.25), 20_000);
        assert_eq!(backoff_delay_ms(&err, 1, 500, 0.75), 7_000);
    }

    #[test]
    fn backoff_is_capped() {
        let err = ProviderError::RateLimited {
            retry_after_secs: 3_600,
        };
        assert_eq!(backoff_delay_ms(&err, 1, 0, 1.0), MAX_DELAY_MS);
        assert_eq!(backoff_delay_ms(&api_error(50_000), 11, 500, 1.25), MAX_DELAY_MS);
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ProviderError>(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_rate_limit_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(ProviderError::RateLimited {
                        retry_after_secs: 0,
                    })
                } else {
                    Ok(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(api_error(50_000))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(ProviderError::Api { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_non_retriable() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(api_error(40_501))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
    }
}

//! Retry loop for catalog site requests.
//!
//! Only transport failures are retried. HTTP status codes are handed back to
//! the caller untouched, so a 404 or 500 never triggers another attempt here.

use std::future::Future;

use catpub_core::RetryPolicy;

use crate::error::ScraperError;

/// Returns `true` if `err` is a transport failure worth another attempt.
///
/// Retriable:
/// - [`ScraperError::Http`]: connection reset, timeout or TLS failure.
///
/// Everything else (status, parse and URL errors) is returned immediately.
fn is_retriable(err: &ScraperError) -> bool {
    matches!(err, ScraperError::Http(_))
}

/// Executes `operation` under `policy`, retrying transport failures.
///
/// On exhaustion the last error is returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || !policy.allows_another(attempt) {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts = policy.attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "catalog request failed, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

//! Retry with bounded exponential back-off for CMS calls.
//!
//! Callers pick the classifier: [`is_transient`] for REST writes, which also
//! retries 5xx answers, and [`is_transport`] for image downloads, where any
//! HTTP status is final.

use std::future::Future;

use catpub_core::RetryPolicy;

use crate::error::CmsError;

/// Network failures and 5xx responses.
///
/// **Not retriable:** 4xx statuses, malformed bodies, URL and domain errors.
pub(crate) fn is_transient(err: &CmsError) -> bool {
    match err {
        CmsError::Http(_) => true,
        CmsError::UnexpectedStatus { status, .. } => *status >= 500,
        CmsError::Deserialize { .. }
        | CmsError::InvalidBaseUrl { .. }
        | CmsError::MissingParent { .. }
        | CmsError::LookupUnavailable { .. }
        | CmsError::MediaUnavailable { .. }
        | CmsError::EmptyArticle => false,
    }
}

/// Network failures only.
pub(crate) fn is_transport(err: &CmsError) -> bool {
    matches!(err, CmsError::Http(_))
}

/// Runs `operation` up to `policy.attempts` times while `retriable` accepts
/// the error, sleeping per the policy's schedule between attempts.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    retriable: fn(&CmsError) -> bool,
    mut operation: F,
) -> Result<T, CmsError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CmsError>>,
{
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !retriable(&err) || !policy.allows_another(attempt) {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts = policy.attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "CMS call failed, retrying after back-off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn status(status: u16) -> CmsError {
        CmsError::UnexpectedStatus {
            status,
            url: "https://products.com/wp-json/wp/v2/posts".to_owned(),
        }
    }

    #[test]
    fn server_errors_are_transient() {
        assert!(is_transient(&status(500)));
        assert!(is_transient(&status(503)));
    }

    #[test]
    fn client_errors_are_not_transient() {
        assert!(!is_transient(&status(400)));
        assert!(!is_transient(&status(401)));
    }

    #[test]
    fn statuses_are_not_transport_errors() {
        assert!(!is_transport(&status(503)));
    }

    #[test]
    fn deserialize_error_is_not_transient() {
        let src = serde_json::from_str::<()>("invalid").unwrap_err();
        assert!(!is_transient(&CmsError::Deserialize {
            context: "test".to_owned(),
            source: src,
        }));
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(RetryPolicy::immediate(8), is_transient, || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err::<u32, _>(status(502))
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
    async fn stops_at_attempt_cap() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(RetryPolicy::immediate(5), is_transient, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(status(500))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert!(matches!(
            result,
            Err(CmsError::UnexpectedStatus { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(RetryPolicy::immediate(5), is_transient, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(status(403))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
    }
}

//! Bounded exponential back-off schedules.
//!
//! Each client crate owns its own retry loop and decides which of its errors
//! are transient; this type only describes how many attempts to make and how
//! long to wait between them.

use std::time::Duration;

/// Attempt cap and delay schedule for one kind of remote call.
///
/// The wait before retry `n` (1-based) is
/// `initial_delay * backoff_factor^(n-1)`, capped at `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `0` behaves like `1`.
    pub attempts: u32,
    pub initial_delay: Duration,
    pub backoff_factor: u32,
    pub max_delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(
        attempts: u32,
        initial_delay: Duration,
        backoff_factor: u32,
        max_delay: Duration,
    ) -> Self {
        Self {
            attempts,
            initial_delay,
            backoff_factor,
            max_delay,
        }
    }

    /// Catalog page fetch: 5 tries, 10 s, x2, capped at 120 s.
    #[must_use]
    pub const fn page_fetch() -> Self {
        Self::new(5, Duration::from_secs(10), 2, Duration::from_secs(120))
    }

    /// Existence lookup: 3 tries, 2 s, x2, capped at 30 s.
    #[must_use]
    pub const fn existence_lookup() -> Self {
        Self::new(3, Duration::from_secs(2), 2, Duration::from_secs(30))
    }

    /// Category create-or-get: 5 tries, 1 s, x2.
    #[must_use]
    pub const fn category_create() -> Self {
        Self::new(5, Duration::from_secs(1), 2, Duration::from_secs(60))
    }

    /// Image download: 6 tries, 2 s, x2.
    #[must_use]
    pub const fn image_download() -> Self {
        Self::new(6, Duration::from_secs(2), 2, Duration::from_secs(60))
    }

    /// Media upload: 8 tries, 1 s, x2.
    #[must_use]
    pub const fn media_upload() -> Self {
        Self::new(8, Duration::from_secs(1), 2, Duration::from_secs(60))
    }

    /// Article create or update: 8 tries, 1 s, x2.
    #[must_use]
    pub const fn article_write() -> Self {
        Self::new(8, Duration::from_secs(1), 2, Duration::from_secs(60))
    }

    /// `attempts` tries with no waiting in between. Intended for tests.
    #[must_use]
    pub const fn immediate(attempts: u32) -> Self {
        Self::new(attempts, Duration::ZERO, 1, Duration::ZERO)
    }

    /// Delay to sleep before the `retry`-th retry (1-based).
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        let multiplier = self.backoff_factor.max(1).saturating_pow(exponent);
        self.initial_delay
            .saturating_mul(multiplier)
            .min(self.max_delay)
    }

    /// Whether another attempt may follow attempt number `attempt` (1-based).
    #[must_use]
    pub fn allows_another(&self, attempt: u32) -> bool {
        attempt < self.attempts.max(1)
    }
}

//! Retry utilities for rate-limited API requests.
//!
//! Primary and secondary rate-limit signals from the GitHub API are retried
//! here, inside the client layer, so the sync pipeline above never sees them
//! unless the backoff budget is exhausted.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

/// Initial backoff delay in milliseconds.
pub const INITIAL_BACKOFF_MS: u64 = 1_000;

/// Maximum backoff delay in milliseconds when rate limited.
pub const MAX_BACKOFF_MS: u64 = 60_000;

/// Maximum retries for a single request.
pub const MAX_RATE_LIMIT_RETRIES: usize = 5;

/// Configuration for retry operations.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Minimum delay between retries.
    pub min_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Maximum number of retry attempts.
    pub max_retries: usize,
    /// Whether to add jitter to delays.
    pub with_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_delay: Duration::from_millis(MAX_BACKOFF_MS),
            max_retries: MAX_RATE_LIMIT_RETRIES,
            with_jitter: true,
        }
    }
}

impl RetryConfig {
    /// Build an exponential backoff strategy from this configuration.
    #[must_use]
    pub fn into_backoff(self) -> ExponentialBuilder {
        let mut builder = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries);

        if self.with_jitter {
            builder = builder.with_jitter();
        }

        builder
    }
}

/// The standard backoff for rate-limited requests: 1s initial delay, 60s cap,
/// 5 attempts, jitter enabled.
#[must_use]
pub fn default_backoff() -> ExponentialBuilder {
    RetryConfig::default().into_backoff()
}

/// Execute `operation`, retrying while `is_rate_limit` classifies the error
/// as a rate-limit signal. Each retry is logged at warn level.
pub async fn with_retry<T, E, F, Fut, IsRateLimit>(
    operation: F,
    is_rate_limit: IsRateLimit,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    IsRateLimit: Fn(&E) -> bool,
{
    operation
        .retry(default_backoff())
        .notify(|err, dur| {
            tracing::warn!(
                retry_after_ms = dur.as_millis() as u64,
                error = %err,
                "Rate limited, backing off"
            );
        })
        .when(is_rate_limit)
        .await
}

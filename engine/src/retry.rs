//! Bounded retry with exponential backoff for generator calls.

use std::future::Future;
use std::time::Duration;

use crate::error::GenerateError;

/// Retry behavior applied to each individual generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first (default: 3).
    pub max_retries: u32,
    /// Delay before the second attempt; doubles for each attempt after
    /// (default: 1s).
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Sets the maximum number of attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Sets the delay before the second attempt.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Backoff delay inserted after a failed attempt (1-indexed), i.e. the
    /// delay before attempt `k` is `initial_delay * 2^(k - 2)`.
    #[must_use]
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Runs `op` up to `policy.max_retries` times, sleeping between attempts.
///
/// `op` receives the 1-indexed attempt number. Only failures classified
/// transient by [`GenerateError::is_transient`] are retried; terminal
/// failures and the last transient failure are returned as-is. The backoff
/// is fully serialized: the caller suspends for the whole delay before the
/// next attempt starts.
pub async fn with_retry<T, F, Fut>(mut op: F, policy: &RetryPolicy) -> Result<T, GenerateError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, GenerateError>>,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                let delay = policy.backoff_after(attempt);
                tracing::warn!(
                    event = "generation_retry",
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient generation failure, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

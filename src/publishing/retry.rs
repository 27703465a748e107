//! # Bounded Retry with Backoff
//!
//! Shared retry combinator used by the orchestrator's publish loop and the
//! validator's confirmation loop, parameterized by a backoff policy so the
//! linear and exponential-capped variants share one implementation.

use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Base delay for the generic exponential retry-delay helper.
pub const BASE_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Cap applied to the exponential retry-delay helper.
pub const MAX_RETRY_DELAY: Duration = Duration::from_millis(30_000);

/// Backoff schedule between retry attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffPolicy {
    /// `delay * attempt` after the Nth failed attempt (1-based).
    Linear { delay: Duration },
    /// `base * 2^(attempt-1)`, capped at `max`.
    ExponentialCapped { base: Duration, max: Duration },
}

impl BackoffPolicy {
    /// Delay to wait after the given failed attempt number (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match *self {
            BackoffPolicy::Linear { delay } => delay * attempt,
            BackoffPolicy::ExponentialCapped { base, max } => {
                let multiplier = 2f64.powi(attempt.saturating_sub(1).min(30) as i32);
                base.mul_f64(multiplier).min(max)
            }
        }
    }
}

/// Exponential-capped retry delay: `min(1000ms * 2^(attempt-1), 30s)`.
pub fn retry_delay(attempt: u32) -> Duration {
    BackoffPolicy::ExponentialCapped {
        base: BASE_RETRY_DELAY,
        max: MAX_RETRY_DELAY,
    }
    .delay_for(attempt)
}

/// Run `operation` up to `max_attempts` times, sleeping per `policy` between
/// failed attempts. The closure receives the 1-based attempt number. Returns
/// the first success, or the error from the final attempt.
pub async fn retry_with_backoff<T, E, F, Fut>(
    max_attempts: u32,
    policy: BackoffPolicy,
    mut operation: F,
) -> std::result::Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < max_attempts => {
                let delay = policy.delay_for(attempt);
                debug!(
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Attempt failed, backing off before retry"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

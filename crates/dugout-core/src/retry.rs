//! Bounded retry with exponential backoff.

use std::fmt::Display;
use std::time::Duration;

use crate::throttling::Sleeper;

/// How many times to attempt a remote call and how long to wait in between.
///
/// The wait before attempt `n + 1` is `backoff_factor ^ n` seconds. There is
/// no jitter and no cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, backoff_factor: f64) -> Self {
        Self {
            max_attempts,
            backoff_factor,
        }
    }

    /// Delay after failed attempt number `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let seconds = self.backoff_factor.powf(f64::from(attempt));
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }
}

/// Run `operation` until it succeeds or `policy.max_attempts` is exhausted.
///
/// The last error is returned unchanged.
pub fn with_retry<T, E, F>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    label: &str,
    mut operation: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Result<T, E>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(error) if attempt < max_attempts => {
                let delay = policy.delay(attempt);
                tracing::warn!(
                    operation = label,
                    attempt,
                    max_attempts,
                    retry_in_secs = delay.as_secs_f64(),
                    error = %error,
                    "remote call failed, retrying"
                );
                sleeper.sleep(delay);
                attempt += 1;
            }
            Err(error) => {
                tracing::error!(
                    operation = label,
                    attempts = attempt,
                    error = %error,
                    "remote call failed, giving up"
                );
                return Err(error);
            }
        }
    }
}

//! Fixed-delay pacing for remote calls.

use std::cell::RefCell;
use std::time::Duration;

/// Suspends the current thread. Every wait in the extraction goes through one.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Blocks the calling thread for real.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Records requested sleeps instead of waiting.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slept(&self) -> Vec<Duration> {
        self.slept.borrow().clone()
    }

    pub fn total(&self) -> Duration {
        self.slept.borrow().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

/// Pauses for a fixed delay before each outbound call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Builds a limiter from a delay in seconds; negative or non-finite
    /// values collapse to no delay.
    pub fn from_secs_f64(seconds: f64) -> Self {
        Self::new(Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO))
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    pub fn pace(&self, sleeper: &dyn Sleeper) {
        sleeper.sleep(self.delay);
    }
}

/// Pause once, then invoke `operation`.
pub fn with_rate_limit<T, F>(limiter: &RateLimiter, sleeper: &dyn Sleeper, operation: F) -> T
where
    F: FnOnce() -> T,
{
    limiter.pace(sleeper);
    operation()
}

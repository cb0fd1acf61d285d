//! Bounded retry with exponential backoff for store writes
//!
//! Only lock contention (`SQLITE_BUSY` / `SQLITE_LOCKED`) is retried.
//! - Max attempts: 5
//! - Delay: 10ms doubling, capped at 160ms, ±25% jitter

use crate::errors::{AgentError, Result};
use std::time::Duration;
use tracing::warn;

/// Maximum number of attempts
pub const MAX_RETRIES: u32 = 5;

/// Base delay for exponential backoff
const BASE_DELAY_MS: u64 = 10;

/// Maximum delay cap
const MAX_DELAY_MS: u64 = 160;

/// Retry policy for the write critical section
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum attempts, first one included
    max_retries: u32,

    /// Base delay in milliseconds
    base_delay_ms: u64,

    /// Maximum delay cap in milliseconds
    max_delay_ms: u64,

    /// Enable jitter
    enable_jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            base_delay_ms: BASE_DELAY_MS,
            max_delay_ms: MAX_DELAY_MS,
            enable_jitter: true,
        }
    }

    pub fn with_config(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries: max_retries.max(1),
            base_delay_ms,
            max_delay_ms: MAX_DELAY_MS,
            enable_jitter: true,
        }
    }

    /// Run `operation`, retrying while it fails with a busy error.
    /// The last error is returned once attempts are exhausted.
    pub fn run<T, F>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        let mut attempt = 0;

        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if !Self::is_retryable(&e) {
                        return Err(e);
                    }

                    attempt += 1;
                    if attempt >= self.max_retries {
                        warn!(attempts = attempt, error = %e, "store write gave up after retries");
                        return Err(e);
                    }

                    let delay = self.calculate_delay(attempt);
                    warn!(attempt, delay_ms = delay.as_millis() as u64, "store busy, retrying");
                    std::thread::sleep(delay);
                }
            }
        }
    }

    fn calculate_delay(&self, attempt: u32) -> Duration {
        let exponential_delay = self.base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
        let delay_ms = exponential_delay.min(self.max_delay_ms);

        let final_delay = if self.enable_jitter {
            let jitter = (delay_ms / 4) as i64;
            let random_jitter = (rand::random::<f64>() * 2.0 - 1.0) * jitter as f64;
            ((delay_ms as i64) + random_jitter as i64).max(0) as u64
        } else {
            delay_ms
        };

        Duration::from_millis(final_delay)
    }

    fn is_retryable(error: &AgentError) -> bool {
        error.is_busy()
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy() -> AgentError {
        AgentError::Storage(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        ))
    }

    #[test]
    fn test_success_first_attempt() {
        let policy = RetryPolicy::new();
        let mut calls = 0;
        let result = policy.run(|| {
            calls += 1;
            Ok::<_, AgentError>(42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_success_after_busy() {
        let policy = RetryPolicy::with_config(5, 1);
        let mut calls = 0;
        let result = policy.run(|| {
            calls += 1;
            if calls < 3 {
                Err(busy())
            } else {
                Ok(7)
            }
        });
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_gives_up_after_max() {
        let policy = RetryPolicy::with_config(3, 1);
        let mut calls = 0;
        let result: Result<()> = policy.run(|| {
            calls += 1;
            Err(busy())
        });
        assert!(result.unwrap_err().is_busy());
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_non_busy_error_not_retried() {
        let policy = RetryPolicy::new();
        let mut calls = 0;
        let result: Result<()> = policy.run(|| {
            calls += 1;
            Err(AgentError::Generic("permanent".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_delay_cap() {
        let policy = RetryPolicy {
            max_retries: 5,
            base_delay_ms: BASE_DELAY_MS,
            max_delay_ms: MAX_DELAY_MS,
            enable_jitter: false,
        };
        assert_eq!(policy.calculate_delay(1), Duration::from_millis(20));
        assert_eq!(policy.calculate_delay(10), Duration::from_millis(MAX_DELAY_MS));
    }
}

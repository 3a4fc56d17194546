//! Retry policy applied around every provider call.
//!
//! Exponential backoff: the wait before retry `n` (0-based) is
//! `base_delay * multiplier^n`, capped at `max_delay`. Only errors accepted by
//! the policy's predicate are retried.

use std::future::Future;
use std::time::Duration;

use super::clock::Clock;
use super::error::ProviderError;

/// Predicate deciding whether an error is worth another attempt.
pub type RetryPredicate = fn(&ProviderError) -> bool;

/// Configuration for retry behavior.
#[derive(Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Wait before the first retry
    pub base_delay: Duration,
    /// Growth factor between consecutive waits
    pub multiplier: u32,
    /// Upper bound for any single wait
    pub max_delay: Duration,
    /// Which errors are retried
    pub retry_on: RetryPredicate,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            multiplier: 2,
            max_delay: Duration::from_secs(10),
            retry_on: ProviderError::is_transient,
        }
    }
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .field("multiplier", &self.multiplier)
            .field("max_delay", &self.max_delay)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    /// Policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Check if the given error should be retried based on this policy.
    pub fn should_retry(&self, error: &ProviderError) -> bool {
        (self.retry_on)(error)
    }

    /// Wait before retry number `retry` (0 for the wait after the first failure).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(retry);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. `op` receives the 1-based attempt number.
    ///
    /// On exhaustion the error of the last attempt is returned.
    pub async fn run<T, F, Fut>(
        &self,
        clock: &dyn Clock,
        operation: &str,
        mut op: F,
    ) -> Result<T, ProviderError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!("{} succeeded on attempt {}", operation, attempt);
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if !self.should_retry(&error) {
                        tracing::error!("{} failed (non-retryable): {}", operation, error);
                        return Err(error);
                    }
                    if attempt >= max_attempts {
                        tracing::error!(
                            "{} failed after {} attempts: {}",
                            operation,
                            attempt,
                            error
                        );
                        return Err(error);
                    }

                    let delay = self.delay_for(attempt - 1);
                    tracing::warn!(
                        "{} attempt {} failed with {}, retrying in {:?}: {}",
                        operation,
                        attempt,
                        error.kind,
                        delay,
                        error.message
                    );
                    clock.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::clock::testing::RecordingClock;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_exponential_backoff_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(8));
        assert_eq!(policy.delay_for(4), Duration::from_secs(10));
        assert_eq!(policy.delay_for(40), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_waits_between_transient_failures() {
        let clock = RecordingClock::at(Utc::now());
        let calls = AtomicU32::new(0);

        let out = RetryPolicy::default()
            .run(&clock, "op", |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(ProviderError::rate_limited("slow down"))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(out.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_custom_predicate_is_honored() {
        let clock = RecordingClock::at(Utc::now());
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            retry_on: |e| e.status_code == Some(503),
            ..RetryPolicy::default()
        };

        let out: Result<(), _> = policy
            .run(&clock, "op", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ProviderError::server_error(503, "unavailable")) }
            })
            .await;

        assert!(out.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_no_retry_makes_single_attempt() {
        let clock = RecordingClock::at(Utc::now());
        let calls = AtomicU32::new(0);

        let out: Result<(), _> = RetryPolicy::no_retry()
            .run(&clock, "op", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ProviderError::rate_limited("busy")) }
            })
            .await;

        assert!(out.unwrap_err().is_transient());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(clock.sleeps().is_empty());
    }
}

//! Retry with exponential backoff for record store calls.
//!
//! Every [`RecordClient`](crate::RecordClient) operation runs through
//! [`RetryPolicy::run`]. Only [`StoreError::Transient`] failures are retried;
//! everything else surfaces on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::StoreError;

/// Fixed backoff policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Factor applied to the delay after each retry.
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay slept after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        request = label,
                        error = %e,
                        "Record store call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_retryable() {
                        tracing::error!(
                            attempts = attempt,
                            request = label,
                            error = %e,
                            "Record store call failed after all retries"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use assert_matches::assert_matches;
    use tokio::time::Instant;

    use super::*;

    fn unavailable() -> StoreError {
        StoreError::from_status(503, "Service Unavailable".into())
    }

    #[test]
    fn delays_double_from_one_second() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_use_all_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let started = Instant::now();

        let result: Result<(), _> = RetryPolicy::default()
            .run("GET test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(unavailable())
            })
            .await;

        assert_matches!(result, Err(StoreError::Transient { status: Some(503), .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1s after the first failure, 2s after the second, none after the last.
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_failure_is_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let started = Instant::now();

        let result: Result<(), _> = RetryPolicy::default()
            .run("GET test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(StoreError::from_status(404, "Not Found".into()))
            })
            .await;

        assert_matches!(result, Err(StoreError::Permanent { status: 404, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_a_transient_failure() {
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result = RetryPolicy::default()
            .run("GET test", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(StoreError::Transient {
                        status: None,
                        message: "connection reset".into(),
                    })
                } else {
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn none_policy_runs_once() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = RetryPolicy::none()
            .run("GET test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(unavailable())
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

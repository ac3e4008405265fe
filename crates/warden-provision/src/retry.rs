//! Retrying, audited step execution.
//!
//! Every provisioning side effect runs through [`run_step`]: one closure,
//! one policy, one structured log trail covering start, success (with
//! duration) and failure (with error text). Only errors that report
//! themselves retryable are reattempted, with exponential backoff;
//! everything else surfaces immediately and untouched.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use warden_connector::ConnectorError;
use warden_secrets::SecretError;

/// Errors that can ask to be retried.
pub trait Retryable {
    /// True when a later attempt may succeed (throttling).
    fn is_retryable(&self) -> bool;
}

impl Retryable for ConnectorError {
    fn is_retryable(&self) -> bool {
        self.is_transient()
    }
}

impl Retryable for SecretError {
    fn is_retryable(&self) -> bool {
        self.is_transient()
    }
}

/// Bounded exponential backoff for throttled steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry that follows failed attempt `attempt`
    /// (0-indexed): the base delay doubled per attempt, capped at
    /// `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as f64;
        let scaled_ms = base_ms * 2f64.powi(attempt as i32);
        let capped_ms = scaled_ms.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped_ms as u64)
    }
}

/// Run one provisioning step under the given retry policy.
///
/// Logging records the step's fate either way and never changes what the
/// caller gets back. Retryable failures are reattempted up to the policy
/// bound, then the last error is returned as-is.
pub async fn run_step<F, Fut, T, E>(
    step: &str,
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + fmt::Display,
{
    let started = Instant::now();
    debug!(step = %step, "step started");

    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                info!(
                    step = %step,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "step completed"
                );
                return Ok(value);
            }
            Err(err) if err.is_retryable() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                attempt += 1;
                warn!(
                    step = %step,
                    attempt,
                    max_attempts = policy.max_retries + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "step throttled, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                warn!(
                    step = %step,
                    duration_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "step failed"
                );
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_first_try_success_runs_once() {
        let calls = AtomicUsize::new(0);
        let result = run_step("step", &fast_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ConnectorError>(7) }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_throttling_is_retried_until_success() {
        let calls = AtomicUsize::new(0);
        let result = run_step("step", &fast_policy(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ConnectorError::throttled("Rate exceeded"))
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_fail_immediately() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = run_step("step", &fast_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ConnectorError::already_exists("jdoe")) }
        })
        .await;

        assert_eq!(result.unwrap_err().error_code(), "ALREADY_EXISTS");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_retries_return_the_throttle_error() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = run_step("step", &fast_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ConnectorError::throttled("Rate exceeded")) }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.error_code(), "THROTTLED");
        // One try plus two retries.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_delay_doubles_from_base() {
        let policy = RetryPolicy {
            max_retries: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_respects_cap() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(10), Duration::from_secs(30));
    }

    #[test]
    fn test_secret_errors_share_the_retry_predicate() {
        assert!(SecretError::Throttled {
            detail: "Rate exceeded".to_string()
        }
        .is_retryable());
        assert!(!SecretError::ConfigError {
            detail: "missing region".to_string()
        }
        .is_retryable());
    }
}

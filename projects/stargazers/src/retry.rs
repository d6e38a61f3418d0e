use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Fixed-delay retry: up to `max_retries` extra attempts, `delay` apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }
}

/// Runs `operation` until it succeeds or the policy is exhausted.
///
/// Returns the last error once `max_retries + 1` attempts have failed.
pub async fn with_retry<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(retries = attempt, "succeeded after retrying");
                }
                return Ok(value);
            }
            Err(err) if attempt >= policy.max_retries => {
                warn!(attempts = attempt + 1, error = %err, "giving up");
                return Err(err);
            }
            Err(err) => {
                attempt += 1;
                warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_secs = policy.delay.as_secs_f64(),
                    error = %err,
                    "attempt failed, retrying"
                );
                sleep(policy.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn first_success_is_returned_without_retrying() {
        let calls = AtomicU32::new(0);

        let result = with_retry(&fast(2), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, &str>(7)
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let calls = AtomicU32::new(0);

        let result = with_retry(&fast(2), || async {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call < 3 {
                Err("flaky")
            } else {
                Ok(call)
            }
        })
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries_plus_one_attempts() {
        let calls = AtomicU32::new(0);

        let result = with_retry(&fast(2), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>("down")
        })
        .await;

        assert_eq!(result, Err("down"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn no_retries_means_a_single_attempt() {
        let calls = AtomicU32::new(0);

        let result = with_retry(&RetryPolicy::none(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>("down")
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

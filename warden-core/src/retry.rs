use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::error::{AclError, Result};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryConfig {
    fn first_delay(&self) -> u64 {
        self.initial_delay_ms.min(self.max_delay_ms)
    }

    fn next_delay(&self, delay: u64) -> u64 {
        delay.saturating_mul(2).min(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 10,
            max_delay_ms: 200,
        }
    }
}

/// Only write-write conflicts are worth re-running; the unit of work reloads
/// the authoritative ACL on every attempt.
pub fn is_retriable_error(err: &AclError) -> bool {
    err.is_conflict()
}

/// Run a reload-modify-write unit of work, re-running it when the store
/// reports a conflicting concurrent update.
pub async fn with_conflict_retry<F, Fut, T>(
    operation: &str,
    config: &RetryConfig,
    mut f: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;
    let mut delay = config.first_delay();

    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retriable_error(&err) && attempt < max_attempts => {
                warn!(
                    "{} hit a concurrent modification (attempt {}/{}), retrying in {}ms: {}",
                    operation, attempt, max_attempts, delay, err
                );
                sleep(Duration::from_millis(delay)).await;
                delay = config.next_delay(delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use warden_types::AclId;

    fn conflict() -> AclError {
        AclError::Conflict {
            acl: AclId::new(),
            expected: 1,
            actual: 2,
        }
    }

    fn fast_config(max_attempts: usize) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    #[test]
    fn test_delays_stay_within_maximum() {
        let config = RetryConfig {
            max_attempts: 3,
            initial_delay_ms: u64::MAX,
            max_delay_ms: 200,
        };

        assert_eq!(config.first_delay(), 200);
        assert_eq!(config.next_delay(u64::MAX), 200);
        assert_eq!(RetryConfig::default().next_delay(10), 20);
        assert_eq!(RetryConfig::default().next_delay(150), 200);
    }

    #[tokio::test]
    async fn test_retries_conflicts_until_success() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result = with_conflict_retry("test", &fast_config(3), move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(conflict())
            } else {
                Ok(42)
            }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<()> = with_conflict_retry("test", &fast_config(2), move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(conflict())
        })
        .await;

        assert!(result.unwrap_err().is_conflict());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_does_not_retry_other_errors() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<()> = with_conflict_retry("test", &fast_config(5), move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AclError::acl_not_found(&AclId::new()))
        })
        .await;

        assert!(result.unwrap_err().is_not_found());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

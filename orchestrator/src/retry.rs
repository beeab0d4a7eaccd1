//! Exponential-backoff retry for store writes: a handful of attempts,
//! doubling backoff up to a cap, retrying only on transient store errors.

use std::future::Future;
use std::time::Duration;

use nsi_store::StoreError;

/// Runs `op` up to `max_attempts` times. Retries only while the error is
/// `StoreError::is_transient()`; any other error (or exhausting the
/// attempts) returns immediately with the last error.
pub async fn retry_transient<F, Fut, T>(
    max_attempts: u32,
    base_backoff: Duration,
    max_backoff: Duration,
    mut op: F,
) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut attempt = 0;
    let mut backoff = base_backoff;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts && err.is_transient() => {
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(max_backoff);
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retries_transient_then_succeeds() {
        let attempts = AtomicU32::new(0);
        let result = retry_transient(3, Duration::from_millis(1), Duration::from_millis(5), || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(StoreError::Transient("locked".to_string()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_transient_error_is_not_retried() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), StoreError> =
            retry_transient(3, Duration::from_millis(1), Duration::from_millis(5), || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(StoreError::NotFound) }
            })
            .await;
        assert_eq!(result, Err(StoreError::NotFound));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausting_attempts_returns_last_error() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), StoreError> =
            retry_transient(3, Duration::from_millis(1), Duration::from_millis(5), || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(StoreError::Transient("still locked".to_string())) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }
}

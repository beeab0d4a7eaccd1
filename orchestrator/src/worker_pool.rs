//! Bounded-concurrency dispatch over a list of items, grounded on
//! `rag-store::embed_pool::embed_missing`'s `futures::stream::iter(..)
//! .buffer_unordered(concurrency)` shape: async I/O work is throttled by
//! how many futures are driven concurrently, not by spawning OS-level
//! tasks, so per-item closures can freely borrow shared state instead of
//! needing to be `'static`.

use futures::stream::{self, StreamExt};

/// Runs `work` once per item in `items`, with at most `concurrency` futures
/// in flight at a time. Results come back in the same order as `items`.
pub async fn run_bounded<T, F, Fut, R>(items: Vec<T>, concurrency: usize, work: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    stream::iter(items)
        .map(work)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn runs_every_item() {
        let results = run_bounded(vec![1, 2, 3, 4], 2, |n| async move { n * 10 }).await;
        let mut values = results;
        values.sort();
        assert_eq!(values, vec![10, 20, 30, 40]);
    }

    #[tokio::test]
    async fn never_exceeds_concurrency_limit() {
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let items: Vec<i32> = (0..8).collect();

        run_bounded(items, 2, |_| async {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
        })
        .await;

        assert!(peak.load(Ordering::SeqCst) <= 2);
    }
}

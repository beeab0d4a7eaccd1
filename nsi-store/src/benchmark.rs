//! Benchmark lookup boundary (`find_best_match`) with a short-lived
//! TTL cache in front of it (default TTL 5 min, size cap 1000,
//! expired-entry reaping when the cap is hit).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use nsi_model::Benchmark;
use tokio::sync::Mutex;

use crate::error::StoreError;

/// Looks up curated reference data by tax-id, alt-tax-id or normalized name.
pub trait BenchmarkFinder: Send + Sync {
    fn find_best_match(
        &self,
        name: &str,
        entity_type: &str,
    ) -> impl Future<Output = Result<Option<Benchmark>, StoreError>> + Send;
}

/// An in-memory set of curated benchmarks, matched by normalized-name
/// equality (a relational adapter would also index by tax_id/alt_tax_id).
#[derive(Clone, Default)]
pub struct InMemoryBenchmarkFinder {
    benchmarks: Arc<Vec<Benchmark>>,
}

impl InMemoryBenchmarkFinder {
    pub fn new(benchmarks: Vec<Benchmark>) -> Self {
        Self {
            benchmarks: Arc::new(benchmarks),
        }
    }
}

impl BenchmarkFinder for InMemoryBenchmarkFinder {
    async fn find_best_match(
        &self,
        name: &str,
        _entity_type: &str,
    ) -> Result<Option<Benchmark>, StoreError> {
        Ok(self.benchmarks.iter().find(|b| b.normalized_name == name).cloned())
    }
}

struct CacheEntry {
    value: Option<Benchmark>,
    inserted_at: Instant,
}

/// Wraps any [`BenchmarkFinder`] with a TTL + size-capped cache keyed by
/// `(name, entity_type)`, so repeated lookups for the same item during a
/// batch don't re-hit the underlying store.
pub struct CachedBenchmarkFinder<F> {
    inner: F,
    cache: Mutex<HashMap<(String, String), CacheEntry>>,
    ttl: Duration,
    capacity: usize,
}

impl<F: BenchmarkFinder> CachedBenchmarkFinder<F> {
    pub fn new(inner: F, ttl: Duration, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
            ttl,
            capacity,
        }
    }

    pub fn with_defaults(inner: F) -> Self {
        Self::new(inner, Duration::from_secs(300), 1000)
    }

    async fn reap_expired(&self, cache: &mut HashMap<(String, String), CacheEntry>) {
        let ttl = self.ttl;
        cache.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
    }
}

impl<F: BenchmarkFinder + Send + Sync> BenchmarkFinder for CachedBenchmarkFinder<F> {
    async fn find_best_match(
        &self,
        name: &str,
        entity_type: &str,
    ) -> Result<Option<Benchmark>, StoreError> {
        let key = (name.to_string(), entity_type.to_string());
        {
            let mut cache = self.cache.lock().await;
            if let Some(entry) = cache.get(&key) {
                if entry.inserted_at.elapsed() < self.ttl {
                    return Ok(entry.value.clone());
                }
            }
            self.reap_expired(&mut cache).await;
        }

        let value = self.inner.find_best_match(name, entity_type).await?;

        let mut cache = self.cache.lock().await;
        if cache.len() >= self.capacity {
            self.reap_expired(&mut cache).await;
        }
        if cache.len() < self.capacity {
            cache.insert(
                key,
                CacheEntry {
                    value: value.clone(),
                    inserted_at: Instant::now(),
                },
            );
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsi_model::ids::{stable_uuid, NAMESPACE_CANONICAL};

    fn sample_benchmark() -> Benchmark {
        Benchmark {
            id: stable_uuid(&NAMESPACE_CANONICAL, "bench:b1"),
            project_id: stable_uuid(&NAMESPACE_CANONICAL, "proj:p1"),
            canonical_name: "ООО Ромашка".to_string(),
            normalized_name: "Ромашка".to_string(),
            tax_id: Some("7701234567".to_string()),
            secondary_id: None,
            alt_tax_id: None,
            legal_form: None,
            legal_address: None,
            postal_address: None,
            phone: None,
            email: None,
            bank_name: None,
            bank_account: None,
            correspondent_account: None,
            bank_code: None,
            confidence: 0.95,
        }
    }

    #[tokio::test]
    async fn finds_exact_normalized_name_match() {
        let finder = InMemoryBenchmarkFinder::new(vec![sample_benchmark()]);
        let found = finder.find_best_match("Ромашка", "product").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn cache_serves_repeat_lookups() {
        let finder = CachedBenchmarkFinder::with_defaults(InMemoryBenchmarkFinder::new(vec![
            sample_benchmark(),
        ]));
        let first = finder.find_best_match("Ромашка", "product").await.unwrap();
        let second = finder.find_best_match("Ромашка", "product").await.unwrap();
        assert_eq!(first, second);
    }
}

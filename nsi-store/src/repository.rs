//! The `CounterpartyRepository` trait and an in-memory reference
//! implementation.
//!
//! The trait uses native `async fn` methods rather than `#[async_trait]`:
//! callers are generic over `R: CounterpartyRepository` (dedup-engine,
//! orchestrator) instead of holding a `dyn` object, so no boxing or extra
//! dependency is needed for this crate's seam.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use nsi_model::{CanonicalId, CatalogItem, NormalizedCounterparty, ProjectId, SourceLink};
use tokio::sync::Mutex;

use crate::error::StoreError;

/// An opaque handle to an in-flight transaction, returned by
/// `begin_transaction` and consumed by `commit_transaction` /
/// `rollback_transaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionHandle(u64);

/// Storage boundary for canonical counterparties, their source links, and
/// the read-only catalog.
pub trait CounterpartyRepository: Send + Sync {
    fn get_normalized_by_source_ref(
        &self,
        project_id: ProjectId,
        database_id: i64,
        source_reference: &str,
    ) -> impl Future<Output = Result<Option<NormalizedCounterparty>, StoreError>> + Send;

    fn save_normalized(
        &self,
        record: NormalizedCounterparty,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn update_normalized(
        &self,
        record: NormalizedCounterparty,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn save_source_link(
        &self,
        link: SourceLink,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn get_source_links(
        &self,
        canonical_id: CanonicalId,
    ) -> impl Future<Output = Result<Vec<SourceLink>, StoreError>> + Send;

    fn list_project_databases(
        &self,
        project_id: ProjectId,
    ) -> impl Future<Output = Result<Vec<i64>, StoreError>> + Send;

    fn list_catalog_items_by_database(
        &self,
        database_id: i64,
    ) -> impl Future<Output = Result<Vec<CatalogItem>, StoreError>> + Send;

    /// Every canonical record currently belonging to a project, required by
    /// the dedup pass's full-population sweep.
    fn list_canonical_records(
        &self,
        project_id: ProjectId,
    ) -> impl Future<Output = Result<Vec<NormalizedCounterparty>, StoreError>> + Send;

    fn begin_transaction(&self) -> impl Future<Output = Result<TransactionHandle, StoreError>> + Send;

    fn commit_transaction(
        &self,
        handle: TransactionHandle,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn rollback_transaction(
        &self,
        handle: TransactionHandle,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Default)]
struct State {
    canonical: HashMap<CanonicalId, NormalizedCounterparty>,
    source_links: Vec<SourceLink>,
    catalog_items_by_db: HashMap<i64, Vec<CatalogItem>>,
    databases_by_project: HashMap<ProjectId, Vec<i64>>,
    active_transactions: HashSet<u64>,
    next_txn_id: u64,
}

/// A process-local store, useful for tests and the demo binary. Every
/// operation takes the same lock; real deployments swap this for a
/// relational adapter implementing the same trait.
#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the catalog for a database, registering it against the project.
    pub async fn seed_catalog(&self, project_id: ProjectId, database_id: i64, items: Vec<CatalogItem>) {
        let mut state = self.state.lock().await;
        state.catalog_items_by_db.insert(database_id, items);
        state
            .databases_by_project
            .entry(project_id)
            .or_default()
            .push(database_id);
    }
}

impl CounterpartyRepository for InMemoryStore {
    async fn get_normalized_by_source_ref(
        &self,
        project_id: ProjectId,
        database_id: i64,
        source_reference: &str,
    ) -> Result<Option<NormalizedCounterparty>, StoreError> {
        let state = self.state.lock().await;
        let canonical_id = state
            .source_links
            .iter()
            .find(|l| l.source_database_id == database_id && l.source_reference == source_reference)
            .map(|l| l.canonical_id);
        Ok(canonical_id
            .and_then(|id| state.canonical.get(&id))
            .filter(|r| r.project_id == project_id)
            .cloned())
    }

    async fn save_normalized(&self, mut record: NormalizedCounterparty) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        record.created_at = now;
        record.updated_at = now;
        state.canonical.insert(record.id, record);
        Ok(())
    }

    async fn update_normalized(&self, mut record: NormalizedCounterparty) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if !state.canonical.contains_key(&record.id) {
            return Err(StoreError::NotFound);
        }
        record.updated_at = Utc::now();
        state.canonical.insert(record.id, record);
        Ok(())
    }

    async fn save_source_link(&self, link: SourceLink) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let key = link.key();
        if state.source_links.iter().any(|l| l.key() == key) {
            // idempotent insert: the triple already exists, nothing to do.
            return Ok(());
        }
        state.source_links.push(link);
        Ok(())
    }

    async fn get_source_links(&self, canonical_id: CanonicalId) -> Result<Vec<SourceLink>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .source_links
            .iter()
            .filter(|l| l.canonical_id == canonical_id)
            .cloned()
            .collect())
    }

    async fn list_project_databases(&self, project_id: ProjectId) -> Result<Vec<i64>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .databases_by_project
            .get(&project_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_catalog_items_by_database(
        &self,
        database_id: i64,
    ) -> Result<Vec<CatalogItem>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .catalog_items_by_db
            .get(&database_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_canonical_records(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<NormalizedCounterparty>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .canonical
            .values()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn begin_transaction(&self) -> Result<TransactionHandle, StoreError> {
        let mut state = self.state.lock().await;
        let id = state.next_txn_id;
        state.next_txn_id += 1;
        state.active_transactions.insert(id);
        Ok(TransactionHandle(id))
    }

    async fn commit_transaction(&self, handle: TransactionHandle) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if !state.active_transactions.remove(&handle.0) {
            return Err(StoreError::NoActiveTransaction);
        }
        Ok(())
    }

    async fn rollback_transaction(&self, handle: TransactionHandle) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if !state.active_transactions.remove(&handle.0) {
            return Err(StoreError::NoActiveTransaction);
        }
        // In-memory writes within a "transaction" are applied eagerly in
        // this reference implementation; a relational adapter rolls back
        // the underlying DB transaction here instead.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsi_model::ids::{stable_uuid, NAMESPACE_CANONICAL};

    fn sample_record(project_id: ProjectId) -> NormalizedCounterparty {
        NormalizedCounterparty {
            id: stable_uuid(&NAMESPACE_CANONICAL, "sample"),
            project_id,
            source_reference: "ref-1".to_string(),
            source_name: "ООО Ромашка".to_string(),
            normalized_name: "Ромашка".to_string(),
            legal_form: None,
            tax_id: None,
            secondary_id: None,
            alt_tax_id: None,
            legal_address: None,
            postal_address: None,
            phone: None,
            email: None,
            contact_person: None,
            bank_name: None,
            bank_account: None,
            correspondent_account: None,
            bank_code: None,
            quality_score: 0.5,
            enrichment_applied: false,
            source_enrichment: None,
            source_database: None,
            benchmark_id: None,
            subcategory: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn save_and_lookup_by_source_link() {
        let store = InMemoryStore::new();
        let project_id = stable_uuid(&NAMESPACE_CANONICAL, "proj:p1");
        let record = sample_record(project_id);
        let canonical_id = record.id;
        store.save_normalized(record).await.unwrap();
        store
            .save_source_link(SourceLink {
                canonical_id,
                source_database_id: 1,
                source_reference: "ref-1".to_string(),
                source_name: "ООО Ромашка".to_string(),
            })
            .await
            .unwrap();

        let found = store
            .get_normalized_by_source_ref(project_id, 1, "ref-1")
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn source_link_insert_is_idempotent() {
        let store = InMemoryStore::new();
        let project_id = stable_uuid(&NAMESPACE_CANONICAL, "proj:p2");
        let record = sample_record(project_id);
        let canonical_id = record.id;
        store.save_normalized(record).await.unwrap();
        let link = SourceLink {
            canonical_id,
            source_database_id: 1,
            source_reference: "ref-1".to_string(),
            source_name: "ООО Ромашка".to_string(),
        };
        store.save_source_link(link.clone()).await.unwrap();
        store.save_source_link(link).await.unwrap();
        let links = store.get_source_links(canonical_id).await.unwrap();
        assert_eq!(links.len(), 1);
    }

    #[tokio::test]
    async fn transaction_handles_must_be_active_to_commit() {
        let store = InMemoryStore::new();
        let handle = store.begin_transaction().await.unwrap();
        store.commit_transaction(handle).await.unwrap();
        assert!(store.commit_transaction(handle).await.is_err());
    }
}

//! Merge & Provenance transfer: folds every non-master member of a
//! duplicate group into the chosen master record and re-points their
//! source links at it.
//!
//! Runs under a store transaction so a failure partway through a group
//! leaves that group's canonical records untouched; other groups in the
//! same batch are unaffected since each gets its own transaction.

use nsi_model::NormalizedCounterparty;
use nsi_store::CounterpartyRepository;
use tracing::{info, warn};

use crate::error::MergeError;

/// Folds `others` into `master` and transfers their source links, returning
/// the updated master record as stored.
///
/// `master` must be present in `others`' originating group; callers
/// typically derive both from [`crate::selector::select_master`] plus the
/// group's own item list minus the chosen id.
pub async fn merge_group<R: CounterpartyRepository>(
    repo: &R,
    master: &NormalizedCounterparty,
    others: &[NormalizedCounterparty],
) -> Result<NormalizedCounterparty, MergeError> {
    if others.is_empty() {
        return Ok(master.clone());
    }

    let txn = repo.begin_transaction().await?;

    match merge_group_inner(repo, master, others).await {
        Ok(merged) => {
            repo.commit_transaction(txn).await?;
            info!(master_id = %merged.id, folded = others.len(), "merged duplicate group");
            Ok(merged)
        }
        Err(err) => {
            warn!(master_id = %master.id, error = %err, "duplicate group merge failed, rolling back");
            repo.rollback_transaction(txn).await?;
            Err(err)
        }
    }
}

async fn merge_group_inner<R: CounterpartyRepository>(
    repo: &R,
    master: &NormalizedCounterparty,
    others: &[NormalizedCounterparty],
) -> Result<NormalizedCounterparty, MergeError> {
    let mut merged = master.clone();

    for other in others {
        fuse_fields(&mut merged, other);
    }

    repo.update_normalized(merged.clone()).await?;

    for other in others {
        let links = repo.get_source_links(other.id).await?;
        for link in links {
            let mut transferred = link;
            transferred.canonical_id = merged.id;
            repo.save_source_link(transferred).await?;
        }
    }

    Ok(merged)
}

/// Folds one non-master record's fields into `merged` in place.
fn fuse_fields(merged: &mut NormalizedCounterparty, other: &NormalizedCounterparty) {
    fuse_string(&mut merged.normalized_name, &other.normalized_name);
    merged.legal_form = fuse_opt(merged.legal_form.take(), other.legal_form.clone());
    merged.tax_id = fuse_opt(merged.tax_id.take(), other.tax_id.clone());
    merged.secondary_id = fuse_opt(merged.secondary_id.take(), other.secondary_id.clone());
    merged.alt_tax_id = fuse_opt(merged.alt_tax_id.take(), other.alt_tax_id.clone());
    merged.legal_address = fuse_opt(merged.legal_address.take(), other.legal_address.clone());
    merged.postal_address = fuse_opt(merged.postal_address.take(), other.postal_address.clone());
    merged.phone = fuse_opt(merged.phone.take(), other.phone.clone());
    merged.email = fuse_opt(merged.email.take(), other.email.clone());
    merged.contact_person = fuse_opt(merged.contact_person.take(), other.contact_person.clone());
    merged.bank_name = fuse_opt(merged.bank_name.take(), other.bank_name.clone());
    merged.bank_account = fuse_opt(merged.bank_account.take(), other.bank_account.clone());
    merged.correspondent_account =
        fuse_opt(merged.correspondent_account.take(), other.correspondent_account.clone());
    merged.bank_code = fuse_opt(merged.bank_code.take(), other.bank_code.clone());
    merged.subcategory = fuse_opt(merged.subcategory.take(), other.subcategory.clone());

    merged.quality_score = merged.quality_score.max(other.quality_score);
    merged.enrichment_applied = merged.enrichment_applied || other.enrichment_applied;

    if merged.source_enrichment.is_none() {
        merged.source_enrichment = other.source_enrichment.clone();
    }
    if merged.benchmark_id.is_none() {
        merged.benchmark_id = other.benchmark_id;
    }
}

/// Empty takes the other value; otherwise the strictly longer string wins.
fn fuse_string(into: &mut String, other: &str) {
    if into.is_empty() {
        other.clone_into(into);
    } else if other.len() > into.len() {
        other.clone_into(into);
    }
}

/// Same rule as [`fuse_string`] lifted over `Option<String>`.
fn fuse_opt(current: Option<String>, other: Option<String>) -> Option<String> {
    match (current, other) {
        (None, other) => other,
        (Some(c), None) => Some(c),
        (Some(c), Some(o)) => {
            if c.is_empty() || o.len() > c.len() {
                Some(o)
            } else {
                Some(c)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nsi_model::ids::{stable_uuid, NAMESPACE_CANONICAL};
    use nsi_model::SourceLink;
    use nsi_store::InMemoryStore;

    fn record(key: &str, project_id: uuid::Uuid) -> NormalizedCounterparty {
        NormalizedCounterparty {
            id: stable_uuid(&NAMESPACE_CANONICAL, key),
            project_id,
            source_reference: key.to_string(),
            source_name: "src".to_string(),
            normalized_name: String::new(),
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
            quality_score: 0.1,
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
    async fn fields_fuse_from_non_master_and_links_transfer() {
        let store = InMemoryStore::new();
        let project_id = stable_uuid(&NAMESPACE_CANONICAL, "proj");

        let mut master = record("m", project_id);
        master.normalized_name = "Ромашка".to_string();
        let mut other = record("o", project_id);
        other.normalized_name = "Ромашка Торг".to_string();
        other.tax_id = Some("1234567890".to_string());
        other.quality_score = 0.9;

        store.save_normalized(master.clone()).await.unwrap();
        store.save_normalized(other.clone()).await.unwrap();
        store
            .save_source_link(SourceLink {
                canonical_id: other.id,
                source_database_id: 1,
                source_reference: "o".to_string(),
                source_name: "src".to_string(),
            })
            .await
            .unwrap();

        let merged = merge_group(&store, &master, &[other.clone()]).await.unwrap();

        assert_eq!(merged.normalized_name, "Ромашка Торг");
        assert_eq!(merged.tax_id.as_deref(), Some("1234567890"));
        assert_eq!(merged.quality_score, 0.9);

        let links = store.get_source_links(merged.id).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].canonical_id, merged.id);
    }

    #[tokio::test]
    async fn no_others_returns_master_unchanged() {
        let store = InMemoryStore::new();
        let project_id = stable_uuid(&NAMESPACE_CANONICAL, "proj2");
        let master = record("solo", project_id);
        store.save_normalized(master.clone()).await.unwrap();

        let merged = merge_group(&store, &master, &[]).await.unwrap();
        assert_eq!(merged, master);
    }
}

//! The canonical ("master") counterparty record and its provenance links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CanonicalId, ProjectId};

/// One equivalence class of counterparty records within a project.
///
/// Created on first unmatched input and mutated only by the merge component
/// (`dedup-engine::merge`) under a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCounterparty {
    pub id: CanonicalId,
    pub project_id: ProjectId,
    /// `source_reference` of the first source row that materialized this record.
    pub source_reference: String,

    // Names
    pub source_name: String,
    pub normalized_name: String,
    /// Canonical acronym of the stripped legal form (e.g. `"OOO"`), if any.
    pub legal_form: Option<String>,

    // Identifiers
    pub tax_id: Option<String>,
    pub secondary_id: Option<String>,
    pub alt_tax_id: Option<String>,

    // Postal / contact
    pub legal_address: Option<String>,
    pub postal_address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub contact_person: Option<String>,

    // Banking
    pub bank_name: Option<String>,
    pub bank_account: Option<String>,
    pub correspondent_account: Option<String>,
    pub bank_code: Option<String>,

    // Quality / provenance
    /// In `[0, 1]`. Monotone non-decreasing across merges (I3).
    pub quality_score: f64,
    pub enrichment_applied: bool,
    pub source_enrichment: Option<String>,
    pub source_database: Option<String>,

    // Optional
    pub benchmark_id: Option<CanonicalId>,
    pub subcategory: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NormalizedCounterparty {
    /// Number of identifier/contact/banking fields that are filled, used by
    /// the master selector's `+3 per filled field` rule.
    pub fn filled_scoring_fields(&self) -> usize {
        [
            self.tax_id.is_some(),
            self.alt_tax_id.is_some(),
            self.secondary_id.is_some(),
            self.legal_address.is_some(),
            self.postal_address.is_some(),
            self.phone.is_some(),
            self.email.is_some(),
            self.contact_person.is_some(),
            self.bank_name.is_some(),
            self.bank_account.is_some(),
            self.correspondent_account.is_some(),
            self.bank_code.is_some(),
        ]
        .into_iter()
        .filter(|b| *b)
        .count()
    }
}

/// Many-to-one provenance link from a source row to a canonical record.
///
/// Uniqueness: one link per `(canonical_id, source_database_id, source_reference)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    pub canonical_id: CanonicalId,
    pub source_database_id: i64,
    pub source_reference: String,
    pub source_name: String,
}

impl SourceLink {
    /// The uniqueness key for a source record within a project.
    pub fn key(&self) -> (CanonicalId, i64, &str) {
        (self.canonical_id, self.source_database_id, &self.source_reference)
    }
}

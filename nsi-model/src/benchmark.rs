//! Curated reference records used to short-circuit normalization/classification.

use serde::{Deserialize, Serialize};

use crate::ids::{CanonicalId, ProjectId};

/// A curated, high-confidence counterparty record used as a lookup anchor.
///
/// Lookup keys: `tax_id`, `alt_tax_id`, normalized name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub id: CanonicalId,
    pub project_id: ProjectId,
    pub canonical_name: String,
    pub normalized_name: String,
    pub tax_id: Option<String>,
    pub secondary_id: Option<String>,
    pub alt_tax_id: Option<String>,
    pub legal_form: Option<String>,
    pub legal_address: Option<String>,
    pub postal_address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account: Option<String>,
    pub correspondent_account: Option<String>,
    pub bank_code: Option<String>,
    /// Confidence assigned to this curated record by its provider (see
    /// `SourcePriority` in `dedup-engine` for how this feeds master scoring).
    pub confidence: f64,
}

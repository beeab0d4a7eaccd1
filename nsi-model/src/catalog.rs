//! Immutable, read-only input records ingested from source databases.

use serde::{Deserialize, Serialize};

/// One row read from a source catalog.
///
/// `CatalogItem`s are never mutated by the core: they are read once by the
/// orchestrator and flow into `NormalizedCounterparty`/`SourceLink` records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Source-scoped primary key of the row.
    pub id: i64,
    /// Stable identifier within the source database (survives re-ingestion).
    pub source_reference: String,
    /// Free-text name as it appears in the source. Required (never empty at
    /// the storage layer, though it may fail pre-validation downstream).
    pub source_name: String,
    /// Optional source-local code (e.g. an internal SKU/category code).
    pub code: Option<String>,
    /// Opaque attribute blob: XML-like tags and/or delimited `key: value` text.
    pub attributes: Option<String>,
    /// Which source database this row was read from.
    pub source_database_id: i64,
}

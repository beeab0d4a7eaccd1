//! Shared data model for the NSI record-linkage / deduplication engine.
//!
//! Every other crate in the workspace depends on this one for its vocabulary:
//! [`catalog::CatalogItem`] (input), [`counterparty::NormalizedCounterparty`]
//! and [`counterparty::SourceLink`] (canonical output + provenance),
//! [`benchmark::Benchmark`] (curated reference data),
//! [`classifier_tree::ClassificationTree`] (industry classifier), and
//! [`decision::FinalDecision`] (classification outcome).

pub mod benchmark;
pub mod catalog;
pub mod classifier_tree;
pub mod config;
pub mod counterparty;
pub mod decision;
pub mod ids;

pub use benchmark::Benchmark;
pub use catalog::CatalogItem;
pub use classifier_tree::{ClassificationTree, ClassifierLevel, ClassifierNode, ModelError};
pub use config::{MasterSelectionStrategy, ProjectConfig};
pub use counterparty::{NormalizedCounterparty, SourceLink};
pub use decision::{DecisionMethod, FinalDecision};
pub use ids::{CanonicalId, ProjectId};

//! Deduplication core: groups canonical records that describe the same
//! real-world counterparty, picks a master per group, and folds the rest
//! into it under provenance.
//!
//! The three stages are independent and composable:
//! [`analyzer::analyze`] is pure and synchronous, [`selector::select_master`]
//! is pure given pre-gathered per-candidate inputs, and [`merge::merge_group`]
//! is the only stage that touches the store. The orchestrator wires them
//! together per batch.

pub mod analyzer;
pub mod error;
pub mod merge;
pub mod selector;
pub mod union_find;

pub use analyzer::{analyze, DuplicateGroup};
pub use error::MergeError;
pub use merge::merge_group;
pub use selector::{select_master, ScoringInput};

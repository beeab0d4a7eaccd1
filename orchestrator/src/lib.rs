//! Per-project batch driver wiring the rest of the core together: loads
//! catalog items, runs the bounded per-item pipeline (pre-validate, enrich,
//! classify, save with retry), emits progress, honors cancellation, and
//! runs the post-batch deduplication pass.
//!
//! `batch::run_batch` is the single entry point; everything else in this
//! crate exists to support it.

pub mod batch;
pub mod config;
pub mod error;
pub mod llm_adapter;
pub mod pipeline;
pub mod retry;
pub mod worker_pool;

pub use batch::{run_batch, BatchDeps, BatchResult};
pub use config::OrchestratorConfig;
pub use error::{ItemError, ItemErrorKind, OrchestratorError};
pub use llm_adapter::{normalize_via_llm, NormalizationRequest, ProfileLlmClient};
pub use pipeline::{process_item, ItemOutcome, PipelineDeps};

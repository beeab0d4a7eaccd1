//! Unified orchestrator error taxonomy: per-item failures are never
//! propagated as this error (they're recorded in `BatchResult::errors`
//! instead); this type is reserved for the whole-batch return path.

use ai_llm_service::AiLlmError;
use classifier_core::ClassifierError;
use nsi_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Llm(#[from] AiLlmError),

    /// Every group write failed during the post-batch merge pass, or the
    /// store could not be reached at all for the batch.
    #[error("store unavailable for the whole batch: {0}")]
    StoreUnavailable(String),
}

/// Per-item failure kinds (spec-free taxonomy spelled out by the error
/// handling design): malformed input, retried-and-exhausted transience, a
/// rejected pre-validation/tax-id shape, an unclassifiable item, the
/// cooperative stop marker, or an unexpected panic caught at the worker
/// boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemErrorKind {
    InvalidInput,
    Transient,
    ValidationFailure,
    ClassificationFailure,
    CancellationRequested,
    Internal,
}

/// One entry in a [`crate::batch::BatchResult`]'s capped error list.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemError {
    pub source_reference: String,
    pub kind: ItemErrorKind,
    pub message: String,
}

impl ItemError {
    pub fn new(source_reference: impl Into<String>, kind: ItemErrorKind, message: impl Into<String>) -> Self {
        Self {
            source_reference: source_reference.into(),
            kind,
            message: message.into(),
        }
    }

    /// The single stop marker appended exactly once on cancellation.
    pub fn normalization_stopped() -> Self {
        Self {
            source_reference: String::new(),
            kind: ItemErrorKind::CancellationRequested,
            message: "normalization_stopped".to_string(),
        }
    }
}

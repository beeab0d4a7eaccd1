//! Final classification decisions and the per-item tagged result they produce.

use serde::{Deserialize, Serialize};

/// How a [`FinalDecision`] was reached. Kept as a closed, tagged enum rather
/// than a free-form string so downstream filters/reports can match on it
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionMethod {
    /// Reached via the hierarchical LLM cascade.
    Cascade,
    /// Reached via a compiled keyword pattern.
    Keyword,
    /// Reached by truncating an invalid child code to its parent.
    FallbackParent,
    /// Reached via the fixed category catch-all.
    FallbackDefault,
    /// No candidate validated; requires human review.
    Manual,
}

/// Per-item classification outcome, the output of the decision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDecision {
    /// Empty string when `method == Manual` and nothing validated.
    pub code: String,
    pub name: String,
    pub confidence: f64,
    pub method: DecisionMethod,
    pub validation_passed: bool,
    /// Short provenance string, e.g. `"stage7_high_confidence_validated_valid"`.
    pub reason: String,
}

impl FinalDecision {
    /// The `{code:"", method:"manual", reason:"no_valid_classification"}` result
    /// emitted when no candidate validates.
    pub fn no_valid_classification() -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            confidence: 0.0,
            method: DecisionMethod::Manual,
            validation_passed: false,
            reason: "no_valid_classification".to_string(),
        }
    }
}

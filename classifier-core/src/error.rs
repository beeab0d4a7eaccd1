//! Errors raised by the classification cascade.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("LLM transport error: {0}")]
    Transport(String),

    #[error("LLM response was not valid JSON: {0}")]
    InvalidJson(String),

    #[error("LLM selected code `{0}` which is not present in the classification tree")]
    CodeNotFound(String),
}

//! Error type for attribute-extractor's internal failures. A field simply
//! not being found, or being ambiguous, is not an error — see
//! [`crate::ExtractedAttributes`], whose fields are all `Option`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("failed to compile extractor pattern: {0}")]
    BadPattern(String),
}

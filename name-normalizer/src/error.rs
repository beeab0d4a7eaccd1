//! Error type for name-normalizer's rare internal failures. Ordinary
//! rejections (junk patterns, too short, etc.) are expected data and flow
//! through [`crate::ValidationOutcome`], not this type.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("input is not valid UTF-8")]
    InvalidUtf8,
}

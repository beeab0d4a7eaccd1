//! Error type for the similarity kit.

use thiserror::Error;

/// Failures raised by similarity-kit's functions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimilarityError {
    /// Hamming distance/similarity requires operands of equal length.
    #[error("Hamming distance requires equal-length inputs (got {a_len} and {b_len})")]
    UnequalLength { a_len: usize, b_len: usize },

    /// A combined score was requested with a weight set that sums to zero.
    #[error("combined score weights must not sum to zero")]
    EmptyWeights,
}

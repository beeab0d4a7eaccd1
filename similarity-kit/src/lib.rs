//! Pure string-similarity toolkit for the NSI record-linkage engine.
//!
//! Every function here is a pure, allocation-local computation over `&str`
//! inputs: no I/O, no shared state, nothing async. Inputs are NFC-normalized
//! before comparison; metrics that are conventionally case-insensitive
//! (tokens, n-grams, phonetic codes) also fold case. Unless documented
//! otherwise, a similarity function returns `1.0` when both inputs are
//! empty and `0.0` when exactly one is.

pub mod combined;
pub mod common;
pub mod edit_distance;
pub mod error;
pub mod ngram;
pub mod phonetic_ru;
pub mod sequence;
pub mod token_set;
pub mod vectorize;

pub use combined::{CombinedScorer, Weights};
pub use edit_distance::{
    damerau_levenshtein, damerau_levenshtein_similarity, hamming, hamming_similarity,
    levenshtein, levenshtein_similarity, weighted_levenshtein, weighted_levenshtein_similarity,
    EditWeights,
};
pub use error::SimilarityError;
pub use ngram::{char_ngrams, dice_ngrams, jaccard_ngrams};
pub use phonetic_ru::{metaphone_ru, similarity_metaphone, similarity_soundex, soundex_ru};
pub use sequence::{jaro, jaro_winkler, lcs_length, lcs_ratio};
pub use token_set::{dice_tokens, jaccard_tokens, tokenize};
pub use vectorize::{
    bag_of_words_binary, cosine_similarity_dense, cosine_similarity_sparse,
    hashed_ngram_vector, inverse_document_frequency, l2_distance_dense, tfidf_vector,
    term_frequencies, SparseVector,
};

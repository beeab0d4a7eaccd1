//! Shared helpers used across the similarity kit's metric modules.

use unicode_normalization::UnicodeNormalization;

/// NFC-normalize a string before any metric touches it.
pub(crate) fn nfc(s: &str) -> String {
    s.nfc().collect()
}

/// The two boundary cases every similarity function agrees on:
/// both empty compares equal, one empty compares maximally dissimilar.
/// Returns `None` when neither operand is empty, i.e. "go compute it".
pub(crate) fn empty_case(a: &str, b: &str) -> Option<f64> {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Some(1.0),
        (true, false) | (false, true) => Some(0.0),
        (false, false) => None,
    }
}

//! Deterministic pre-validation and normalization pipeline for raw
//! counterparty/nomenclature names.
//!
//! The entry point is [`normalize_name`]: it runs the cleanup/validation
//! pipeline, then — only if the name passed validation — extracts a
//! recognized legal-form token so it's carried as a separate field rather
//! than left inside the name.

pub mod error;
pub mod legal_form;
pub mod patterns;
pub mod units;
pub mod validate;

pub use error::NormalizationError;
pub use legal_form::extract_legal_form;
pub use units::canonicalize_units;
pub use validate::{normalize, normalize_bytes, ValidationOutcome};

/// Result of the full name-normalization pipeline: cleanup/validation plus
/// legal-form extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedName {
    pub outcome: ValidationOutcome,
    pub legal_form: Option<&'static str>,
}

/// Run [`normalize`] on `raw`, then extract a legal-form token from the
/// cleaned name if validation passed.
pub fn normalize_name(raw: &str) -> NormalizedName {
    let outcome = normalize(raw);
    if !outcome.is_valid {
        return NormalizedName {
            outcome,
            legal_form: None,
        };
    }
    let (without_form, form) = extract_legal_form(&outcome.cleaned_name);
    NormalizedName {
        outcome: ValidationOutcome {
            cleaned_name: without_form,
            ..outcome
        },
        legal_form: form,
    }
}

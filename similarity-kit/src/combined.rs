//! A configurable, weighted combination of the kit's individual metrics
//! into a single `[0, 1]` score.

use std::collections::HashMap;

use crate::edit_distance::{damerau_levenshtein_similarity, levenshtein_similarity};
use crate::error::SimilarityError;
use crate::ngram::jaccard_ngrams;
use crate::phonetic_ru::{similarity_metaphone, similarity_soundex};
use crate::token_set::jaccard_tokens;

/// Per-metric weights for [`CombinedScorer`]. Field names match the keys a
/// caller may supply in a `HashMap<String, f64>` override (e.g. from
/// project configuration): `"levenshtein"`, `"damerau"`, `"bigram"`,
/// `"trigram"`, `"jaccard"`, `"soundex"`, `"metaphone"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub levenshtein: f64,
    pub damerau: f64,
    pub bigram: f64,
    pub trigram: f64,
    pub jaccard: f64,
    pub soundex: f64,
    pub metaphone: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            levenshtein: 0.3,
            damerau: 0.2,
            bigram: 0.2,
            trigram: 0.1,
            jaccard: 0.1,
            soundex: 0.05,
            metaphone: 0.05,
        }
    }
}

impl Weights {
    /// Start from the defaults and overlay any keys present in `overrides`.
    pub fn from_overrides(overrides: &HashMap<String, f64>) -> Self {
        let mut w = Self::default();
        if let Some(v) = overrides.get("levenshtein") {
            w.levenshtein = *v;
        }
        if let Some(v) = overrides.get("damerau") {
            w.damerau = *v;
        }
        if let Some(v) = overrides.get("bigram") {
            w.bigram = *v;
        }
        if let Some(v) = overrides.get("trigram") {
            w.trigram = *v;
        }
        if let Some(v) = overrides.get("jaccard") {
            w.jaccard = *v;
        }
        if let Some(v) = overrides.get("soundex") {
            w.soundex = *v;
        }
        if let Some(v) = overrides.get("metaphone") {
            w.metaphone = *v;
        }
        w
    }

    fn total(&self) -> f64 {
        self.levenshtein
            + self.damerau
            + self.bigram
            + self.trigram
            + self.jaccard
            + self.soundex
            + self.metaphone
    }
}

/// Combines seven individual metrics into one weighted score, normalized by
/// the sum of weights so the result always lands in `[0, 1]`.
pub struct CombinedScorer {
    weights: Weights,
}

impl CombinedScorer {
    pub fn new(weights: Weights) -> Result<Self, SimilarityError> {
        if weights.total() <= 0.0 {
            return Err(SimilarityError::EmptyWeights);
        }
        Ok(Self { weights })
    }

    /// Build a scorer from a project's raw `similarity_weights` map,
    /// falling back to [`Weights::default`] for any key not present.
    pub fn from_config(overrides: &HashMap<String, f64>) -> Result<Self, SimilarityError> {
        Self::new(Weights::from_overrides(overrides))
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Weighted combination of Levenshtein, Damerau-Levenshtein, character
    /// bigram/trigram Jaccard, token Jaccard, and the two phonetic codes.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        let w = &self.weights;
        let total = w.total();
        let parts = levenshtein_similarity(a, b) * w.levenshtein
            + damerau_levenshtein_similarity(a, b) * w.damerau
            + jaccard_ngrams(a, b, 2) * w.bigram
            + jaccard_ngrams(a, b, 3) * w.trigram
            + jaccard_tokens(a, b) * w.jaccard
            + similarity_soundex(a, b) * w.soundex
            + similarity_metaphone(a, b) * w.metaphone;
        (parts / total).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_score_identical_strings_as_one() {
        let scorer = CombinedScorer::new(Weights::default()).unwrap();
        assert!((scorer.score("ООО Ромашка", "ООО Ромашка") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_weights_are_rejected() {
        let zero = Weights {
            levenshtein: 0.0,
            damerau: 0.0,
            bigram: 0.0,
            trigram: 0.0,
            jaccard: 0.0,
            soundex: 0.0,
            metaphone: 0.0,
        };
        assert!(CombinedScorer::new(zero).is_err());
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let mut overrides = HashMap::new();
        overrides.insert("levenshtein".to_string(), 1.0);
        let w = Weights::from_overrides(&overrides);
        assert_eq!(w.levenshtein, 1.0);
        assert_eq!(w.damerau, Weights::default().damerau);
    }

    #[test]
    fn score_is_symmetric_and_bounded() {
        let scorer = CombinedScorer::new(Weights::default()).unwrap();
        let a = "Сбербанк России";
        let b = "Сбербанк";
        let fwd = scorer.score(a, b);
        let rev = scorer.score(b, a);
        assert!((fwd - rev).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&fwd));
    }
}

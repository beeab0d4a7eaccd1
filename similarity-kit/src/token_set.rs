//! Token-bag set metrics: Jaccard and Dice over whitespace/punctuation tokens
//! similarity metric.

use std::collections::HashSet;

use crate::common::{empty_case, nfc};

/// Lowercase, strip punctuation, split on runs of anything that isn't a
/// letter or digit.
pub fn tokenize(s: &str) -> Vec<String> {
    let folded = nfc(s).to_lowercase();
    folded
        .split(|c: char| !(c.is_alphanumeric()))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

fn token_sets(a: &str, b: &str) -> (HashSet<String>, HashSet<String>) {
    (
        tokenize(a).into_iter().collect(),
        tokenize(b).into_iter().collect(),
    )
}

/// `|A ∩ B| / |A ∪ B|` over the tokens of `a` and `b`.
pub fn jaccard_tokens(a: &str, b: &str) -> f64 {
    if let Some(s) = empty_case(a, b) {
        return s;
    }
    let (a, b) = token_sets(a, b);
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let inter = a.intersection(&b).count() as f64;
    let union = a.union(&b).count() as f64;
    if union == 0.0 {
        return 1.0;
    }
    inter / union
}

/// `2|A ∩ B| / (|A| + |B|)` over the tokens of `a` and `b`.
pub fn dice_tokens(a: &str, b: &str) -> f64 {
    if let Some(s) = empty_case(a, b) {
        return s;
    }
    let (a, b) = token_sets(a, b);
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let inter = a.intersection(&b).count() as f64;
    let denom = (a.len() + b.len()) as f64;
    if denom == 0.0 {
        return 1.0;
    }
    (2.0 * inter) / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_punctuation_and_lowercases() {
        assert_eq!(
            tokenize("ООО \"Ромашка\", филиал №1"),
            vec!["ооо", "ромашка", "филиал", "1"]
        );
    }

    #[test]
    fn jaccard_self_is_one() {
        assert_eq!(jaccard_tokens("Альфа Банк", "Альфа Банк"), 1.0);
    }

    #[test]
    fn jaccard_is_symmetric_and_bounded() {
        let a = "ООО Ромашка Торговый Дом";
        let b = "Торговый Дом Ромашка";
        let fwd = jaccard_tokens(a, b);
        let rev = jaccard_tokens(b, a);
        assert!((fwd - rev).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&fwd));
    }

    #[test]
    fn empty_cases() {
        assert_eq!(jaccard_tokens("", ""), 1.0);
        assert_eq!(jaccard_tokens("", "x"), 0.0);
    }
}

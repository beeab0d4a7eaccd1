//! Character n-gram multiset metrics: Jaccard and Dice over 2-/3-grams
//! similarity metric.

use std::collections::HashMap;

use crate::common::{empty_case, nfc};

/// Character n-grams of the lowercased, NFC-normalized input, as a multiset
/// (character count per gram).
pub fn char_ngrams(s: &str, n: usize) -> HashMap<String, usize> {
    let folded = nfc(s).to_lowercase();
    let chars: Vec<char> = folded.chars().collect();
    let mut counts = HashMap::new();
    if n == 0 || chars.len() < n {
        return counts;
    }
    for window in chars.windows(n) {
        let gram: String = window.iter().collect();
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

fn overlap(a: &HashMap<String, usize>, b: &HashMap<String, usize>) -> (f64, f64, f64) {
    let mut inter = 0usize;
    let mut union = 0usize;
    let mut sum_a = 0usize;
    let mut sum_b = 0usize;
    let mut seen = std::collections::HashSet::new();
    for (gram, &ca) in a {
        let cb = *b.get(gram).unwrap_or(&0);
        inter += ca.min(cb);
        union += ca.max(cb);
        sum_a += ca;
        seen.insert(gram.clone());
    }
    for (gram, &cb) in b {
        sum_b += cb;
        if !seen.contains(gram) {
            union += cb;
        }
    }
    (inter as f64, union as f64, (sum_a + sum_b) as f64)
}

/// Jaccard similarity over character n-gram multisets (min/max per gram).
pub fn jaccard_ngrams(a: &str, b: &str, n: usize) -> f64 {
    if let Some(s) = empty_case(a, b) {
        return s;
    }
    let ga = char_ngrams(a, n);
    let gb = char_ngrams(b, n);
    if ga.is_empty() && gb.is_empty() {
        return 1.0;
    }
    let (inter, union, _) = overlap(&ga, &gb);
    if union == 0.0 {
        return 1.0;
    }
    inter / union
}

/// Dice coefficient over character n-gram multisets.
pub fn dice_ngrams(a: &str, b: &str, n: usize) -> f64 {
    if let Some(s) = empty_case(a, b) {
        return s;
    }
    let ga = char_ngrams(a, n);
    let gb = char_ngrams(b, n);
    if ga.is_empty() && gb.is_empty() {
        return 1.0;
    }
    let (inter, _, total) = overlap(&ga, &gb);
    if total == 0.0 {
        return 1.0;
    }
    (2.0 * inter) / total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bigrams_of_short_word() {
        let grams = char_ngrams("дом", 2);
        assert_eq!(grams.len(), 2);
        assert_eq!(grams["до"], 1);
        assert_eq!(grams["ом"], 1);
    }

    #[test]
    fn jaccard_self_is_one() {
        assert_eq!(jaccard_ngrams("молоко", "молоко", 2), 1.0);
    }

    #[test]
    fn jaccard_bounded_and_symmetric() {
        let a = "Ромашка";
        let b = "Ромашек";
        let fwd = jaccard_ngrams(a, b, 3);
        let rev = jaccard_ngrams(b, a, 3);
        assert!((fwd - rev).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&fwd));
    }

    #[test]
    fn strings_shorter_than_n_have_no_grams() {
        assert!(char_ngrams("и", 2).is_empty());
    }
}

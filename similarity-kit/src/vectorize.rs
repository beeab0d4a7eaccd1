//! Vector-space representations and distances: term frequency, TF-IDF,
//! binary bag-of-words, hashed character n-gram vectors, cosine similarity
//! and L2 distance.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::token_set::tokenize;

/// A sparse vector keyed by term.
pub type SparseVector = HashMap<String, f64>;

/// Raw-count term frequency normalized by document length.
pub fn term_frequencies(text: &str) -> SparseVector {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return SparseVector::new();
    }
    let total = tokens.len() as f64;
    let mut counts: SparseVector = SparseVector::new();
    for t in tokens {
        *counts.entry(t).or_insert(0.0) += 1.0;
    }
    for v in counts.values_mut() {
        *v /= total;
    }
    counts
}

/// Inverse document frequency, smoothed (`ln(N / (1 + df)) + 1`), computed
/// over a caller-supplied corpus of documents.
pub fn inverse_document_frequency(corpus: &[String]) -> HashMap<String, f64> {
    let n = corpus.len() as f64;
    let mut df: HashMap<String, usize> = HashMap::new();
    for doc in corpus {
        let terms: std::collections::HashSet<String> = tokenize(doc).into_iter().collect();
        for t in terms {
            *df.entry(t).or_insert(0) += 1;
        }
    }
    df.into_iter()
        .map(|(term, count)| (term, (n / (1.0 + count as f64)).ln() + 1.0))
        .collect()
}

/// TF-IDF vector for `text` against a precomputed IDF table (see
/// [`inverse_document_frequency`]). Terms absent from the IDF table (unseen
/// in the reference corpus) are dropped rather than guessed at.
pub fn tfidf_vector(text: &str, idf: &HashMap<String, f64>) -> SparseVector {
    let tf = term_frequencies(text);
    tf.into_iter()
        .filter_map(|(term, freq)| idf.get(&term).map(|w| (term, freq * w)))
        .collect()
}

/// Binary bag-of-words: 1.0 for every distinct token present, 0 otherwise
/// (term absence is implicit, not stored).
pub fn bag_of_words_binary(text: &str) -> SparseVector {
    tokenize(text).into_iter().map(|t| (t, 1.0)).collect()
}

/// Fixed-width hashed character n-gram vector (the hashing trick): every
/// n-gram is folded into one of `dims` buckets via its hash, avoiding an
/// explicit vocabulary.
pub fn hashed_ngram_vector(text: &str, n: usize, dims: usize) -> Vec<f64> {
    let mut v = vec![0.0; dims.max(1)];
    let folded = crate::common::nfc(text).to_lowercase();
    let chars: Vec<char> = folded.chars().collect();
    if chars.len() < n || n == 0 {
        return v;
    }
    for window in chars.windows(n) {
        let gram: String = window.iter().collect();
        let mut hasher = DefaultHasher::new();
        gram.hash(&mut hasher);
        let bucket = (hasher.finish() as usize) % v.len();
        v[bucket] += 1.0;
    }
    v
}

/// Cosine similarity between two sparse vectors. Two zero vectors are
/// defined as maximally similar (both carry no signal).
pub fn cosine_similarity_sparse(a: &SparseVector, b: &SparseVector) -> f64 {
    let dot: f64 = a.iter().map(|(k, v)| v * b.get(k).unwrap_or(&0.0)).sum();
    let norm_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 && norm_b == 0.0 {
        return 1.0;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Cosine similarity between two dense vectors of equal length.
pub fn cosine_similarity_dense(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 && norm_b == 0.0 {
        return 1.0;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Euclidean (L2) distance between two dense vectors of equal length.
pub fn l2_distance_dense(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_frequencies_sum_to_one() {
        let tf = term_frequencies("альфа банк альфа капитал");
        let total: f64 = tf.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn idf_is_zero_signal_for_ubiquitous_terms() {
        let corpus = vec![
            "ооо ромашка".to_string(),
            "ооо вектор".to_string(),
            "ооо альфа".to_string(),
        ];
        let idf = inverse_document_frequency(&corpus);
        assert!(idf["ооо"] < idf["ромашка"]);
    }

    #[test]
    fn cosine_self_is_one() {
        let v = bag_of_words_binary("сбербанк россии");
        assert!((cosine_similarity_sparse(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_zero_vectors_are_equal() {
        let a: SparseVector = SparseVector::new();
        let b: SparseVector = SparseVector::new();
        assert_eq!(cosine_similarity_sparse(&a, &b), 1.0);
    }

    #[test]
    fn hashed_ngram_vector_is_fixed_width() {
        let v = hashed_ngram_vector("ромашка", 3, 32);
        assert_eq!(v.len(), 32);
    }

    #[test]
    fn l2_distance_self_is_zero() {
        let v = hashed_ngram_vector("вектор", 2, 16);
        assert_eq!(l2_distance_dense(&v, &v), 0.0);
    }
}

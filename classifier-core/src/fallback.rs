//! Fallback classifier: three independent strategies tried in order when
//! the cascade doesn't produce a confident result.
//!
//! Exposed both as individual pure functions — the decision engine calls
//! the keyword matcher on its own, as a candidate independent of whether the
//! cascade ran — and as [`run_chain`], which reproduces the "stop at the
//! first that produces a result" ordering as its own composite strategy.

use std::collections::HashMap;
use std::sync::LazyLock;

use nsi_model::ClassificationTree;
use regex::Regex;

use crate::item_kind::ItemKind;

/// One fallback strategy's output, before it reaches the decision engine.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackResult {
    pub code: String,
    pub name: String,
    pub confidence: f64,
    pub sets_manual_review: bool,
}

/// Step 1: given a code the cascade attempted but that didn't validate,
/// strips its last dotted segment and looks the parent up. Confidence 0.55.
pub fn parent_code_fallback(tree: &ClassificationTree, invalid_code: &str) -> Option<FallbackResult> {
    let parent = tree.parent_of(invalid_code)?;
    Some(FallbackResult {
        code: parent.code.clone(),
        name: parent.name.clone(),
        confidence: 0.55,
        sets_manual_review: false,
    })
}

static SIZE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b\d+\s?(mm|cm|m|kg|g|l|ml|pcs|шт)\b").unwrap());
static SUFFIX_STRIP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(ов|ей|ами|а|ы|и|s|es)$").unwrap());

/// A compiled root-word -> `{code, name}` table. Not populated from any
/// external reference data here; callers supply their own via
/// [`keyword_fallback`]'s `patterns` argument.
pub type KeywordPatterns = HashMap<String, (String, String)>;

/// Derives the canonical root word a keyword table is keyed by: lowercase,
/// strip a trailing size/unit token, strip a common inflectional suffix.
pub fn canonical_root_word(item_name: &str) -> Option<String> {
    let first_word = item_name.split_whitespace().next()?;
    let without_size = SIZE_TOKEN.replace_all(first_word, "");
    let lower = without_size.to_lowercase();
    let root = SUFFIX_STRIP.replace(&lower, "");
    if root.is_empty() {
        None
    } else {
        Some(root.into_owned())
    }
}

/// Step 2: matches when `kind` is [`ItemKind::Product`] and the item name's
/// canonical root word is in `patterns`. Confidence in `[0.85, 0.95]`,
/// scaled by how much of the name the root word actually covers.
pub fn keyword_fallback(item_name: &str, kind: ItemKind, patterns: &KeywordPatterns) -> Option<FallbackResult> {
    if kind != ItemKind::Product {
        return None;
    }
    let root = canonical_root_word(item_name)?;
    let (code, name) = patterns.get(&root)?;

    let coverage = root.len() as f64 / item_name.len().max(1) as f64;
    let confidence = 0.85 + 0.10 * coverage.min(1.0);

    Some(FallbackResult {
        code: code.clone(),
        name: name.clone(),
        confidence,
        sets_manual_review: false,
    })
}

/// Step 3: the fixed catch-all per top-level category. Always sets
/// `manual_review_required`.
pub fn category_default_fallback(tree: &ClassificationTree, kind: ItemKind) -> Option<FallbackResult> {
    let code = match kind {
        ItemKind::Product => "PRODUCT.OTHER",
        ItemKind::Service => "SERVICE.OTHER",
        ItemKind::Unknown => return None,
    };
    let node = tree.node(code)?;
    Some(FallbackResult {
        code: node.code.clone(),
        name: node.name.clone(),
        confidence: 0.35,
        sets_manual_review: true,
    })
}

/// Runs all three steps in order, returning the first that produces a
/// result.
pub fn run_chain(
    tree: &ClassificationTree,
    invalid_code: Option<&str>,
    item_name: &str,
    kind: ItemKind,
    patterns: &KeywordPatterns,
) -> Option<FallbackResult> {
    if let Some(code) = invalid_code {
        if let Some(r) = parent_code_fallback(tree, code) {
            return Some(r);
        }
    }
    if let Some(r) = keyword_fallback(item_name, kind, patterns) {
        return Some(r);
    }
    category_default_fallback(tree, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsi_model::ClassifierLevel;

    fn tree() -> ClassificationTree {
        ClassificationTree::from_nodes(vec![
            ClassifierNode {
                code: "A".to_string(),
                name: "Section A".to_string(),
                parent_code: None,
                level: ClassifierLevel::Section,
            },
            ClassifierNode {
                code: "A.1".to_string(),
                name: "Class A.1".to_string(),
                parent_code: Some("A".to_string()),
                level: ClassifierLevel::Class,
            },
            ClassifierNode {
                code: "PRODUCT.OTHER".to_string(),
                name: "Other manufactured goods".to_string(),
                parent_code: None,
                level: ClassifierLevel::Section,
            },
        ])
        .unwrap()
    }

    #[test]
    fn parent_code_strips_last_segment() {
        let tree = tree();
        let result = parent_code_fallback(&tree, "A.1.9").unwrap();
        assert_eq!(result.code, "A.1");
        assert_eq!(result.confidence, 0.55);
    }

    #[test]
    fn keyword_match_requires_product_kind() {
        let mut patterns = KeywordPatterns::new();
        patterns.insert("bolt".to_string(), ("A.1".to_string(), "Bolts".to_string()));
        assert!(keyword_fallback("bolts 10mm", ItemKind::Service, &patterns).is_none());
        let result = keyword_fallback("bolts 10mm", ItemKind::Product, &patterns).unwrap();
        assert_eq!(result.code, "A.1");
        assert!((0.85..=0.95).contains(&result.confidence));
    }

    #[test]
    fn category_default_always_sets_manual_review() {
        let tree = tree();
        let result = category_default_fallback(&tree, ItemKind::Product).unwrap();
        assert!(result.sets_manual_review);
        assert_eq!(result.confidence, 0.35);
    }

    #[test]
    fn chain_stops_at_first_success() {
        let tree = tree();
        let mut patterns = KeywordPatterns::new();
        patterns.insert("bolt".to_string(), ("A.1".to_string(), "Bolts".to_string()));
        let result = run_chain(&tree, None, "bolts", ItemKind::Product, &patterns).unwrap();
        assert_eq!(result.code, "A.1");
    }
}

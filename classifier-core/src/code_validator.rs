//! Validates a candidate classification code against the tree before it can
//! be accepted by the decision engine.
//!
//! Kept as a trait (an "external dependency" the decision engine calls
//! through) so a deployment can swap in a validator backed by a richer
//! reference source; [`TreeCodeValidator`] is the reference implementation
//! used when nothing more specific is wired in.

use nsi_model::ClassificationTree;

/// Outcome of validating one candidate code.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCode {
    pub name: String,
    pub confidence: f64,
}

pub trait CodeValidator: Send + Sync {
    /// Checks `code` against `tree`; `None` means the code doesn't validate.
    /// `raw_confidence` is the candidate's pre-validation confidence; the
    /// validator may refine it (e.g. discount leaf codes without a name).
    fn validate(&self, tree: &ClassificationTree, code: &str, raw_confidence: f64) -> Option<ValidatedCode>;
}

/// Validates purely against tree membership; confidence passes through
/// unchanged and the canonical name comes from the matched node.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeCodeValidator;

impl CodeValidator for TreeCodeValidator {
    fn validate(&self, tree: &ClassificationTree, code: &str, raw_confidence: f64) -> Option<ValidatedCode> {
        let node = tree.node(code)?;
        Some(ValidatedCode {
            name: node.name.clone(),
            confidence: raw_confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsi_model::{ClassifierLevel, ClassifierNode};

    fn tree() -> ClassificationTree {
        ClassificationTree::from_nodes(vec![ClassifierNode {
            code: "A".to_string(),
            name: "Section A".to_string(),
            parent_code: None,
            level: ClassifierLevel::Section,
        }])
        .unwrap()
    }

    #[test]
    fn validates_known_code() {
        let tree = tree();
        let validated = TreeCodeValidator.validate(&tree, "A", 0.9).unwrap();
        assert_eq!(validated.name, "Section A");
        assert_eq!(validated.confidence, 0.9);
    }

    #[test]
    fn rejects_unknown_code() {
        let tree = tree();
        assert!(TreeCodeValidator.validate(&tree, "Z", 0.9).is_none());
    }
}

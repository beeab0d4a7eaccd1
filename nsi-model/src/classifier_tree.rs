//! In-memory hierarchical classification tree (KPVED/OKPD-style).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four levels of the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassifierLevel {
    Section,
    Class,
    Subclass,
    Group,
}

/// One node of the classification tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierNode {
    pub code: String,
    pub name: String,
    pub parent_code: Option<String>,
    pub level: ClassifierLevel,
}

/// Errors raised while building a [`ClassificationTree`] from a flat node list.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("duplicate classifier code: {0}")]
    DuplicateCode(String),
    #[error("classifier node {code} declares parent {parent} which is not in the tree")]
    MissingParent { code: String, parent: String },
    #[error(
        "classifier node {code} violates the dotted-prefix convention: parent of `{code}` must be `{expected}`, found `{actual}`"
    )]
    BadParentPrefix {
        code: String,
        expected: String,
        actual: String,
    },
}

/// Ordered tree of [`ClassifierNode`]s, built once per process from a
/// reference table. Read-only after construction.
///
/// Invariant I6: codes follow the dotted-prefix convention — the parent of
/// `X.Y.Z` is `X.Y`. [`ClassificationTree::from_nodes`] enforces this for
/// every node that declares a `parent_code`.
#[derive(Debug, Clone, Default)]
pub struct ClassificationTree {
    nodes: HashMap<String, ClassifierNode>,
    children_by_parent: HashMap<String, Vec<String>>,
    roots: Vec<String>,
}

impl ClassificationTree {
    /// Builds the tree from a flat node list, validating I6 and parent
    /// existence. Children are ordered by first appearance in `nodes`.
    pub fn from_nodes(nodes: Vec<ClassifierNode>) -> Result<Self, ModelError> {
        let mut tree = ClassificationTree::default();

        for node in &nodes {
            if tree.nodes.contains_key(&node.code) {
                return Err(ModelError::DuplicateCode(node.code.clone()));
            }
            tree.nodes.insert(node.code.clone(), node.clone());
        }

        for node in &nodes {
            match &node.parent_code {
                None => tree.roots.push(node.code.clone()),
                Some(parent) => {
                    if !tree.nodes.contains_key(parent) {
                        return Err(ModelError::MissingParent {
                            code: node.code.clone(),
                            parent: parent.clone(),
                        });
                    }
                    if let Some(expected) = dotted_parent(&node.code) {
                        if &expected != parent {
                            return Err(ModelError::BadParentPrefix {
                                code: node.code.clone(),
                                expected,
                                actual: parent.clone(),
                            });
                        }
                    }
                    tree.children_by_parent
                        .entry(parent.clone())
                        .or_default()
                        .push(node.code.clone());
                }
            }
        }

        Ok(tree)
    }

    pub fn node(&self, code: &str) -> Option<&ClassifierNode> {
        self.nodes.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.nodes.contains_key(code)
    }

    /// Top-level (`Section`) nodes, in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &ClassifierNode> {
        self.roots.iter().filter_map(|c| self.nodes.get(c))
    }

    /// Children of `parent_code`, in insertion order. Empty if `parent_code`
    /// has no children or doesn't exist.
    pub fn children_of(&self, parent_code: &str) -> impl Iterator<Item = &ClassifierNode> {
        self.children_by_parent
            .get(parent_code)
            .into_iter()
            .flatten()
            .filter_map(move |c| self.nodes.get(c))
    }

    /// Strips the last dotted segment and looks up the parent node — used by
    /// the fallback classifier's "parent code" step.
    pub fn parent_of(&self, code: &str) -> Option<&ClassifierNode> {
        let parent_code = dotted_parent(code)?;
        self.nodes.get(&parent_code)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Computes the dotted-prefix parent of a code, e.g. `"A.1.2" -> Some("A.1")`.
/// Returns `None` for top-level (no-dot) codes.
fn dotted_parent(code: &str) -> Option<String> {
    let idx = code.rfind('.')?;
    Some(code[..idx].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(code: &str, parent: Option<&str>, level: ClassifierLevel) -> ClassifierNode {
        ClassifierNode {
            code: code.to_string(),
            name: format!("name-{code}"),
            parent_code: parent.map(str::to_string),
            level,
        }
    }

    #[test]
    fn builds_tree_and_indexes_children() {
        let nodes = vec![
            node("A", None, ClassifierLevel::Section),
            node("A.1", Some("A"), ClassifierLevel::Class),
            node("A.1.2", Some("A.1"), ClassifierLevel::Subclass),
        ];
        let tree = ClassificationTree::from_nodes(nodes).unwrap();
        assert_eq!(tree.roots().count(), 1);
        assert_eq!(tree.children_of("A").count(), 1);
        assert_eq!(tree.parent_of("A.1.2").unwrap().code, "A.1");
    }

    #[test]
    fn rejects_bad_dotted_prefix() {
        let nodes = vec![
            node("A", None, ClassifierLevel::Section),
            node("B", None, ClassifierLevel::Section),
            node("A.1.2", Some("B"), ClassifierLevel::Subclass),
        ];
        let err = ClassificationTree::from_nodes(nodes).unwrap_err();
        assert!(matches!(err, ModelError::BadParentPrefix { .. }));
    }

    #[test]
    fn rejects_missing_parent() {
        let nodes = vec![node("A.1", Some("A"), ClassifierLevel::Class)];
        let err = ClassificationTree::from_nodes(nodes).unwrap_err();
        assert!(matches!(err, ModelError::MissingParent { .. }));
    }
}

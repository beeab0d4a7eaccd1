//! Read-only source for the industry `ClassificationTree`, built once per
//! process.

use nsi_model::{ClassificationTree, ClassifierNode, ModelError};

use crate::error::StoreError;

/// Supplies the raw `classifier_node` rows used to build a
/// [`ClassificationTree`].
pub trait ClassifierTreeSource: Send + Sync {
    fn load_nodes(&self) -> impl Future<Output = Result<Vec<ClassifierNode>, StoreError>> + Send;
}

/// A fixed, in-memory node list — the classifier tree never changes within
/// a process, so there's nothing to cache beyond holding the `Vec`.
#[derive(Clone)]
pub struct StaticClassifierTreeSource {
    nodes: Vec<ClassifierNode>,
}

impl StaticClassifierTreeSource {
    pub fn new(nodes: Vec<ClassifierNode>) -> Self {
        Self { nodes }
    }
}

impl ClassifierTreeSource for StaticClassifierTreeSource {
    async fn load_nodes(&self) -> Result<Vec<ClassifierNode>, StoreError> {
        Ok(self.nodes.clone())
    }
}

/// Load a source's nodes and build the tree once.
pub async fn build_tree(
    source: &impl ClassifierTreeSource,
) -> Result<ClassificationTree, TreeLoadError> {
    let nodes = source.load_nodes().await?;
    Ok(ClassificationTree::from_nodes(nodes)?)
}

#[derive(Debug, thiserror::Error)]
pub enum TreeLoadError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsi_model::ClassifierLevel;

    #[tokio::test]
    async fn builds_tree_from_source() {
        let source = StaticClassifierTreeSource::new(vec![ClassifierNode {
            code: "10".to_string(),
            name: "Раздел".to_string(),
            parent_code: None,
            level: ClassifierLevel::Section,
        }]);
        let tree = build_tree(&source).await.unwrap();
        assert_eq!(tree.len(), 1);
    }
}

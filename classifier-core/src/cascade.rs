//! The four-stage hierarchical classification cascade (Section → Class →
//! Subclass → Group), each stage narrowing the candidate set to the prior
//! stage's chosen children.

use std::collections::HashMap;

use nsi_model::{ClassificationTree, ClassifierLevel, ClassifierNode};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::ClassifierError;
use crate::llm_client::LlmClient;
use crate::prompts::{system_prompt, user_prompt};

const STAGE_ORDER: [ClassifierLevel; 4] = [
    ClassifierLevel::Section,
    ClassifierLevel::Class,
    ClassifierLevel::Subclass,
    ClassifierLevel::Group,
];

/// The cascade's result at whatever level it stopped on — either because a
/// stage's confidence fell below threshold, or because the chosen node has
/// no children left to descend into.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeResult {
    pub code: String,
    pub name: String,
    pub level: ClassifierLevel,
    pub confidence: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone)]
struct StageResult {
    code: String,
    confidence: f64,
    reasoning: String,
}

#[derive(Deserialize)]
struct StageReply {
    selected_code: String,
    confidence: f64,
    reasoning: String,
}

type StageCacheKey = (String, String, ClassifierLevel, Option<String>);
type TopCacheKey = (String, String);

/// Runs cascade stages against an [`LlmClient`], memoizing both per-stage
/// and whole-cascade results. Cheap to construct; holds only its two caches
/// plus the client.
pub struct Cascade<C> {
    client: C,
    stage_cache: RwLock<HashMap<StageCacheKey, StageResult>>,
    top_cache: RwLock<HashMap<TopCacheKey, CascadeResult>>,
}

impl<C: LlmClient> Cascade<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            stage_cache: RwLock::new(HashMap::new()),
            top_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Runs the cascade for `item_name`/`category` against `tree`, stopping
    /// early if a stage's confidence falls below `min_confidence`. Returns
    /// `Err` if any stage's reply is unparseable or names a code outside the
    /// tree — the caller is expected to fall back to the keyword/parent chain on error.
    pub async fn classify(
        &self,
        tree: &ClassificationTree,
        item_name: &str,
        category: &str,
    ) -> Result<CascadeResult, ClassifierError> {
        self.classify_with_threshold(tree, item_name, category, 0.7).await
    }

    pub async fn classify_with_threshold(
        &self,
        tree: &ClassificationTree,
        item_name: &str,
        category: &str,
        min_confidence: f64,
    ) -> Result<CascadeResult, ClassifierError> {
        let top_key = (item_name.to_string(), category.to_string());
        if let Some(cached) = self.top_cache.read().await.get(&top_key).cloned() {
            return Ok(cached);
        }

        let mut parent_code: Option<String> = None;
        let mut best: Option<CascadeResult> = None;

        for &level in &STAGE_ORDER {
            let candidates: Vec<&ClassifierNode> = match &parent_code {
                None => tree.roots().collect(),
                Some(parent) => tree.children_of(parent).collect(),
            };
            if candidates.is_empty() {
                break;
            }

            let stage_key = (item_name.to_string(), category.to_string(), level, parent_code.clone());
            let stage = match self.stage_cache.read().await.get(&stage_key).cloned() {
                Some(cached) => cached,
                None => {
                    let computed = self.run_stage(tree, level, &candidates, item_name, category).await?;
                    self.stage_cache.write().await.insert(stage_key, computed.clone());
                    computed
                }
            };

            let node = tree
                .node(&stage.code)
                .ok_or_else(|| ClassifierError::CodeNotFound(stage.code.clone()))?;

            best = Some(CascadeResult {
                code: stage.code.clone(),
                name: node.name.clone(),
                level,
                confidence: stage.confidence,
                reasoning: stage.reasoning.clone(),
            });

            if stage.confidence < min_confidence {
                debug!(code = %stage.code, confidence = stage.confidence, "cascade halted below threshold");
                break;
            }
            parent_code = Some(stage.code);
        }

        let result = best.ok_or_else(|| ClassifierError::CodeNotFound(String::new()))?;
        self.top_cache.write().await.insert(top_key, result.clone());
        Ok(result)
    }

    async fn run_stage(
        &self,
        tree: &ClassificationTree,
        level: ClassifierLevel,
        candidates: &[&ClassifierNode],
        item_name: &str,
        category: &str,
    ) -> Result<StageResult, ClassifierError> {
        let system = system_prompt(level, candidates);
        let user = user_prompt(item_name, category);
        let raw = self.client.complete(&system, &user).await?;

        let reply: StageReply = parse_reply(&raw)?;
        if !candidates.iter().any(|c| c.code == reply.selected_code) || !tree.contains(&reply.selected_code) {
            warn!(code = %reply.selected_code, "cascade stage selected a code outside the candidate set");
            return Err(ClassifierError::CodeNotFound(reply.selected_code));
        }

        Ok(StageResult {
            code: reply.selected_code,
            confidence: reply.confidence.clamp(0.0, 1.0),
            reasoning: reply.reasoning,
        })
    }
}

/// Strips optional Markdown code fences before parsing.
fn parse_reply(raw: &str) -> Result<StageReply, ClassifierError> {
    let trimmed = raw.trim();
    let json_text = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|s| s.strip_suffix("```").unwrap_or(s))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(json_text).map_err(|e| ClassifierError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsi_model::ClassifierNode;
    use std::sync::atomic::{AtomicUsize, Ordering};

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
        ])
        .unwrap()
    }

    struct ScriptedClient {
        replies: Vec<&'static str>,
        calls: AtomicUsize,
    }

    impl LlmClient for ScriptedClient {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, ClassifierError> {
            let i = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.replies[i].to_string())
        }
    }

    #[tokio::test]
    async fn descends_through_confident_stages() {
        let tree = tree();
        let client = ScriptedClient {
            replies: vec![
                r#"{"selected_code":"A","confidence":0.9,"reasoning":"fits"}"#,
                r#"{"selected_code":"A.1","confidence":0.95,"reasoning":"fits better"}"#,
            ],
            calls: AtomicUsize::new(0),
        };
        let cascade = Cascade::new(client);
        let result = cascade.classify(&tree, "Widget", "hardware").await.unwrap();
        assert_eq!(result.code, "A.1");
        assert_eq!(result.level, ClassifierLevel::Class);
    }

    #[tokio::test]
    async fn halts_below_threshold_and_returns_partial() {
        let tree = tree();
        let client = ScriptedClient {
            replies: vec![r#"{"selected_code":"A","confidence":0.4,"reasoning":"unsure"}"#],
            calls: AtomicUsize::new(0),
        };
        let cascade = Cascade::new(client);
        let result = cascade.classify(&tree, "Widget", "hardware").await.unwrap();
        assert_eq!(result.code, "A");
        assert_eq!(result.confidence, 0.4);
    }

    #[tokio::test]
    async fn code_outside_tree_fails_the_cascade() {
        let tree = tree();
        let client = ScriptedClient {
            replies: vec![r#"{"selected_code":"Z","confidence":0.9,"reasoning":"oops"}"#],
            calls: AtomicUsize::new(0),
        };
        let cascade = Cascade::new(client);
        let err = cascade.classify(&tree, "Widget", "hardware").await.unwrap_err();
        assert!(matches!(err, ClassifierError::CodeNotFound(_)));
    }

    #[tokio::test]
    async fn repeated_top_level_call_is_memoized() {
        let tree = tree();
        let client = ScriptedClient {
            replies: vec![r#"{"selected_code":"A","confidence":0.4,"reasoning":"unsure"}"#],
            calls: AtomicUsize::new(0),
        };
        let cascade = Cascade::new(client);
        let first = cascade.classify(&tree, "Widget", "hardware").await.unwrap();
        let second = cascade.classify(&tree, "Widget", "hardware").await.unwrap();
        assert_eq!(first, second);
    }
}

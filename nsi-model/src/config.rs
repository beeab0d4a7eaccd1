//! Per-project configuration recognized by the core.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ids::ProjectId;

/// Master-selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MasterSelectionStrategy {
    /// Weighted "data completeness" scoring (the default).
    MaxData,
    /// Purely `quality_score`.
    MaxQuality,
    /// Purely distinct-source-database count.
    MaxDatabases,
}

impl Default for MasterSelectionStrategy {
    fn default() -> Self {
        Self::MaxData
    }
}

/// Per-project configuration recognized by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project_id: ProjectId,
    pub auto_map_counterparties: bool,
    pub auto_merge_duplicates: bool,
    pub master_selection_strategy: MasterSelectionStrategy,
    pub classification_min_confidence: f64,
    pub fuzzy_grouping_enabled: bool,
    pub fuzzy_threshold: f64,
    /// Weights for the similarity kit's combined score, keyed by metric name
    /// (e.g. `"levenshtein"`, `"damerau"`, `"bigram"`, `"trigram"`,
    /// `"jaccard"`, `"soundex"`, `"metaphone"`). Empty means "use defaults".
    pub similarity_weights: HashMap<String, f64>,
    pub skip_already_normalized: bool,
    pub classification_enabled: bool,
}

impl ProjectConfig {
    /// A config with every field at its documented default, for the given project.
    pub fn with_defaults(project_id: ProjectId) -> Self {
        Self {
            project_id,
            auto_map_counterparties: true,
            auto_merge_duplicates: true,
            master_selection_strategy: MasterSelectionStrategy::default(),
            classification_min_confidence: 0.7,
            fuzzy_grouping_enabled: false,
            fuzzy_threshold: 0.85,
            similarity_weights: HashMap::new(),
            skip_already_normalized: false,
            classification_enabled: false,
        }
    }
}

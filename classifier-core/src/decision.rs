//! Decision engine: ranks up to three candidate classification results,
//! validates the winner, checks type compatibility, and always emits a
//! [`FinalDecision`] — this stage never fails.

use std::collections::HashSet;

use nsi_model::{ClassificationTree, DecisionMethod, FinalDecision};

use crate::code_validator::CodeValidator;
use crate::item_kind::ItemKind;

/// Which of the three upstream stages produced a [`DecisionCandidate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    Cascade,
    Keyword,
    FallbackParent,
    FallbackDefault,
}

impl CandidateSource {
    /// Base weight the source contributes to the ranking score.
    fn base_priority(self) -> f64 {
        match self {
            CandidateSource::Cascade => 1.0,
            CandidateSource::Keyword => 0.9,
            CandidateSource::FallbackParent | CandidateSource::FallbackDefault => 0.5,
        }
    }

    fn method(self) -> DecisionMethod {
        match self {
            CandidateSource::Cascade => DecisionMethod::Cascade,
            CandidateSource::Keyword => DecisionMethod::Keyword,
            CandidateSource::FallbackParent => DecisionMethod::FallbackParent,
            CandidateSource::FallbackDefault => DecisionMethod::FallbackDefault,
        }
    }

    fn stage_number(self) -> u8 {
        match self {
            CandidateSource::Keyword => 6,
            CandidateSource::Cascade => 7,
            CandidateSource::FallbackParent | CandidateSource::FallbackDefault => 8,
        }
    }
}

/// One candidate result feeding the decision engine.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionCandidate {
    pub code: String,
    pub confidence: f64,
    pub source: CandidateSource,
}

/// Maps a code's leading dotted segment to the type it represents, per a
/// project-supplied set of segments considered "service". Anything not
/// listed is treated as "product".
fn expected_type_for(code: &str, service_sections: &HashSet<String>) -> ItemKind {
    let leading = code.split('.').next().unwrap_or(code);
    if service_sections.contains(leading) {
        ItemKind::Service
    } else {
        ItemKind::Product
    }
}

fn confidence_bucket(confidence: f64) -> &'static str {
    if confidence >= 0.85 {
        "high_confidence"
    } else if confidence >= 0.6 {
        "medium_confidence"
    } else {
        "low_confidence"
    }
}

/// Ranks `candidates`, validates the winner (replacing it with a
/// type-compatible alternative if the winner doesn't match `expected_kind`),
/// and assembles the final result. Never returns an error: an empty or
/// entirely-unvalidatable candidate list produces [`FinalDecision::no_valid_classification`].
pub fn decide(
    tree: &ClassificationTree,
    validator: &impl CodeValidator,
    mut candidates: Vec<DecisionCandidate>,
    expected_kind: ItemKind,
    service_sections: &HashSet<String>,
) -> FinalDecision {
    if candidates.is_empty() {
        return FinalDecision::no_valid_classification();
    }

    candidates.sort_by(|a, b| {
        let score_a = a.source.base_priority() * a.confidence;
        let score_b = b.source.base_priority() * b.confidence;
        score_b.partial_cmp(&score_a).unwrap_or(std::cmp::Ordering::Equal)
    });

    let original_winner_idx = 0;
    let mut winner_idx = original_winner_idx;

    let Some(mut validated) = validator.validate(tree, &candidates[winner_idx].code, candidates[winner_idx].confidence)
    else {
        return FinalDecision::no_valid_classification();
    };

    if expected_kind != ItemKind::Unknown {
        let actual = expected_type_for(&candidates[winner_idx].code, service_sections);
        if actual != expected_kind {
            for (i, cand) in candidates.iter().enumerate() {
                if i == winner_idx {
                    continue;
                }
                if expected_type_for(&cand.code, service_sections) != expected_kind {
                    continue;
                }
                if let Some(v) = validator.validate(tree, &cand.code, cand.confidence) {
                    winner_idx = i;
                    validated = v;
                    break;
                }
            }
        }
    }

    let corrected = winner_idx != original_winner_idx;
    let winner = &candidates[winner_idx];
    let reason = if corrected {
        "type_corrected".to_string()
    } else {
        format!(
            "stage{}_{}_validated_valid",
            winner.source.stage_number(),
            confidence_bucket(validated.confidence)
        )
    };

    FinalDecision {
        code: winner.code.clone(),
        name: validated.name,
        confidence: validated.confidence,
        method: winner.source.method(),
        validation_passed: true,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_validator::TreeCodeValidator;
    use nsi_model::{ClassifierLevel, ClassifierNode};

    fn tree() -> ClassificationTree {
        ClassificationTree::from_nodes(vec![
            ClassifierNode {
                code: "PRODUCT".to_string(),
                name: "Products".to_string(),
                parent_code: None,
                level: ClassifierLevel::Section,
            },
            ClassifierNode {
                code: "SERVICE".to_string(),
                name: "Services".to_string(),
                parent_code: None,
                level: ClassifierLevel::Section,
            },
        ])
        .unwrap()
    }

    #[test]
    fn cascade_outranks_keyword_and_fallback() {
        let tree = tree();
        let candidates = vec![
            DecisionCandidate { code: "PRODUCT".to_string(), confidence: 0.7, source: CandidateSource::Cascade },
            DecisionCandidate { code: "SERVICE".to_string(), confidence: 0.95, source: CandidateSource::FallbackDefault },
        ];
        let decision = decide(&tree, &TreeCodeValidator, candidates, ItemKind::Unknown, &HashSet::new());
        assert_eq!(decision.code, "PRODUCT");
        assert_eq!(decision.method, DecisionMethod::Cascade);
    }

    #[test]
    fn type_mismatch_prefers_compatible_alternative() {
        let tree = tree();
        let mut service_sections = HashSet::new();
        service_sections.insert("SERVICE".to_string());

        let candidates = vec![
            DecisionCandidate { code: "PRODUCT".to_string(), confidence: 0.9, source: CandidateSource::Cascade },
            DecisionCandidate { code: "SERVICE".to_string(), confidence: 0.6, source: CandidateSource::Keyword },
        ];
        let decision = decide(&tree, &TreeCodeValidator, candidates, ItemKind::Service, &service_sections);
        assert_eq!(decision.code, "SERVICE");
        assert_eq!(decision.reason, "type_corrected");
    }

    #[test]
    fn type_match_does_not_mark_reason_as_corrected() {
        let tree = tree();
        let candidates = vec![DecisionCandidate {
            code: "PRODUCT".to_string(),
            confidence: 0.9,
            source: CandidateSource::Cascade,
        }];
        let decision = decide(&tree, &TreeCodeValidator, candidates, ItemKind::Unknown, &HashSet::new());
        assert_ne!(decision.reason, "type_corrected");
    }

    #[test]
    fn no_candidates_means_manual_review() {
        let tree = tree();
        let decision = decide(&tree, &TreeCodeValidator, vec![], ItemKind::Unknown, &HashSet::new());
        assert_eq!(decision.method, DecisionMethod::Manual);
        assert_eq!(decision.reason, "no_valid_classification");
    }

    #[test]
    fn unvalidatable_top_candidate_means_manual_review() {
        let tree = tree();
        let candidates = vec![DecisionCandidate {
            code: "NOPE".to_string(),
            confidence: 0.9,
            source: CandidateSource::Cascade,
        }];
        let decision = decide(&tree, &TreeCodeValidator, candidates, ItemKind::Unknown, &HashSet::new());
        assert_eq!(decision.method, DecisionMethod::Manual);
    }
}

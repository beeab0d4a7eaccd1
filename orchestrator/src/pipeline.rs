//! Per-item processing pipeline: pre-validate, extract, benchmark lookup,
//! LLM name normalization, classification, save-with-retry.

use std::collections::HashSet;

use attribute_extractor::extract;
use chrono::Utc;
use classifier_core::{
    decide, CandidateSource, Cascade, CodeValidator, DecisionCandidate, ItemKind, KeywordPatterns, LlmClient,
};
use name_normalizer::normalize_name;
use nsi_model::{CatalogItem, ClassificationTree, NormalizedCounterparty, ProjectConfig, SourceLink};
use nsi_model::ids::{stable_uuid, NAMESPACE_CANONICAL};
use nsi_store::{BenchmarkFinder, CounterpartyRepository, StoreError};
use tracing::warn;

use crate::error::{ItemError, ItemErrorKind};
use crate::llm_adapter::{normalize_via_llm, NormalizationRequest};
use crate::retry::retry_transient;
use crate::config::OrchestratorConfig;

/// Everything a single item's pipeline run needs, bundled so `batch.rs`
/// doesn't have to pass a dozen positional arguments to every worker call.
pub struct PipelineDeps<'a, R, B, C> {
    pub repo: &'a R,
    pub benchmark_finder: &'a B,
    pub llm: &'a ai_llm_service::LlmServiceProfiles,
    pub cascade: Option<&'a Cascade<C>>,
    pub tree: Option<&'a ClassificationTree>,
    pub validator: &'a (dyn CodeValidator + Send + Sync),
    pub keyword_patterns: &'a KeywordPatterns,
    pub service_sections: &'a HashSet<String>,
    pub project_config: &'a ProjectConfig,
    pub runtime: &'a OrchestratorConfig,
}

/// Guesses the item's product/service kind from the source catalog code's
/// leading dotted segment, the same membership test the decision engine
/// uses for type compatibility. Items without a source code are `Unknown`.
fn infer_item_kind(item: &CatalogItem, service_sections: &HashSet<String>) -> ItemKind {
    match &item.code {
        None => ItemKind::Unknown,
        Some(code) => {
            let leading = code.split('.').next().unwrap_or(code);
            if service_sections.contains(leading) {
                ItemKind::Service
            } else {
                ItemKind::Product
            }
        }
    }
}

/// Per-item outcome fed into the batch's running counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemOutcome {
    pub benchmark_matched: bool,
    pub enriched: bool,
}

/// Runs the full per-item pipeline and saves the result, retrying the final
/// write on transient store errors. Returns the per-item outcome on success
/// or a typed [`ItemError`] describing why the item was skipped/failed.
/// An item already normalized (when `skip_already_normalized` is set)
/// returns the zero-valued outcome without re-running the pipeline.
pub async fn process_item<R, B, C>(
    deps: &PipelineDeps<'_, R, B, C>,
    project_id: nsi_model::ProjectId,
    database_id: i64,
    item: CatalogItem,
) -> Result<ItemOutcome, ItemError>
where
    R: CounterpartyRepository,
    B: BenchmarkFinder,
    C: LlmClient,
{
    let source_ref = item.source_reference.clone();

    if deps.project_config.skip_already_normalized {
        match deps
            .repo
            .get_normalized_by_source_ref(project_id, database_id, &source_ref)
            .await
        {
            Ok(Some(_)) => return Ok(ItemOutcome::default()),
            Ok(None) => {}
            Err(e) => return Err(ItemError::new(source_ref, ItemErrorKind::Transient, e.to_string())),
        }
    }

    let validated = normalize_name(&item.source_name);
    if !validated.outcome.is_valid {
        return Err(ItemError::new(
            source_ref,
            ItemErrorKind::ValidationFailure,
            validated.outcome.reason,
        ));
    }

    let attributes = item.attributes.as_deref().map(extract).unwrap_or_default();
    let entity_type = "counterparty";

    let benchmark = deps
        .benchmark_finder
        .find_best_match(&validated.outcome.cleaned_name, entity_type)
        .await
        .map_err(|e| ItemError::new(source_ref.clone(), ItemErrorKind::Transient, e.to_string()))?;

    let benchmark_matched = benchmark.is_some();
    let (normalized_name, source_enrichment, enrichment_applied) = if let Some(bench) = &benchmark {
        (bench.normalized_name.clone(), Some("benchmark".to_string()), true)
    } else {
        let request = if attributes.tax_id.is_some() {
            NormalizationRequest::Counterparty {
                name: &validated.outcome.cleaned_name,
                tax_id: attributes.tax_id.as_deref(),
            }
        } else {
            NormalizationRequest::Name { name: &validated.outcome.cleaned_name }
        };
        match normalize_via_llm(deps.llm, request, deps.runtime.llm_timeout).await {
            Ok(name) => (name, Some("llm".to_string()), false),
            Err(e) => {
                warn!(source_reference = %source_ref, error = %e, "llm normalization failed, using cleaned name");
                (validated.outcome.cleaned_name.clone(), None, false)
            }
        }
    };

    let kind = infer_item_kind(&item, deps.service_sections);
    let category = match kind {
        ItemKind::Service => "service",
        ItemKind::Product | ItemKind::Unknown => "product",
    };
    let subcategory = if deps.project_config.classification_enabled {
        classify_item(deps, &normalized_name, category, kind).await
    } else {
        None
    };

    // Deterministic per (project, source reference), so re-running over an
    // unchanged item is idempotent at the store layer.
    let canonical_id = stable_uuid(&NAMESPACE_CANONICAL, &format!("{project_id}:{source_ref}"));
    let now = Utc::now();
    let link_source_name = item.source_name.clone();
    let record = NormalizedCounterparty {
        id: canonical_id,
        project_id,
        source_reference: source_ref.clone(),
        source_name: item.source_name,
        normalized_name,
        legal_form: validated.legal_form.map(str::to_string),
        tax_id: attributes.tax_id,
        secondary_id: attributes.secondary_id,
        alt_tax_id: attributes.alt_tax_id,
        legal_address: attributes.legal_address,
        postal_address: attributes.postal_address,
        phone: attributes.phone,
        email: attributes.email,
        contact_person: attributes.contact_person,
        bank_name: attributes.bank_name,
        bank_account: attributes.bank_account,
        correspondent_account: attributes.correspondent_account,
        bank_code: attributes.bank_code,
        quality_score: if enrichment_applied { 0.8 } else { 0.5 },
        enrichment_applied,
        source_enrichment,
        source_database: Some(database_id.to_string()),
        benchmark_id: benchmark.map(|b| b.id),
        subcategory,
        created_at: now,
        updated_at: now,
    };

    save_with_retry(deps.repo, deps.runtime, record).await
        .map_err(|e| ItemError::new(source_ref.clone(), ItemErrorKind::Transient, e.to_string()))?;

    deps.repo
        .save_source_link(SourceLink {
            canonical_id,
            source_database_id: database_id,
            source_reference: source_ref.clone(),
            source_name: link_source_name,
        })
        .await
        .map_err(|e| ItemError::new(source_ref, ItemErrorKind::Transient, e.to_string()))?;

    Ok(ItemOutcome { benchmark_matched, enriched: enrichment_applied })
}

async fn save_with_retry<R: CounterpartyRepository>(
    repo: &R,
    runtime: &OrchestratorConfig,
    record: NormalizedCounterparty,
) -> Result<(), StoreError> {
    retry_transient(
        runtime.retry_max_attempts,
        runtime.retry_base_backoff,
        runtime.retry_max_backoff,
        || {
            let record = record.clone();
            async move { repo.save_normalized(record).await }
        },
    )
    .await
}

/// Runs the cascade when available; on cascade failure or absence, falls
/// back to the keyword/parent chain and combines both into a decision.
/// Returns the decided code, or `None` if nothing validated.
async fn classify_item<R, B, C>(
    deps: &PipelineDeps<'_, R, B, C>,
    normalized_name: &str,
    category: &str,
    kind: ItemKind,
) -> Option<String>
where
    R: CounterpartyRepository,
    B: BenchmarkFinder,
    C: LlmClient,
{
    let tree = deps.tree?;
    let mut candidates = Vec::with_capacity(3);
    let mut invalid_code = None;

    if let Some(cascade) = deps.cascade {
        match cascade
            .classify_with_threshold(tree, normalized_name, category, deps.project_config.classification_min_confidence)
            .await
        {
            Ok(result) => candidates.push(DecisionCandidate {
                code: result.code,
                confidence: result.confidence,
                source: CandidateSource::Cascade,
            }),
            Err(classifier_core::ClassifierError::CodeNotFound(code)) => invalid_code = Some(code),
            Err(_) => {}
        }
    }

    if let Some(keyword) = classifier_core::keyword_fallback(normalized_name, kind, deps.keyword_patterns) {
        candidates.push(DecisionCandidate {
            code: keyword.code,
            confidence: keyword.confidence,
            source: CandidateSource::Keyword,
        });
    }

    if candidates.is_empty() {
        if let Some(fallback) = classifier_core::run_chain(
            tree,
            invalid_code.as_deref(),
            normalized_name,
            kind,
            deps.keyword_patterns,
        ) {
            let source = if fallback.sets_manual_review {
                CandidateSource::FallbackDefault
            } else {
                CandidateSource::FallbackParent
            };
            candidates.push(DecisionCandidate { code: fallback.code, confidence: fallback.confidence, source });
        }
    }

    let decision = decide(tree, deps.validator, candidates, kind, deps.service_sections);
    if decision.code.is_empty() {
        None
    } else {
        Some(decision.code)
    }
}

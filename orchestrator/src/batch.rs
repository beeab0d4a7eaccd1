//! Top-level per-project batch run: loads catalog items across every
//! database registered to the project, dispatches them onto the bounded
//! worker pool, emits periodic progress events, checks cancellation at every
//! coarse step, and — once the batch settles — runs the deduplication pass
//! over the project's canonical records.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use classifier_core::{Cascade, CodeValidator, KeywordPatterns, LlmClient};
use dedup_engine::{analyze, merge_group, select_master, ScoringInput};
use nsi_model::{ClassificationTree, ProjectConfig, ProjectId};
use nsi_store::{BenchmarkFinder, CancellationToken, CounterpartyRepository, EventSender};
use tracing::{info, warn};

use crate::config::OrchestratorConfig;
use crate::error::{ItemError, ItemErrorKind};
use crate::pipeline::{process_item, PipelineDeps};
use crate::worker_pool::run_bounded;

/// Result summary handed back to the caller: counts plus a capped list of
/// per-item errors.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub total_processed: usize,
    pub benchmark_matches: usize,
    pub enriched_count: usize,
    pub duplicate_groups: usize,
    pub created_benchmarks: usize,
    pub errors: Vec<ItemError>,
}

/// Caps how many per-item errors a single batch result carries, so a
/// catastrophic input doesn't grow the result without bound.
const MAX_ERRORS: usize = 1000;

impl BatchResult {
    fn record_error(&mut self, error: ItemError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
    }
}

/// Bundles the read-only dependencies a batch run needs for its whole
/// lifetime. `run_batch` borrows from this for both the per-item pipeline
/// and the post-batch dedup pass.
pub struct BatchDeps<'a, R, B, C> {
    pub repo: &'a R,
    pub benchmark_finder: &'a B,
    pub llm: &'a ai_llm_service::LlmServiceProfiles,
    pub cascade: Option<&'a Cascade<C>>,
    pub tree: Option<&'a ClassificationTree>,
    pub validator: &'a (dyn CodeValidator + Send + Sync),
    pub keyword_patterns: &'a KeywordPatterns,
    pub service_sections: &'a HashSet<String>,
    pub events: EventSender,
    pub cancellation: CancellationToken,
}

pub async fn run_batch<R, B, C>(
    deps: BatchDeps<'_, R, B, C>,
    project_id: ProjectId,
    project_config: &ProjectConfig,
    runtime: &OrchestratorConfig,
) -> Result<BatchResult, crate::error::OrchestratorError>
where
    R: CounterpartyRepository,
    B: BenchmarkFinder,
    C: LlmClient,
{
    let mut result = BatchResult::default();

    if deps.cancellation.is_cancelled() {
        result.record_error(ItemError::normalization_stopped());
        return Ok(result);
    }

    let databases = deps.repo.list_project_databases(project_id).await?;
    let mut items = Vec::new();
    for database_id in databases {
        let catalog_items = deps.repo.list_catalog_items_by_database(database_id).await?;
        items.extend(catalog_items.into_iter().map(|item| (database_id, item)));
    }

    if items.is_empty() {
        return Ok(result);
    }

    if deps.cancellation.is_cancelled() {
        result.record_error(ItemError::normalization_stopped());
        return Ok(result);
    }

    info!(project = %project_id, total = items.len(), "starting batch");

    let pipeline_deps = PipelineDeps {
        repo: deps.repo,
        benchmark_finder: deps.benchmark_finder,
        llm: deps.llm,
        cascade: deps.cascade,
        tree: deps.tree,
        validator: deps.validator,
        keyword_patterns: deps.keyword_patterns,
        service_sections: deps.service_sections,
        project_config,
        runtime,
    };

    let total = items.len();
    let progress_interval = runtime.progress_interval;
    let processed = AtomicUsize::new(0);

    let outcomes = run_bounded(items, runtime.max_concurrency, |(database_id, item)| {
        let pipeline_deps = &pipeline_deps;
        let events = &deps.events;
        let cancellation = &deps.cancellation;
        let processed = &processed;
        async move {
            if cancellation.is_cancelled() {
                return Err(ItemError::normalization_stopped());
            }
            let outcome = process_item(pipeline_deps, project_id, database_id, item).await;
            let n = processed.fetch_add(1, Ordering::SeqCst) + 1;
            if n % progress_interval == 0 {
                events.send(format!("processed {n}/{total}")).await;
            }
            outcome
        }
    })
    .await;

    let mut saw_stop_marker = false;
    for outcome in outcomes {
        result.total_processed += 1;
        match outcome {
            Ok(o) => {
                if o.benchmark_matched {
                    result.benchmark_matches += 1;
                }
                if o.enriched {
                    result.enriched_count += 1;
                }
            }
            Err(e) if e.kind == ItemErrorKind::CancellationRequested => {
                if !saw_stop_marker {
                    result.record_error(e);
                    saw_stop_marker = true;
                }
            }
            Err(e) => result.record_error(e),
        }
    }

    if deps.cancellation.is_cancelled() {
        if !saw_stop_marker {
            result.record_error(ItemError::normalization_stopped());
        }
        return Ok(result);
    }

    if project_config.auto_map_counterparties || project_config.auto_merge_duplicates {
        run_dedup_pass(deps.repo, project_id, project_config, &mut result).await;
    }

    Ok(result)
}

/// Runs the analyze/select-master/merge pass over the project's current
/// canonical-record population.
/// Merge failures are logged and skipped per group; the batch result still
/// reports the groups that were found even if some merges failed.
async fn run_dedup_pass<R: CounterpartyRepository>(
    repo: &R,
    project_id: ProjectId,
    project_config: &ProjectConfig,
    result: &mut BatchResult,
) {
    let records = match repo.list_canonical_records(project_id).await {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "could not load canonical records for dedup pass");
            return;
        }
    };

    let groups = analyze(&records, project_config, false);
    result.duplicate_groups = groups.len();

    if !project_config.auto_merge_duplicates {
        return;
    }

    let by_id: std::collections::HashMap<_, _> = records.iter().map(|r| (r.id, r)).collect();

    for group in groups {
        let Some(master_id) = select_group_master(repo, &group.items, &by_id, project_config).await else {
            continue;
        };
        let Some(master) = by_id.get(&master_id) else { continue };
        let others: Vec<_> = group
            .items
            .iter()
            .filter(|id| **id != master_id)
            .filter_map(|id| by_id.get(id).copied().cloned())
            .collect();

        if others.is_empty() {
            continue;
        }

        if let Err(e) = merge_group(repo, master, &others).await {
            warn!(group_key = %group.key, error = %e, "group merge failed, skipping");
        }
    }
}

async fn select_group_master<R: CounterpartyRepository>(
    repo: &R,
    ids: &[nsi_model::CanonicalId],
    by_id: &std::collections::HashMap<nsi_model::CanonicalId, &nsi_model::NormalizedCounterparty>,
    project_config: &ProjectConfig,
) -> Option<nsi_model::CanonicalId> {
    let mut inputs = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(record) = by_id.get(id) else { continue };
        let source_database_count = match repo.get_source_links(*id).await {
            Ok(links) => {
                let mut seen: Vec<i64> = links.iter().map(|l| l.source_database_id).collect();
                seen.sort_unstable();
                seen.dedup();
                seen.len()
            }
            Err(e) => {
                warn!(canonical_id = %id, error = %e, "could not load source links for master scoring, treating as zero");
                0
            }
        };
        inputs.push(ScoringInput { record, source_database_count });
    }
    select_master(&inputs, project_config.master_selection_strategy)
}

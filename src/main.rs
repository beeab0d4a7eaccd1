use std::collections::HashSet;
use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use ai_llm_service::config::default_config::{config_ollama_embedding, config_ollama_fast, config_ollama_slow};
use classifier_core::{Cascade, KeywordPatterns, TreeCodeValidator};
use nsi_model::ids::{NAMESPACE_CANONICAL, stable_uuid};
use nsi_model::{CatalogItem, ClassificationTree, ClassifierLevel, ClassifierNode, ProjectConfig};
use nsi_store::{CancellationToken, InMemoryBenchmarkFinder, InMemoryStore, event_channel};
use orchestrator::{BatchDeps, OrchestratorConfig, ProfileLlmClient, run_batch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file.
    // Fails if .env file not found, not readable or invalid.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let profiles = Arc::new(LlmServiceProfiles::new(
        config_ollama_fast()?,
        config_ollama_slow().ok(),
        config_ollama_embedding()?,
        None,
    )?);

    let project_id = stable_uuid(&NAMESPACE_CANONICAL, "demo-project");
    let project_config = ProjectConfig::with_defaults(project_id);

    let store = InMemoryStore::new();
    store.seed_catalog(project_id, 1, demo_catalog_items()).await;

    let tree = ClassificationTree::from_nodes(demo_classifier_nodes())?;
    let cascade = Cascade::new(ProfileLlmClient::new(profiles.clone()));
    let validator = TreeCodeValidator;
    let keyword_patterns = KeywordPatterns::new();
    let service_sections: HashSet<String> = HashSet::new();
    let benchmark_finder = InMemoryBenchmarkFinder::default();

    let (events, mut events_rx) = event_channel(16);
    tokio::spawn(async move {
        while let Some(message) = events_rx.recv().await {
            info!(%message, "batch progress");
        }
    });

    let runtime_config = OrchestratorConfig::with_defaults(1);
    let deps = BatchDeps {
        repo: &store,
        benchmark_finder: &benchmark_finder,
        llm: &profiles,
        cascade: Some(&cascade),
        tree: Some(&tree),
        validator: &validator,
        keyword_patterns: &keyword_patterns,
        service_sections: &service_sections,
        events,
        cancellation: CancellationToken::new(),
    };

    match run_batch(deps, project_id, &project_config, &runtime_config).await {
        Ok(result) => info!(?result, "batch finished"),
        Err(e) => error!(error = %e, "batch failed"),
    }

    Ok(())
}

fn demo_classifier_nodes() -> Vec<ClassifierNode> {
    vec![
        ClassifierNode {
            code: "10".to_string(),
            name: "General goods".to_string(),
            parent_code: None,
            level: ClassifierLevel::Section,
        },
        ClassifierNode {
            code: "10.1".to_string(),
            name: "Office supplies".to_string(),
            parent_code: Some("10".to_string()),
            level: ClassifierLevel::Class,
        },
    ]
}

fn demo_catalog_items() -> Vec<CatalogItem> {
    vec![CatalogItem {
        id: 1,
        source_reference: "1C:00001".to_string(),
        source_name: "ООО Ромашка".to_string(),
        code: None,
        attributes: Some("ИНН: 7701234567".to_string()),
        source_database_id: 1,
    }]
}

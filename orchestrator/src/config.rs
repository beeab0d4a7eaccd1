//! Environment-driven orchestrator configuration, loaded the same way
//! `ai_llm_service::config::default_config` loads its own env vars: a
//! `must_env`/`env_opt_u32` pass with no silent defaults on required fields.

use std::time::Duration;

use ai_llm_service::error_handler::{env_opt_u32, must_env, ConfigError};

/// Process-wide knobs for a batch run. Per-project behaviour (auto-map,
/// auto-merge, thresholds, similarity weights) stays in `ProjectConfig` —
/// this struct only covers what the orchestrator fixes process-wide.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Worker pool size; clamped to `[2, 10]` regardless of what's configured.
    pub max_concurrency: usize,
    /// How many items between progress events.
    pub progress_interval: usize,
    pub llm_timeout: Duration,
    pub benchmark_cache_ttl: Duration,
    pub benchmark_cache_capacity: usize,
    pub retry_max_attempts: u32,
    pub retry_base_backoff: Duration,
    pub retry_max_backoff: Duration,
}

impl OrchestratorConfig {
    /// Loads overrides from environment, falling back to safe defaults
    /// for anything unset. `ORCHESTRATOR_MAX_CONCURRENCY` is the only value
    /// actually required to size the pool against a real input count — the
    /// rest have safe defaults.
    pub fn from_env(total_items: usize) -> Result<Self, ConfigError> {
        let configured_concurrency = env_opt_u32("ORCHESTRATOR_MAX_CONCURRENCY")?.map(|v| v as usize);
        let max_concurrency = configured_concurrency.unwrap_or(total_items).max(2).min(10);

        let progress_interval = env_opt_u32("ORCHESTRATOR_PROGRESS_INTERVAL")?.unwrap_or(10) as usize;
        let llm_timeout_secs = env_opt_u32("ORCHESTRATOR_LLM_TIMEOUT_SECS")?.unwrap_or(30);
        let ttl_secs = env_opt_u32("ORCHESTRATOR_BENCHMARK_CACHE_TTL_SECS")?.unwrap_or(300);
        let capacity = env_opt_u32("ORCHESTRATOR_BENCHMARK_CACHE_CAPACITY")?.unwrap_or(1000) as usize;
        let retry_max_attempts = env_opt_u32("ORCHESTRATOR_RETRY_MAX_ATTEMPTS")?.unwrap_or(3);
        let retry_base_backoff_ms = env_opt_u32("ORCHESTRATOR_RETRY_BASE_BACKOFF_MS")?.unwrap_or(100);
        let retry_max_backoff_ms = env_opt_u32("ORCHESTRATOR_RETRY_MAX_BACKOFF_MS")?.unwrap_or(1000);

        Ok(Self {
            max_concurrency,
            progress_interval: progress_interval.max(1),
            llm_timeout: Duration::from_secs(llm_timeout_secs as u64),
            benchmark_cache_ttl: Duration::from_secs(ttl_secs as u64),
            benchmark_cache_capacity: capacity,
            retry_max_attempts: retry_max_attempts.max(1),
            retry_base_backoff: Duration::from_millis(retry_base_backoff_ms as u64),
            retry_max_backoff: Duration::from_millis(retry_max_backoff_ms as u64),
        })
    }

    /// A config with every default applied, sized for `total_items`.
    pub fn with_defaults(total_items: usize) -> Self {
        Self {
            max_concurrency: total_items.max(2).min(10),
            progress_interval: 10,
            llm_timeout: Duration::from_secs(30),
            benchmark_cache_ttl: Duration::from_secs(300),
            benchmark_cache_capacity: 1000,
            retry_max_attempts: 3,
            retry_base_backoff: Duration::from_millis(100),
            retry_max_backoff: Duration::from_millis(1000),
        }
    }
}

/// Required env var naming the Ollama/OpenAI backing for the
/// name-normalization and classification LLM calls — delegated straight to
/// `ai_llm_service`'s own constructors, this just confirms presence early
/// so a missing model config fails before any work is scheduled.
pub fn require_llm_env() -> Result<(), ConfigError> {
    must_env("OLLAMA_MODEL")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_clamp_concurrency_into_range() {
        let cfg = OrchestratorConfig::with_defaults(1);
        assert_eq!(cfg.max_concurrency, 2);
        let cfg = OrchestratorConfig::with_defaults(100);
        assert_eq!(cfg.max_concurrency, 10);
        let cfg = OrchestratorConfig::with_defaults(5);
        assert_eq!(cfg.max_concurrency, 5);
    }
}

//! Adapts `ai_llm_service::LlmServiceProfiles` to the two LLM seams the rest
//! of the core depends on: `classifier_core::LlmClient` for the cascade, and
//! a free function for the name-normalizer's `NormalizeCounterparty`/
//! `NormalizeName` call.

use std::sync::Arc;
use std::time::Duration;

use ai_llm_service::LlmServiceProfiles;
use classifier_core::{ClassifierError, LlmClient};

/// Wraps a shared [`LlmServiceProfiles`] so `classifier-core`'s cascade can
/// call it without depending on `ai-llm-service` directly.
pub struct ProfileLlmClient {
    profiles: Arc<LlmServiceProfiles>,
}

impl ProfileLlmClient {
    pub fn new(profiles: Arc<LlmServiceProfiles>) -> Self {
        Self { profiles }
    }
}

impl LlmClient for ProfileLlmClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ClassifierError> {
        self.profiles
            .generate_fast(user_prompt, Some(system_prompt))
            .await
            .map_err(|e| ClassifierError::Transport(e.to_string()))
    }
}

/// Which name-normalization call to make: a counterparty with at least one
/// identifier gets the richer prompt.
pub enum NormalizationRequest<'a> {
    Counterparty { name: &'a str, tax_id: Option<&'a str> },
    Name { name: &'a str },
}

fn system_prompt_for(request: &NormalizationRequest<'_>) -> &'static str {
    match request {
        NormalizationRequest::Counterparty { .. } => {
            "You normalize legal-entity counterparty names. Given a raw name and, if \
             present, its tax identifier, respond with only the cleaned canonical name, \
             no commentary."
        }
        NormalizationRequest::Name { .. } => {
            "You normalize free-text item/nomenclature names. Respond with only the \
             cleaned canonical name, no commentary."
        }
    }
}

fn user_prompt_for(request: &NormalizationRequest<'_>) -> String {
    match request {
        NormalizationRequest::Counterparty { name, tax_id: Some(id) } => {
            format!("Name: {name}\nTax ID: {id}")
        }
        NormalizationRequest::Counterparty { name, tax_id: None } => format!("Name: {name}"),
        NormalizationRequest::Name { name } => format!("Name: {name}"),
    }
}

/// Calls the fast profile with a bounded deadline; the caller's configured
/// timeout is the only bound on how long a single normalization call may block.
pub async fn normalize_via_llm(
    profiles: &LlmServiceProfiles,
    request: NormalizationRequest<'_>,
    timeout: Duration,
) -> Result<String, LlmAdapterError> {
    let system = system_prompt_for(&request);
    let user = user_prompt_for(&request);

    match tokio::time::timeout(timeout, profiles.generate_fast(&user, Some(system))).await {
        Ok(Ok(text)) => Ok(text.trim().to_string()),
        Ok(Err(e)) => Err(LlmAdapterError::Backend(e.to_string())),
        Err(_) => Err(LlmAdapterError::Timeout),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmAdapterError {
    #[error("llm call timed out")]
    Timeout,
    #[error("llm backend error: {0}")]
    Backend(String),
}

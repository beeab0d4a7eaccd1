//! LLM provider configuration: the provider enum, the per-invocation config
//! struct, and environment-driven constructors for the default Ollama setup.

pub mod default_config;
pub mod llm_model_config;
pub mod llm_provider;

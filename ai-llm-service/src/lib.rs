//! Shared LLM service: provider clients (Ollama/OpenAI), a unified error
//! type, health checks, and a cached fast/slow/embedding profile facade.
//!
//! Generalized from a chat-assistant backend to back the classification
//! cascade's `LlmClient` boundary (see `classifier-core`): the provider
//! clients and profile cache are unchanged, only their caller differs.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use error_handler::AiLlmError;
pub use service_profiles::LlmServiceProfiles;

//! Thin provider clients, one per backend.

pub mod ollama_service;
pub mod open_ai_service;

//! Hierarchical classification: a four-stage LLM cascade over a
//! [`nsi_model::ClassificationTree`], a fallback chain for when the cascade
//! doesn't produce a confident result, and a decision engine that picks
//! between whatever candidates the two produced.

pub mod cascade;
pub mod code_validator;
pub mod decision;
pub mod error;
pub mod fallback;
pub mod item_kind;
pub mod llm_client;
pub mod prompts;

pub use cascade::{Cascade, CascadeResult};
pub use code_validator::{CodeValidator, TreeCodeValidator, ValidatedCode};
pub use decision::{decide, CandidateSource, DecisionCandidate};
pub use error::ClassifierError;
pub use fallback::{
    canonical_root_word, category_default_fallback, keyword_fallback, parent_code_fallback, run_chain,
    FallbackResult, KeywordPatterns,
};
pub use item_kind::ItemKind;
pub use llm_client::LlmClient;

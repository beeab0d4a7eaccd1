//! LLM boundary the cascade calls against, one `complete` per stage.
//!
//! A native `async fn` trait rather than `#[async_trait]`, mirroring
//! `nsi_store::CounterpartyRepository`: callers are generic over
//! `C: LlmClient` instead of holding a `dyn` object.

use crate::error::ClassifierError;

pub trait LlmClient: Send + Sync {
    /// Runs one completion call; returns the raw model text, which may
    /// contain JSON wrapped in code fences.
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl Future<Output = Result<String, ClassifierError>> + Send;
}

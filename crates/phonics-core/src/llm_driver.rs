// LLM Driver Abstraction
//
// Story and feedback generation only needs single-shot text completion, so the
// driver surface is one method. Provider crates (phonics-gemini) implement it;
// core has no knowledge of any specific provider API.

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for LLM drivers
///
/// Implementations send one prompt to a provider and return the generated text.
/// Provider failures are reported as `GenerationError::Llm`.
#[async_trait]
pub trait LlmDriver: Send + Sync {
    /// Generate text for a single user prompt
    async fn generate_text(&self, prompt: &str) -> Result<String>;

    /// Model identifier, for logs
    fn model(&self) -> &str;
}

/// Shared, dynamically dispatched driver
pub type BoxedLlmDriver = Arc<dyn LlmDriver>;


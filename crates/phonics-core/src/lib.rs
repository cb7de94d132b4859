// Phonics Explorer core
//
// Domain logic shared by the HTTP server:
// - Word catalog filtering (allowlist or dictionary strategy)
// - Content generation gateway (prompts, offline templates, LlmDriver trait)
//
// Note: LLM driver implementations live in provider crates (phonics-gemini) that
// depend on this crate. Nothing here performs HTTP itself.

pub mod error;
pub mod generation;
pub mod llm_driver;
pub mod words;

// Re-exports for convenience
pub use error::{GenerationError, Result};
pub use generation::{ContentGateway, Feedback, ProbeOutcome, PromptStyle, Story};
pub use llm_driver::{BoxedLlmDriver, LlmDriver};
pub use words::{AllowlistFilter, DictionaryFilter, WordFilter, WordFilterStrategy};

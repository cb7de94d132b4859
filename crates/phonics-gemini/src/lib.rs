// Gemini Driver Implementation
//
// This crate provides the Google Gemini LLM driver. It implements the LlmDriver
// trait from phonics-core, which the content gateway uses for stories, reading
// feedback and the liveness probe.

mod driver;
mod types;


pub use driver::{GeminiLlmDriver, DEFAULT_API_URL, DEFAULT_MODEL};

// Re-export core types for convenience
pub use phonics_core::llm_driver::LlmDriver;

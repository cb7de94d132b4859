// Gemini LLM Driver
//
// Implementation of LlmDriver for Google's Generative Language API.
// Uses the non-streaming generateContent endpoint with a single user turn.

use async_trait::async_trait;
use reqwest::Client;

use phonics_core::error::{GenerationError, Result};
use phonics_core::llm_driver::LlmDriver;

use crate::types::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini LLM Driver
///
/// # Example
///
/// ```ignore
/// use phonics_gemini::GeminiLlmDriver;
///
/// let driver = GeminiLlmDriver::new("your-api-key");
/// // or with a different model and endpoint
/// let driver = GeminiLlmDriver::new("your-api-key")
///     .with_model("gemini-1.5-flash")
///     .with_base_url("https://proxy.example.com/v1beta");
/// ```
#[derive(Clone)]
pub struct GeminiLlmDriver {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiLlmDriver {
    /// Create a driver for the default model and endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Share an existing HTTP client (connection pool)
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl LlmDriver for GeminiLlmDriver {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest::user_prompt(prompt);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::llm(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&error_text)
                .map(|env| match env.error.status {
                    Some(code) => format!("{} [{}]", env.error.message, code),
                    None => env.error.message,
                })
                .unwrap_or(error_text);
            return Err(GenerationError::llm(format!(
                "Gemini API error ({}): {}",
                status, message
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::llm(format!("Failed to parse response: {}", e)))?;

        if let Some(text) = body.text() {
            tracing::debug!(
                model = %self.model,
                model_version = ?body.model_version,
                chars = text.len(),
                "Gemini generation completed"
            );
            return Ok(text);
        }

        // No usable text: report why, the way the provider explains it
        let reason = body
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
            .map(|r| format!("prompt blocked ({})", r))
            .or_else(|| {
                body.candidates
                    .first()
                    .and_then(|c| c.finish_reason.clone())
                    .map(|r| format!("finish reason {}", r))
            })
            .unwrap_or_else(|| "no candidates returned".to_string());

        Err(GenerationError::llm(format!(
            "Gemini response contained no text: {}",
            reason
        )))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for GeminiLlmDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiLlmDriver")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

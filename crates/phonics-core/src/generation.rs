// Content generation gateway
//
// Builds child-appropriate prompts and forwards them to the configured LlmDriver.
// Without a driver (no API key at startup) every operation returns a fixed
// template instead of calling out, so the frontend keeps working offline.

use crate::error::{GenerationError, Result};
use crate::llm_driver::BoxedLlmDriver;
use serde::{Deserialize, Serialize};

/// Prompt sent by the liveness probe
pub const PROBE_PROMPT: &str = "Say hello in one word.";

/// Probe message when no API key is configured
pub const MISSING_API_KEY_MESSAGE: &str = "GOOGLE_API_KEY not set";

/// Score reported with fallback feedback
pub const FALLBACK_SCORE: &str = "N/A";

/// Which audience the prompts are written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    /// One short plain sentence, cheerleader feedback
    #[default]
    Toddler,
    /// Three-sentence story, reading coach feedback
    EarlyReader,
}

impl PromptStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptStyle::Toddler => "toddler",
            PromptStyle::EarlyReader => "early_reader",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "toddler" => Some(PromptStyle::Toddler),
            "early_reader" => Some(PromptStyle::EarlyReader),
            _ => None,
        }
    }

    /// Instruction asking for a short story or sentence using `word`
    pub fn story_prompt(&self, word: &str) -> String {
        match self {
            PromptStyle::Toddler => format!(
                "Write exactly ONE very simple, short sentence (~5-7 words) for a toddler. \
                 Use the word '{word}'. \
                 Do NOT use any emojis. Keep it plain text."
            ),
            PromptStyle::EarlyReader => format!(
                "Write a very short, simple story (3 sentences max) for a child learning to read. \
                 Use the word '{word}' at least once. \
                 The language should be simple and encouraging."
            ),
        }
    }

    /// Instruction asking the model to compare a reading attempt with its text
    pub fn feedback_prompt(&self, original_text: &str, transcript: &str) -> Result<String> {
        match self {
            PromptStyle::Toddler => {
                let main_word = original_text.split_whitespace().next().ok_or_else(|| {
                    GenerationError::invalid_request("original_text has no words")
                })?;
                Ok(format!(
                    "Act as a cheerleader for a toddler. \
                     Original: '{original_text}'. \
                     Child said: '{transcript}'. \
                     If they got the main word '{main_word}', EXCLAIM 'Great Job!' or 'Wow!'. \
                     Ignore minor mistakes. Keep it under 10 words."
                ))
            }
            PromptStyle::EarlyReader => Ok(format!(
                "Act as a kind reading coach for a child. \
                 Original text: '{original_text}'. \
                 Child read: '{transcript}'. \
                 Compare these. If they are close, give positive praise. \
                 If there are mistakes, kindly point out which word to practice. \
                 Keep it to 1-2 sentences. Ensure the tone is encouraging."
            )),
        }
    }

    /// Feedback returned when no API key is configured
    pub fn fallback_feedback(&self) -> &'static str {
        match self {
            PromptStyle::Toddler => "Great job! (Add API Key for AI feedback)",
            PromptStyle::EarlyReader => "Great job trying! (Add API Key for AI feedback)",
        }
    }
}

/// Story template used when no API key is configured
pub fn fallback_story(word: &str) -> String {
    format!("The {word} is here. It is a nice {word}. Look at the {word}.")
}

/// A generated (or templated) story
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub text: String,
    /// False when the text came from the offline template
    pub generated: bool,
}

/// Reading feedback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    /// Only set by the offline template
    pub score: Option<String>,
}

/// Result of the liveness probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Ok { response: String },
    Error { message: String },
}

/// Gateway between HTTP handlers and the LLM provider
#[derive(Clone)]
pub struct ContentGateway {
    driver: Option<BoxedLlmDriver>,
    style: PromptStyle,
}

impl ContentGateway {
    /// Gateway that calls the given driver
    pub fn new(driver: BoxedLlmDriver, style: PromptStyle) -> Self {
        Self {
            driver: Some(driver),
            style,
        }
    }

    /// Gateway that never calls out and always returns templates
    pub fn offline(style: PromptStyle) -> Self {
        Self {
            driver: None,
            style,
        }
    }

    /// Generate a short story containing `word`
    pub async fn generate_story(&self, word: &str) -> Result<Story> {
        let Some(driver) = &self.driver else {
            return Ok(Story {
                text: fallback_story(word),
                generated: false,
            });
        };

        let prompt = self.style.story_prompt(word);
        tracing::debug!(word = %word, model = %driver.model(), "Generating story");

        let text = driver.generate_text(&prompt).await.map_err(|e| {
            tracing::error!(word = %word, "Story generation failed: {}", e);
            e
        })?;

        Ok(Story {
            text,
            generated: true,
        })
    }

    /// Generate encouraging feedback comparing a transcript with its text
    pub async fn generate_feedback(&self, original_text: &str, transcript: &str) -> Result<Feedback> {
        let Some(driver) = &self.driver else {
            return Ok(Feedback {
                text: self.style.fallback_feedback().to_string(),
                score: Some(FALLBACK_SCORE.to_string()),
            });
        };

        let prompt = self.style.feedback_prompt(original_text, transcript)?;
        tracing::debug!(model = %driver.model(), "Generating reading feedback");

        let text = driver.generate_text(&prompt).await.map_err(|e| {
            tracing::error!("Feedback generation failed: {}", e);
            e
        })?;

        Ok(Feedback { text, score: None })
    }

    /// Check that the provider answers a trivial prompt
    pub async fn probe(&self) -> ProbeOutcome {
        let Some(driver) = &self.driver else {
            return ProbeOutcome::Error {
                message: MISSING_API_KEY_MESSAGE.to_string(),
            };
        };

        match driver.generate_text(PROBE_PROMPT).await {
            Ok(response) => ProbeOutcome::Ok { response },
            Err(e) => {
                tracing::warn!(model = %driver.model(), "LLM probe failed: {}", e);
                ProbeOutcome::Error { message: e.detail() }
            }
        }
    }
}

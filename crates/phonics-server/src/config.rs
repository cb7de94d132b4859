// Server configuration loaded once at startup
// Decision: One immutable struct passed into state constructors (no globals)
// Decision: Unknown enum values fall back to the default with a warning

use phonics_core::{PromptStyle, WordFilterStrategy};
use std::path::PathBuf;

use crate::auth::AuthConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_WORD_LIST_PATH: &str = "/usr/share/dict/words";
pub const DEFAULT_FRONTEND_DIST_DIR: &str = "frontend/dist";

/// Language model settings
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// GOOGLE_API_KEY; None means offline templates
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    pub style: PromptStyle,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: phonics_gemini::DEFAULT_MODEL.to_string(),
            api_url: phonics_gemini::DEFAULT_API_URL.to_string(),
            style: PromptStyle::default(),
        }
    }
}

/// Word catalog settings
#[derive(Debug, Clone)]
pub struct WordsConfig {
    pub strategy: WordFilterStrategy,
    /// Dictionary file, read only by the dictionary strategy
    pub word_list_path: PathBuf,
}

impl Default for WordsConfig {
    fn default() -> Self {
        Self {
            strategy: WordFilterStrategy::default(),
            word_list_path: PathBuf::from(DEFAULT_WORD_LIST_PATH),
        }
    }
}

/// Cross-origin policy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsOrigins {
    /// No CORS layer
    #[default]
    SameOrigin,
    /// `*`: any origin, without credentials
    Any,
    /// Listed origins, with credentials
    List(Vec<String>),
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub generation: GenerationConfig,
    pub words: WordsConfig,
    pub frontend_dist_dir: PathBuf,
    pub cors: CorsOrigins,
    pub auth: AuthConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            generation: GenerationConfig::default(),
            words: WordsConfig::default(),
            frontend_dist_dir: PathBuf::from(DEFAULT_FRONTEND_DIST_DIR),
            cors: CorsOrigins::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());
        let defaults = Self::default();

        let style = match var("STORY_PROMPT_STYLE") {
            Some(s) => PromptStyle::from_str(&s).unwrap_or_else(|| {
                tracing::warn!(value = %s, "Unknown STORY_PROMPT_STYLE, using default");
                PromptStyle::default()
            }),
            None => PromptStyle::default(),
        };

        let generation = GenerationConfig {
            api_key: var("GOOGLE_API_KEY"),
            model: var("GEMINI_MODEL").unwrap_or(defaults.generation.model),
            api_url: var("GEMINI_API_URL").unwrap_or(defaults.generation.api_url),
            style,
        };

        let strategy = match var("WORD_FILTER") {
            Some(s) => WordFilterStrategy::from_str(&s).unwrap_or_else(|| {
                tracing::warn!(value = %s, "Unknown WORD_FILTER, using default");
                WordFilterStrategy::default()
            }),
            None => WordFilterStrategy::default(),
        };

        let words = WordsConfig {
            strategy,
            word_list_path: var("WORD_LIST_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.words.word_list_path),
        };

        Self {
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            generation,
            words,
            frontend_dist_dir: var("FRONTEND_DIST_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.frontend_dist_dir),
            cors: var("CORS_ALLOWED_ORIGINS")
                .map(|s| parse_cors_origins(&s))
                .unwrap_or_default(),
            auth: AuthConfig::from_lookup(lookup),
        }
    }
}

fn parse_cors_origins(s: &str) -> CorsOrigins {
    let origins: Vec<String> = s
        .split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();

    if origins.iter().any(|o| o == "*") {
        CorsOrigins::Any
    } else if origins.is_empty() {
        CorsOrigins::SameOrigin
    } else {
        CorsOrigins::List(origins)
    }
}

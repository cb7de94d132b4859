// Word catalog HTTP routes

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use phonics_core::words::{DEFAULT_LIMIT, DEFAULT_PATTERN};
use phonics_core::WordFilter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// App state for word routes
#[derive(Clone)]
pub struct AppState {
    pub filter: Arc<dyn WordFilter>,
}

impl AppState {
    pub fn new(filter: Arc<dyn WordFilter>) -> Self {
        Self { filter }
    }
}

/// Word lookup parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WordsQuery {
    /// Phonics pattern the words must contain (case-insensitive)
    #[serde(default = "default_pattern")]
    #[param(default = "ch", example = "ig")]
    pub pattern: String,
    /// Maximum number of words returned
    #[serde(default = "default_limit")]
    #[param(default = 5, minimum = 0)]
    pub limit: usize,
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Words matching a pattern
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WordsResponse {
    #[schema(example = json!(["chat", "chin", "chip"]))]
    pub words: Vec<String>,
}

/// Create word routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/words", get(list_words))
        .with_state(state)
}

/// GET /words - Find words containing a phonics pattern
#[utoipa::path(
    get,
    path = "/words",
    params(WordsQuery),
    responses(
        (status = 200, description = "Matching words", body = WordsResponse)
    ),
    tag = "words"
)]
pub async fn list_words(
    State(state): State<AppState>,
    Query(query): Query<WordsQuery>,
) -> Json<WordsResponse> {
    let words = state.filter.find(&query.pattern, query.limit);
    tracing::debug!(
        pattern = %query.pattern,
        limit = query.limit,
        found = words.len(),
        strategy = state.filter.strategy().as_str(),
        "Word lookup"
    );

    Json(WordsResponse { words })
}

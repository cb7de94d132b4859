// Story and reading-feedback HTTP routes
//
// Handlers are thin: prompts, offline templates and the provider call all live in
// phonics_core::ContentGateway.

use axum::{extract::State, routing::get, routing::post, Json, Router};
use phonics_core::{ContentGateway, ProbeOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::common::{ApiError, ErrorResponse};

/// App state for generation routes
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ContentGateway>,
}

impl AppState {
    pub fn new(gateway: Arc<ContentGateway>) -> Self {
        Self { gateway }
    }
}

/// Request to write a story around a word
#[derive(Debug, Deserialize, ToSchema)]
pub struct StoryRequest {
    #[schema(example = "chip")]
    pub word: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoryResponse {
    pub story: String,
    /// False when the story came from the offline template
    pub generated: bool,
}

/// Request to compare a reading attempt with the original text
#[derive(Debug, Deserialize, ToSchema)]
pub struct FeedbackRequest {
    /// Text the child was asked to read
    pub original_text: String,
    /// What speech recognition heard
    pub transcript: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedbackResponse {
    pub feedback: String,
    /// Only present in offline mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
}

/// Result of the provider liveness probe
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProbeResponse {
    Ok { response: String },
    Error { message: String },
}

impl From<ProbeOutcome> for ProbeResponse {
    fn from(outcome: ProbeOutcome) -> Self {
        match outcome {
            ProbeOutcome::Ok { response } => ProbeResponse::Ok { response },
            ProbeOutcome::Error { message } => ProbeResponse::Error { message },
        }
    }
}

/// Create generation routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/test-gemini", get(test_gemini))
        .route("/story", post(create_story))
        .route("/feedback", post(create_feedback))
        .with_state(state)
}

/// GET /test-gemini - Check that the language model answers
#[utoipa::path(
    get,
    path = "/test-gemini",
    responses(
        (status = 200, description = "Probe result (errors are reported in the body)", body = ProbeResponse)
    ),
    tag = "generation"
)]
pub async fn test_gemini(State(state): State<AppState>) -> Json<ProbeResponse> {
    Json(state.gateway.probe().await.into())
}

/// POST /story - Write a short story for a word
#[utoipa::path(
    post,
    path = "/story",
    request_body = StoryRequest,
    responses(
        (status = 200, description = "Story text", body = StoryResponse),
        (status = 500, description = "Language model failed", body = ErrorResponse)
    ),
    tag = "generation"
)]
pub async fn create_story(
    State(state): State<AppState>,
    Json(req): Json<StoryRequest>,
) -> Result<Json<StoryResponse>, ApiError> {
    let story = state.gateway.generate_story(&req.word).await?;

    Ok(Json(StoryResponse {
        story: story.text,
        generated: story.generated,
    }))
}

/// POST /feedback - Give encouraging feedback on a reading attempt
#[utoipa::path(
    post,
    path = "/feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback text", body = FeedbackResponse),
        (status = 500, description = "Language model failed", body = ErrorResponse)
    ),
    tag = "generation"
)]
pub async fn create_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let feedback = state
        .gateway
        .generate_feedback(&req.original_text, &req.transcript)
        .await?;

    Ok(Json(FeedbackResponse {
        feedback: feedback.text,
        score: feedback.score,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use phonics_core::{GenerationError, LlmDriver, PromptStyle};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct FailingDriver;

    #[async_trait]
    impl LlmDriver for FailingDriver {
        async fn generate_text(&self, _prompt: &str) -> phonics_core::Result<String> {
            Err(GenerationError::llm("quota exceeded"))
        }

        fn model(&self) -> &str {
            "failing"
        }
    }

    async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn offline_app() -> Router {
        routes(AppState::new(Arc::new(ContentGateway::offline(
            PromptStyle::Toddler,
        ))))
    }

    fn failing_app() -> Router {
        routes(AppState::new(Arc::new(ContentGateway::new(
            Arc::new(FailingDriver),
            PromptStyle::Toddler,
        ))))
    }

    #[tokio::test]
    async fn test_offline_story() {
        let (status, body) = call(offline_app(), "POST", "/story", Some(json!({"word": "cat"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "story": "The cat is here. It is a nice cat. Look at the cat.",
                "generated": false
            })
        );
    }

    #[tokio::test]
    async fn test_offline_feedback_has_score() {
        let (status, body) = call(
            offline_app(),
            "POST",
            "/feedback",
            Some(json!({"original_text": "The cat sat.", "transcript": "the cat sat"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], "N/A");
        assert!(body["feedback"].as_str().unwrap().len() > 0);
    }

    #[tokio::test]
    async fn test_offline_probe_reports_missing_key() {
        let (status, body) = call(offline_app(), "GET", "/test-gemini", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "error", "message": "GOOGLE_API_KEY not set"}));
    }

    #[tokio::test]
    async fn test_provider_failure_is_500_with_detail() {
        let (status, body) = call(failing_app(), "POST", "/story", Some(json!({"word": "pig"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "quota exceeded");
    }

    #[tokio::test]
    async fn test_probe_failure_stays_200() {
        let (status, body) = call(failing_app(), "GET", "/test-gemini", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "quota exceeded");
    }

    #[tokio::test]
    async fn test_toddler_feedback_on_empty_text_fails() {
        let (status, body) = call(
            failing_app(),
            "POST",
            "/feedback",
            Some(json!({"original_text": "  ", "transcript": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].is_string());
    }
}

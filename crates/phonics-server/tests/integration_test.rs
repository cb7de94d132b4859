// Integration tests for the Phonics Explorer router
// Run with: cargo test -p phonics-server --test integration_test
// Drives the full router in-process; no API keys or network needed

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use phonics_core::{AllowlistFilter, ContentGateway, PromptStyle};
use phonics_server::auth::{AuthConfig, AuthState};
use phonics_server::config::CorsOrigins;
use phonics_server::frontend::{FrontendState, NOT_BUILT_MESSAGE};
use phonics_server::{router, AppState};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

fn app(dist_dir: &Path) -> Router {
    let state = AppState {
        words: Arc::new(AllowlistFilter::new()),
        gateway: Arc::new(ContentGateway::offline(PromptStyle::Toddler)),
        auth: AuthState::new(AuthConfig::default(), reqwest::Client::new()),
        frontend: FrontendState::new(dist_dir),
    };
    router(state, &CorsOrigins::SameOrigin)
}

fn built_frontend() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>phonics</html>").unwrap();
    std::fs::write(dir.path().join("unauthorized.html"), "<html>sign in</html>").unwrap();
    dir
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, bytes) = send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_words_shortest_first() {
    let dist = built_frontend();
    let (status, body) = get_json(app(dist.path()), "/words?pattern=ch&limit=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"words": ["chat", "chin", "chip"]}));
}

#[tokio::test]
async fn test_words_repeatable() {
    let dist = built_frontend();
    let (_, first) = get_json(app(dist.path()), "/words?pattern=AT&limit=10").await;
    let (_, second) = get_json(app(dist.path()), "/words?pattern=AT&limit=10").await;

    assert_eq!(first, second);
    let words = first["words"].as_array().unwrap();
    assert!(!words.is_empty());
    assert!(words.len() <= 10);
    assert!(words.iter().all(|w| w.as_str().unwrap().contains("at")));
}

#[tokio::test]
async fn test_offline_story_and_feedback() {
    let dist = built_frontend();

    let (status, story) = post_json(app(dist.path()), "/story", json!({"word": "cat"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        story["story"],
        "The cat is here. It is a nice cat. Look at the cat."
    );
    assert_eq!(story["generated"], false);

    let (status, feedback) = post_json(
        app(dist.path()),
        "/feedback",
        json!({"original_text": "The cat sat.", "transcript": "the cat sat"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feedback["score"], "N/A");
}

#[tokio::test]
async fn test_gemini_probe_without_key() {
    let dist = built_frontend();
    let (status, body) = get_json(app(dist.path()), "/test-gemini").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "GOOGLE_API_KEY not set");
}

#[tokio::test]
async fn test_reserved_prefix_is_404_built_or_not() {
    let built = built_frontend();
    let (status, body) = get_json(app(built.path()), "/api/anything").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].is_string());

    let empty = tempfile::tempdir().unwrap();
    let (status, _) = get_json(app(empty.path()), "/api/anything").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_spa_routes_serve_index() {
    let dist = built_frontend();
    let (status, body) = send(
        app(dist.path()),
        Request::builder()
            .uri("/lessons/ch")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<html>phonics</html>");

    let (status, body) = send(
        app(dist.path()),
        Request::builder()
            .uri("/unauthorized.html")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<html>sign in</html>");
}

#[tokio::test]
async fn test_frontend_not_built() {
    let empty = tempfile::tempdir().unwrap();
    let (status, body) = get_json(app(empty.path()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], NOT_BUILT_MESSAGE);
}

#[tokio::test]
async fn test_explicit_routes_win_over_frontend() {
    let dist = built_frontend();

    let (status, body) = get_json(app(dist.path()), "/auth/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"authenticated": false}));

    let (status, spec) = get_json(app(dist.path()), "/api-doc/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(spec["paths"]["/words"].is_object());
}

#[tokio::test]
async fn test_unknown_api_method_is_not_the_spa() {
    let dist = built_frontend();
    let (status, _) = send(
        app(dist.path()),
        Request::builder()
            .method("DELETE")
            .uri("/lessons/ch")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

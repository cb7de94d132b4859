// Static frontend serving
// Decision: Registered as the router fallback so explicit routes always win
// Decision: Unknown paths get index.html so client-side routing works on reload

use axum::{
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::api::ApiError;

/// Path prefix reserved for API calls; never answered with the SPA
pub const RESERVED_PREFIX: &str = "api";

/// Body returned when the bundle has not been built yet
pub const NOT_BUILT_MESSAGE: &str =
    "Frontend not built. Run 'npm run build' in frontend/ directory.";

#[derive(Clone)]
pub struct FrontendState {
    dist_dir: Arc<PathBuf>,
}

impl FrontendState {
    pub fn new(dist_dir: impl Into<PathBuf>) -> Self {
        Self {
            dist_dir: Arc::new(dist_dir.into()),
        }
    }
}

/// Router with only a fallback; merge it last
pub fn routes(state: FrontendState) -> Router {
    Router::new().fallback(serve_frontend).with_state(state)
}

async fn serve_frontend(State(state): State<FrontendState>, req: Request) -> Response {
    if !matches!(*req.method(), Method::GET | Method::HEAD) || is_reserved(req.uri().path()) {
        return ApiError::NotFound("Not Found".to_string()).into_response();
    }

    if let Some(file) = resolve_file(&state.dist_dir, req.uri().path()) {
        return serve_file(file, req).await;
    }

    let index = state.dist_dir.join("index.html");
    if index.is_file() {
        return serve_file(index, req).await;
    }

    Json(json!({ "message": NOT_BUILT_MESSAGE })).into_response()
}

async fn serve_file(path: PathBuf, req: Request) -> Response {
    match ServeFile::new(path).oneshot(req).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

fn is_reserved(path: &str) -> bool {
    path.trim_start_matches('/').starts_with(RESERVED_PREFIX)
}

/// Map a request path to a file under `dist_dir`.
/// Anything but plain path segments (`..`, roots, prefixes) yields None.
fn resolve_file(dist_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }

    let mut full = dist_dir.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => full.push(part),
            _ => return None,
        }
    }

    full.is_file().then_some(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use std::fs;

    fn built_dist() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<html>app</html>").unwrap();
        fs::write(dir.path().join("unauthorized.html"), "<html>nope</html>").unwrap();
        fs::create_dir(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets/app.js"), "console.log(1)").unwrap();
        dir
    }

    async fn get(dist: &Path, method: Method, uri: &str) -> (StatusCode, Option<String>, String) {
        let app = routes(FrontendState::new(dist));
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[test]
    fn test_is_reserved() {
        assert!(is_reserved("/api"));
        assert!(is_reserved("/api/anything"));
        assert!(is_reserved("/apiary"));
        assert!(is_reserved("/api-v2/words"));
        assert!(is_reserved("/apis"));
        assert!(!is_reserved("/"));
        assert!(!is_reserved("/assets/api"));
    }

    #[test]
    fn test_resolve_file_rejects_traversal() {
        let dist = built_dist();
        assert!(resolve_file(dist.path(), "/assets/app.js").is_some());
        assert!(resolve_file(dist.path(), "/../etc/passwd").is_none());
        assert!(resolve_file(dist.path(), "/assets/../index.html").is_none());
        assert!(resolve_file(dist.path(), "/assets").is_none());
        assert!(resolve_file(dist.path(), "/").is_none());
    }

    #[tokio::test]
    async fn test_serves_existing_file_with_content_type() {
        let dist = built_dist();
        let (status, content_type, body) = get(dist.path(), Method::GET, "/assets/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().contains("javascript"));
        assert_eq!(body, "console.log(1)");
    }

    #[tokio::test]
    async fn test_unknown_path_serves_index() {
        let dist = built_dist();
        let (status, content_type, body) = get(dist.path(), Method::GET, "/reader/lesson/3").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert_eq!(body, "<html>app</html>");

        let (status, _, body) = get(dist.path(), Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<html>app</html>");
    }

    #[tokio::test]
    async fn test_traversal_falls_back_to_index() {
        let dist = built_dist();
        let (status, _, body) = get(dist.path(), Method::GET, "/assets/../../secret").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<html>app</html>");
    }

    #[tokio::test]
    async fn test_reserved_prefix_is_404_even_when_built() {
        let dist = built_dist();
        let (status, _, body) = get(dist.path(), Method::GET, "/api/anything").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("detail"));

        for uri in ["/apiary", "/api-v2/words", "/apis"] {
            let (status, _, _) = get(dist.path(), Method::GET, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_not_built_message() {
        let dist = tempfile::tempdir().unwrap();
        let (status, _, body) = get(dist.path(), Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["message"], NOT_BUILT_MESSAGE);

        let (status, _, _) = get(dist.path(), Method::GET, "/api/words").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_other_methods_are_404() {
        let dist = built_dist();
        let (status, _, _) = get(dist.path(), Method::POST, "/index.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

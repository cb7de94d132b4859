// Authentication HTTP routes
// Decision: Routes live under /auth/* outside the API, since the reverse proxy
// calls /auth/check directly
// Decision: The OAuth state is checked against a signed cookie before the code exchange

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::Redirect,
    routing::get,
    Json, Router,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    config::{GOOGLE_CALLBACK_PATH, UNAUTHORIZED_PAGE},
    middleware::AuthState,
    oauth::{generate_oauth_state, GoogleOAuthService},
    session::SessionUser,
};
use crate::api::ApiError;

/// OAuth callback query parameters
#[derive(Debug, Default, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user denied access
    pub error: Option<String>,
}

/// Current session status
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

/// Create auth routes
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/auth/google", get(google_login))
        .route(GOOGLE_CALLBACK_PATH, get(google_callback))
        .route("/auth/logout", get(logout))
        .route("/auth/me", get(get_current_user))
        .route("/auth/check", get(check))
        .with_state(state)
}

/// Callback URL sent to Google.
///
/// A configured AUTH_GOOGLE_REDIRECT_URI wins. Otherwise the URL is built from the
/// Host header (or the HTTP/2 `:authority`) and X-Forwarded-Proto, with https
/// forced for production hosts.
pub fn callback_url(
    state: &AuthState,
    google: &GoogleOAuthService,
    headers: &HeaderMap,
    uri: &Uri,
) -> String {
    if let Some(configured) = google.configured_redirect_uri() {
        return configured.to_string();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");

    let forwarded_proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");

    let scheme = if state.config.requires_https(host) {
        "https"
    } else {
        forwarded_proto
    };

    format!("{}://{}{}", scheme, host, GOOGLE_CALLBACK_PATH)
}

/// GET /auth/google - Start the Google login
pub async fn google_login(
    State(state): State<AuthState>,
    headers: HeaderMap,
    uri: Uri,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    let google = state.google.as_ref().ok_or_else(|| {
        tracing::warn!("Login attempted without Google OAuth configuration");
        ApiError::Configuration(
            "Google OAuth is not configured (set GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET)"
                .to_string(),
        )
    })?;

    // Generate a random state for CSRF protection
    let oauth_state = generate_oauth_state();
    let redirect_uri = callback_url(&state, google, &headers, &uri);

    let auth_url = google
        .authorization_url(&redirect_uri, &oauth_state)
        .map_err(|e| ApiError::Configuration(format!("{:#}", e)))?;

    let jar = state
        .sessions
        .set_pending_state(jar, &oauth_state)
        .map_err(|e| ApiError::Internal(format!("{:#}", e)))?;

    tracing::debug!(redirect_uri = %redirect_uri, "Redirecting to Google");
    Ok((jar, Redirect::to(&auth_url)))
}

/// GET /auth/google/callback - Finish the Google login
pub async fn google_callback(
    State(state): State<AuthState>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<OAuthCallbackQuery>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let (jar, pending_state) = state.sessions.take_pending_state(jar);

    let pending_state = pending_state.as_deref();
    let user = match complete_login(&state, &headers, &uri, &query, pending_state).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("OAuth login failed: {:#}", e);
            return (state.sessions.clear(jar), Redirect::to(UNAUTHORIZED_PAGE));
        }
    };

    match state.sessions.set(jar.clone(), &user) {
        Ok(jar) => {
            tracing::info!(email = %user.email, "User signed in");
            (jar, Redirect::to("/"))
        }
        Err(e) => {
            tracing::error!("Failed to store session: {:#}", e);
            (jar, Redirect::to(UNAUTHORIZED_PAGE))
        }
    }
}

async fn complete_login(
    state: &AuthState,
    headers: &HeaderMap,
    uri: &Uri,
    query: &OAuthCallbackQuery,
    pending_state: Option<&str>,
) -> anyhow::Result<SessionUser> {
    let google = state
        .google
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Google OAuth not configured"))?;

    if let Some(error) = &query.error {
        anyhow::bail!("Provider returned error: {}", error);
    }

    let code = query
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Missing authorization code"))?;

    match (pending_state, query.state.as_deref()) {
        (Some(expected), Some(actual)) if expected == actual => {}
        (None, _) => anyhow::bail!("No login in progress"),
        _ => anyhow::bail!("OAuth state mismatch"),
    }

    let redirect_uri = callback_url(state, google, headers, uri);
    google.exchange_code(code, &redirect_uri).await
}

/// GET /auth/logout - End the session
pub async fn logout(State(state): State<AuthState>, jar: CookieJar) -> (CookieJar, Redirect) {
    (state.sessions.clear(jar), Redirect::to("/"))
}

/// Get the current session
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Session status", body = MeResponse)
    ),
    tag = "auth"
)]
pub async fn get_current_user(user: Option<SessionUser>) -> Json<MeResponse> {
    Json(MeResponse {
        authenticated: user.is_some(),
        user,
    })
}

/// Gate used by the reverse proxy
#[utoipa::path(
    get,
    path = "/auth/check",
    responses(
        (status = 200, description = "Session is valid"),
        (status = 303, description = "Redirect to the unauthorized page")
    ),
    tag = "auth"
)]
pub async fn check(_user: SessionUser) -> StatusCode {
    StatusCode::OK
}

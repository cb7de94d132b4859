// Auth state and extractors
// Decision: A missing or invalid session redirects the browser to the unauthorized
// page instead of returning a JSON 401, since the reverse proxy forwards it as-is

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::Redirect,
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

use super::{
    config::{AuthConfig, UNAUTHORIZED_PAGE},
    oauth::GoogleOAuthService,
    session::{JwtCookieSessionStore, SessionStore, SessionUser},
};

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AuthConfig>,
    pub sessions: Arc<dyn SessionStore>,
    /// None when GOOGLE_CLIENT_ID or GOOGLE_CLIENT_SECRET is missing
    pub google: Option<Arc<GoogleOAuthService>>,
}

impl AuthState {
    pub fn new(config: AuthConfig, client: reqwest::Client) -> Self {
        let sessions = Arc::new(JwtCookieSessionStore::new(config.session.clone()));
        let google = config
            .google
            .clone()
            .map(|google| Arc::new(GoogleOAuthService::new(google, client)));

        Self {
            config: Arc::new(config),
            sessions,
            google,
        }
    }
}

/// Extractor for the signed-in user.
/// Rejects with a redirect to the unauthorized page.
#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        auth_state
            .sessions
            .get(&jar)
            .ok_or_else(|| Redirect::to(UNAUTHORIZED_PAGE))
    }
}

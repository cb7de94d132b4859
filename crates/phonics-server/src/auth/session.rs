// Cookie-backed sessions
// Decision: Store the identity itself in an HS256-signed token (no server-side table)
// Decision: The pending OAuth state is a second short-lived signed cookie

use anyhow::{Context, Result};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::config::SessionConfig;

/// Cookie holding the signed session token
pub const SESSION_COOKIE: &str = "session";

/// Cookie holding the signed OAuth state while the provider redirect is pending
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// How long a login may stay pending at the provider
const OAUTH_STATE_LIFETIME_SECS: i64 = 10 * 60;

const SESSION_TOKEN_TYPE: &str = "session";
const OAUTH_STATE_TOKEN_TYPE: &str = "oauth_state";

/// Identity stored in the session after a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    /// Provider subject identifier
    pub id: String,
    pub email: String,
    /// Name as reported by the provider (may be empty)
    #[serde(default)]
    pub name: String,
    /// Name the frontend greets the user with; never empty
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

/// Claims of a session token
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(flatten)]
    user: SessionUser,
    token_type: String,
    exp: i64,
    iat: i64,
}

/// Claims of a pending OAuth state token
#[derive(Debug, Serialize, Deserialize)]
struct OAuthStateClaims {
    state: String,
    token_type: String,
    exp: i64,
    iat: i64,
}

/// Session storage seen by the auth routes.
///
/// All methods work on the request's cookie jar and return the jar to send back.
pub trait SessionStore: Send + Sync {
    /// Identity of the current session, if any
    fn get(&self, jar: &CookieJar) -> Option<SessionUser>;

    /// Start a session for `user`
    fn set(&self, jar: CookieJar, user: &SessionUser) -> Result<CookieJar>;

    /// End the current session
    fn clear(&self, jar: CookieJar) -> CookieJar;

    /// Remember the state parameter sent to the identity provider
    fn set_pending_state(&self, jar: CookieJar, state: &str) -> Result<CookieJar>;

    /// Consume the remembered state parameter
    fn take_pending_state(&self, jar: CookieJar) -> (CookieJar, Option<String>);
}

/// Session store that keeps the identity in a signed JWT cookie
#[derive(Clone)]
pub struct JwtCookieSessionStore {
    config: SessionConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtCookieSessionStore {
    pub fn new(config: SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Encode a session token for a user
    pub fn encode_session(&self, user: &SessionUser) -> Result<String> {
        let now = Utc::now();
        let exp = Duration::from_std(self.config.max_age)
            .ok()
            .and_then(|max_age| now.checked_add_signed(max_age))
            .context("Session lifetime out of range")?;

        let claims = SessionClaims {
            user: user.clone(),
            token_type: SESSION_TOKEN_TYPE.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .context("Failed to encode session token")
    }

    /// Validate and decode a session token
    pub fn decode_session(&self, token: &str) -> Result<SessionUser> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())
            .context("Invalid session token")?;

        if token_data.claims.token_type != SESSION_TOKEN_TYPE {
            anyhow::bail!("Invalid token type");
        }

        Ok(token_data.claims.user)
    }

    fn encode_state(&self, state: &str) -> Result<String> {
        let now = Utc::now();
        let claims = OAuthStateClaims {
            state: state.to_string(),
            token_type: OAUTH_STATE_TOKEN_TYPE.to_string(),
            exp: (now + Duration::seconds(OAUTH_STATE_LIFETIME_SECS)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .context("Failed to encode OAuth state")
    }

    fn decode_state(&self, token: &str) -> Result<String> {
        let token_data =
            decode::<OAuthStateClaims>(token, &self.decoding_key, &Validation::default())
                .context("Invalid OAuth state token")?;

        if token_data.claims.token_type != OAUTH_STATE_TOKEN_TYPE {
            anyhow::bail!("Invalid token type");
        }

        Ok(token_data.claims.state)
    }

    /// Session lifetime in seconds
    pub fn max_age_secs(&self) -> i64 {
        i64::try_from(self.config.max_age.as_secs()).unwrap_or(i64::MAX)
    }
}

impl SessionStore for JwtCookieSessionStore {
    fn get(&self, jar: &CookieJar) -> Option<SessionUser> {
        let cookie = jar.get(SESSION_COOKIE)?;
        match self.decode_session(cookie.value()) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!("Ignoring session cookie: {:#}", e);
                None
            }
        }
    }

    fn set(&self, jar: CookieJar, user: &SessionUser) -> Result<CookieJar> {
        let token = self.encode_session(user)?;

        let cookie = Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .secure(self.config.secure_cookies)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(self.max_age_secs()))
            .build();

        Ok(jar.add(cookie))
    }

    fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }

    fn set_pending_state(&self, jar: CookieJar, state: &str) -> Result<CookieJar> {
        let token = self.encode_state(state)?;

        // Lax so the cookie survives the top-level redirect back from the provider
        let cookie = Cookie::build((OAUTH_STATE_COOKIE, token))
            .path("/auth")
            .http_only(true)
            .secure(self.config.secure_cookies)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(OAUTH_STATE_LIFETIME_SECS))
            .build();

        Ok(jar.add(cookie))
    }

    fn take_pending_state(&self, jar: CookieJar) -> (CookieJar, Option<String>) {
        let state = jar
            .get(OAUTH_STATE_COOKIE)
            .and_then(|c| match self.decode_state(c.value()) {
                Ok(state) => Some(state),
                Err(e) => {
                    tracing::debug!("Ignoring OAuth state cookie: {:#}", e);
                    None
                }
            });

        let jar = jar.remove(Cookie::build(OAUTH_STATE_COOKIE).path("/auth"));
        (jar, state)
    }
}

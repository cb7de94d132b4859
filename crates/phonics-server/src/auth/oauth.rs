// OAuth service for Google authentication
// Decision: Manual OAuth2 implementation over reqwest (authorization-code flow only)
// Decision: No refresh tokens are requested; the session cookie carries the identity

use anyhow::{Context, Result};
use rand::Rng;
use serde::Deserialize;
use url::Url;

use super::config::GoogleOAuthConfig;
use super::session::SessionUser;

/// Generate a random state string for OAuth (32 hex characters)
pub fn generate_oauth_state() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 16] = rng.gen();
    hex::encode(bytes)
}

/// Google OAuth service
pub struct GoogleOAuthService {
    client: reqwest::Client,
    config: GoogleOAuthConfig,
}

impl GoogleOAuthService {
    pub fn new(config: GoogleOAuthConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    /// Fixed callback URL, if one is configured
    pub fn configured_redirect_uri(&self) -> Option<&str> {
        self.config.redirect_uri.as_deref()
    }

    /// Generate authorization URL for OAuth flow
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String> {
        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("state", state),
            ],
        )
        .context("Invalid Google authorization URL")?;

        Ok(url.into())
    }

    /// Exchange authorization code for the signed-in user
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<SessionUser> {
        // Exchange code for token
        let token_response: GoogleTokenResponse = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .context("Failed to exchange code")?
            .error_for_status()
            .context("Token endpoint rejected the code")?
            .json()
            .await
            .context("Failed to parse token response")?;

        // Fetch user info
        let user_info: GoogleUserInfo = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(&token_response.access_token)
            .send()
            .await
            .context("Failed to fetch user info")?
            .error_for_status()
            .context("Userinfo endpoint rejected the token")?
            .json()
            .await
            .context("Failed to parse user info")?;

        let user = user_info.into_session_user();
        self.check_domain(&user.email)?;

        Ok(user)
    }

    /// Reject emails outside AUTH_GOOGLE_ALLOWED_DOMAINS
    fn check_domain(&self, email: &str) -> Result<()> {
        let Some(allowed) = &self.config.allowed_domains else {
            return Ok(());
        };

        let domain = email
            .rsplit_once('@')
            .map(|(_, d)| d.to_lowercase())
            .unwrap_or_default();

        if allowed.iter().any(|d| *d == domain) {
            Ok(())
        } else {
            anyhow::bail!("Email domain '{}' is not allowed", domain)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    #[serde(default)]
    email: String,
    name: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    picture: Option<String>,
    email_verified: Option<bool>,
}

impl GoogleUserInfo {
    fn into_session_user(self) -> SessionUser {
        let display_name = display_name(
            self.name.as_deref(),
            self.given_name.as_deref(),
            self.family_name.as_deref(),
            &self.email,
        );

        SessionUser {
            id: self.sub,
            email: self.email,
            name: self.name.unwrap_or_default(),
            display_name,
            given_name: self.given_name,
            family_name: self.family_name,
            picture: self.picture,
            email_verified: self.email_verified.unwrap_or(false),
        }
    }
}

/// Name shown to the user: full name, else given + family name, else email local part
pub fn display_name(
    name: Option<&str>,
    given_name: Option<&str>,
    family_name: Option<&str>,
    email: &str,
) -> String {
    if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }

    let joined = [given_name, family_name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if !joined.is_empty() {
        return joined;
    }

    let local = email.split('@').next().unwrap_or_default();
    if local.is_empty() {
        "Reader".to_string()
    } else {
        local.to_string()
    }
}

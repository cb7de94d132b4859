// Authentication configuration loaded from environment variables.
// Decision: Google is the only identity provider; auth is optional and only
// needed when a reverse proxy gates the app via /auth/check
// Decision: Fall back to an insecure session secret so local development works

use std::time::Duration;

/// Development-only signing key used when SESSION_SECRET_KEY is unset
pub const INSECURE_DEV_SECRET: &str = "insecure-dev-secret-change-me";

/// Page the browser lands on when authentication fails or is missing
pub const UNAUTHORIZED_PAGE: &str = "/unauthorized.html";

/// Longest accepted SESSION_MAX_AGE (one year)
pub const MAX_SESSION_MAX_AGE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Callback path registered with the provider
pub const GOOGLE_CALLBACK_PATH: &str = "/auth/google/callback";

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Google OAuth configuration
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Fixed callback URL; derived from the request when unset
    pub redirect_uri: Option<String>,
    /// Optional: restrict to specific email domains
    pub allowed_domains: Option<Vec<String>>,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl GoogleOAuthConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: None,
            allowed_domains: None,
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }
}

/// Session cookie configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Secret key for signing session tokens
    pub secret: String,
    /// Session lifetime
    pub max_age: Duration,
    /// Set the Secure attribute on cookies
    pub secure_cookies: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: INSECURE_DEV_SECRET.to_string(),
            max_age: Duration::from_secs(14 * 24 * 60 * 60), // 14 days
            secure_cookies: false,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Session cookie configuration
    pub session: SessionConfig,
    /// Google OAuth configuration (None when client id or secret is missing)
    pub google: Option<GoogleOAuthConfig>,
    /// Hostnames that are always served over TLS by the fronting proxy
    pub production_hosts: Vec<String>,
    /// ENVIRONMENT=production
    pub production: bool,
}

impl AuthConfig {
    /// Load configuration from any key/value source
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|s| !s.is_empty());

        let production = var("ENVIRONMENT")
            .map(|s| s.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let secret = var("SESSION_SECRET_KEY").unwrap_or_else(|| {
            tracing::warn!("SESSION_SECRET_KEY not set, using insecure default");
            INSECURE_DEV_SECRET.to_string()
        });

        let max_age = match var("SESSION_MAX_AGE").map(|s| s.parse::<u64>()) {
            Some(Ok(secs)) if Duration::from_secs(secs) <= MAX_SESSION_MAX_AGE => {
                Duration::from_secs(secs)
            }
            Some(Ok(secs)) => {
                tracing::warn!(
                    "SESSION_MAX_AGE={} exceeds {}s, clamping",
                    secs,
                    MAX_SESSION_MAX_AGE.as_secs()
                );
                MAX_SESSION_MAX_AGE
            }
            Some(Err(_)) => {
                tracing::warn!("SESSION_MAX_AGE is not a number of seconds, using default");
                SessionConfig::default().max_age
            }
            None => SessionConfig::default().max_age,
        };

        let session = SessionConfig {
            secret,
            max_age,
            secure_cookies: production,
        };

        // Google OAuth configuration
        let google = match (var("GOOGLE_CLIENT_ID"), var("GOOGLE_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => {
                let mut google = GoogleOAuthConfig::new(client_id, client_secret);
                google.redirect_uri = var("AUTH_GOOGLE_REDIRECT_URI");
                google.allowed_domains = var("AUTH_GOOGLE_ALLOWED_DOMAINS")
                    .map(|s| split_list(&s))
                    .filter(|domains| !domains.is_empty());
                Some(google)
            }
            _ => None,
        };

        let production_hosts = var("PRODUCTION_HOSTS")
            .map(|s| split_list(&s))
            .unwrap_or_default();

        Self {
            session,
            google,
            production_hosts,
            production,
        }
    }

    /// Check if the OAuth handshake can be started
    pub fn oauth_enabled(&self) -> bool {
        self.google.is_some()
    }

    /// Whether redirects built for `host` must use https
    pub fn requires_https(&self, host: &str) -> bool {
        if self.production {
            return true;
        }
        let hostname = strip_port(host);
        self.production_hosts
            .iter()
            .any(|h| h.eq_ignore_ascii_case(hostname))
    }
}

/// Split a comma separated list, dropping blanks
fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Host header value without its port ("[::1]:8000" keeps the brackets)
fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port)) if !name.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => {
            if name.starts_with('[') || !name.contains(':') {
                name
            } else {
                host
            }
        }
        _ => host,
    }
}

// Authentication module
// Handles Google OAuth login and signed cookie sessions

pub mod config;
pub mod middleware;
pub mod oauth;
pub mod routes;
pub mod session;

pub use config::AuthConfig;
pub use middleware::AuthState;
pub use routes::routes;
pub use session::{JwtCookieSessionStore, SessionStore, SessionUser};

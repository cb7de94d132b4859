// Phonics Explorer server library
// Decision: Shared library for binaries (HTTP server, OpenAPI export) and integration tests

// API routes and types
pub mod api;

// Google sign-in and cookie sessions
pub mod auth;

pub mod app;
pub mod config;
pub mod frontend;

// OpenAPI spec generation
pub mod openapi;

pub use app::{build_app, router, AppState};
pub use config::AppConfig;

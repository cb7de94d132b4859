// HTTP API routes
//
// Each submodule handles one resource with its own AppState.

pub mod common;
pub mod generation;
pub mod words;

// Re-export common types
pub use common::{ApiError, ErrorResponse};

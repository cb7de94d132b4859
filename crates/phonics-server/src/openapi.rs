// OpenAPI specification generation
//
// Served by the server at /api-doc/openapi.json and printed by the
// export-openapi binary.

use crate::api;
use crate::api::ErrorResponse;
use crate::auth::{routes::MeResponse, SessionUser};
use utoipa::OpenApi;

/// OpenAPI documentation for the Phonics Explorer API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::words::list_words,
        api::generation::test_gemini,
        api::generation::create_story,
        api::generation::create_feedback,
        crate::auth::routes::get_current_user,
        crate::auth::routes::check,
    ),
    components(
        schemas(
            ErrorResponse,
            api::words::WordsResponse,
            api::generation::StoryRequest,
            api::generation::StoryResponse,
            api::generation::FeedbackRequest,
            api::generation::FeedbackResponse,
            api::generation::ProbeResponse,
            MeResponse,
            SessionUser,
        )
    ),
    tags(
        (name = "words", description = "Phonics word lookup"),
        (name = "generation", description = "Stories and reading feedback from the language model"),
        (name = "auth", description = "Google sign-in and session checks")
    ),
    info(
        title = "Phonics Explorer API",
        description = "Backend for a children's phonics reading app",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> serde_json::Result<String> {
        Self::openapi().to_pretty_json()
    }
}

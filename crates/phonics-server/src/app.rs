// Application assembly
// Decision: Every module builds its own Router with its own state; they are merged here
// Decision: The frontend fallback is merged last so it never shadows a route

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use phonics_core::{
    AllowlistFilter, ContentGateway, DictionaryFilter, WordFilter, WordFilterStrategy,
};
use phonics_gemini::GeminiLlmDriver;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::auth::{self, AuthState};
use crate::config::{AppConfig, CorsOrigins, GenerationConfig, WordsConfig};
use crate::frontend::{self, FrontendState};
use crate::openapi::ApiDoc;

/// Shared services behind the routers
#[derive(Clone)]
pub struct AppState {
    pub words: Arc<dyn WordFilter>,
    pub gateway: Arc<ContentGateway>,
    pub auth: AuthState,
    pub frontend: FrontendState,
}

impl AppState {
    /// Build all services from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::new();

        Ok(Self {
            words: build_word_filter(&config.words)?,
            gateway: Arc::new(build_gateway(&config.generation, client.clone())),
            auth: AuthState::new(config.auth.clone(), client),
            frontend: FrontendState::new(config.frontend_dist_dir.clone()),
        })
    }
}

/// Load the word catalog for the configured strategy
pub fn build_word_filter(config: &WordsConfig) -> Result<Arc<dyn WordFilter>> {
    let filter: Arc<dyn WordFilter> = match config.strategy {
        WordFilterStrategy::Allowlist => Arc::new(AllowlistFilter::new()),
        WordFilterStrategy::Dictionary => Arc::new(
            DictionaryFilter::from_file(&config.word_list_path)
                .context("Failed to load dictionary word filter")?,
        ),
    };

    tracing::info!(
        strategy = filter.strategy().as_str(),
        words = filter.catalog_size(),
        "Word filter ready"
    );
    Ok(filter)
}

/// Gemini-backed gateway, or offline templates without an API key
pub fn build_gateway(config: &GenerationConfig, client: reqwest::Client) -> ContentGateway {
    match &config.api_key {
        Some(api_key) => {
            let driver = GeminiLlmDriver::new(api_key.clone())
                .with_model(config.model.clone())
                .with_base_url(config.api_url.clone())
                .with_client(client);
            tracing::info!(
                model = %config.model,
                style = config.style.as_str(),
                "Content generation live"
            );
            ContentGateway::new(Arc::new(driver), config.style)
        }
        None => {
            tracing::warn!("GOOGLE_API_KEY not set, serving offline stories and feedback");
            ContentGateway::offline(config.style)
        }
    }
}

/// Build the complete router
pub fn router(state: AppState, cors: &CorsOrigins) -> Router {
    let app = Router::new()
        .merge(api::words::routes(api::words::AppState::new(state.words)))
        .merge(api::generation::routes(api::generation::AppState::new(
            state.gateway,
        )))
        .merge(auth::routes(state.auth))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(frontend::routes(state.frontend));

    let app = match cors_layer(cors) {
        Some(layer) => app.layer(layer),
        None => app,
    };

    app.layer(TraceLayer::new_for_http())
}

/// Load services and build the router from configuration
pub fn build_app(config: &AppConfig) -> Result<Router> {
    let state = AppState::from_config(config)?;
    Ok(router(state, &config.cors))
}

fn cors_layer(cors: &CorsOrigins) -> Option<CorsLayer> {
    match cors {
        CorsOrigins::SameOrigin => {
            tracing::info!("CORS not configured (same-origin requests only)");
            None
        }
        CorsOrigins::Any => {
            tracing::info!("CORS allows any origin (no credentials)");
            Some(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        }
        CorsOrigins::List(origins) => {
            let origins: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            tracing::info!(origins = ?origins, "CORS origins configured");
            Some(
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
                    .allow_credentials(true),
            )
        }
    }
}

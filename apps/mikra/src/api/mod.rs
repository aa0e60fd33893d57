//! # Mikra HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Store statistics and editions
//! - `GET /verse/{edition}/{book}/{chapter}/{verse}` - One stored verse
//! - `GET /chapter/{edition}/{book}/{chapter}` - Every stored verse of a chapter
//! - `GET /strongs/{code}?limit=N` - Occurrences of a Strong's number
//! - `POST /gematria` - Standard and ordinal values of a word
//! - `POST /lemma` - Strong's codes extracted from a raw lemma
//! - `POST /transform` - Transform a posted verse tree without storing it
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `MIKRA_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `MIKRA_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `MIKRA_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use auth::get_api_key_from_env;
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
// Re-export handlers and types for integration tests (via `mikra::api::*`)
pub use handlers::{
    chapter_handler, gematria_handler, health_handler, lemma_handler, status_handler,
    strongs_handler, transform_handler, verse_handler,
};
pub use types::{
    ChapterResponse, ChapterVerse, DEFAULT_OCCURRENCE_LIMIT, GematriaRequest, GematriaResponse,
    HealthResponse, LemmaRequest, LemmaResponse, MAX_LEMMA_LENGTH, MAX_WORD_LENGTH,
    StatusResponse, StrongsQuery, StrongsResponse, TransformRequest, TransformResponse,
    VerseResponse,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use mikra_core::{MikraError, TransformOptions, VerseStore};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (2 MB).
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the verse store and the default transform policy.
#[derive(Clone)]
pub struct AppState {
    /// The verse store. redb allows concurrent readers, so no lock.
    pub store: Arc<VerseStore>,
    /// Policy for `POST /transform` when the request leaves a field out.
    pub transform: TransformOptions,
}

impl AppState {
    /// Create new app state around a store.
    #[must_use]
    pub fn new(store: VerseStore, transform: TransformOptions) -> Self {
        Self {
            store: Arc::new(store),
            transform,
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Origins allowed when `MIKRA_CORS_ORIGINS` is unset or unusable.
const LOCALHOST_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:8080",
];

/// Build the CORS layer from `MIKRA_CORS_ORIGINS`.
///
/// - `*`: every origin (logged as a warning)
/// - comma-separated list: those origins, invalid entries skipped
/// - unset, or no valid entry: localhost only
fn build_cors_layer() -> CorsLayer {
    let configured = std::env::var("MIKRA_CORS_ORIGINS").ok();

    if configured.as_deref() == Some("*") {
        tracing::warn!(
            "CORS: Allowing ALL origins (MIKRA_CORS_ORIGINS=*). This is insecure for production!"
        );
        return CorsLayer::permissive();
    }

    let mut origins = configured.as_deref().map(parse_origins).unwrap_or_default();
    if origins.is_empty() {
        tracing::info!("CORS: No usable MIKRA_CORS_ORIGINS, defaulting to localhost only");
        origins = parse_origins(&LOCALHOST_ORIGINS.join(","));
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Parse a comma-separated origin list, skipping invalid entries.
fn parse_origins(list: &str) -> Vec<HeaderValue> {
    list.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. CORS - handles preflight requests
/// 2. Tracing - logs all requests
/// 3. Body limit - rejects oversized payloads
/// 4. Rate Limiting - protects against DoS (if enabled)
/// 5. Authentication - validates API key (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    // Check if rate limiting is enabled
    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    // Check if authentication is enabled
    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set MIKRA_API_KEY environment variable to enable authentication."
        );
    }

    // Build base router with routes
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route(
            "/verse/{edition}/{book}/{chapter}/{verse}",
            get(handlers::verse_handler),
        )
        .route(
            "/chapter/{edition}/{book}/{chapter}",
            get(handlers::chapter_handler),
        )
        .route("/strongs/{code}", get(handlers::strongs_handler))
        .route("/gematria", post(handlers::gematria_handler))
        .route("/lemma", post(handlers::lemma_handler))
        .route("/transform", post(handlers::transform_handler));

    // Apply authentication middleware (innermost - runs last on request)
    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // CORS, tracing and body limit (outermost layers, listed outer first)
    router
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), MikraError> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| MikraError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Mikra HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MikraError::IoError(format!("Server error: {}", e)))
}

/// Resolves on Ctrl+C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}

// =============================================================================
// TESTS
// =============================================================================

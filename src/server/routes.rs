//! Router configuration for the APS viewer backend.
//!
//! # Route Structure
//!
//! ```text
//! /health                      - Health check
//! /api/auth/token              - Viewer access token
//! /api/models                  - List (GET) / upload (POST) designs
//! /api/models/{urn}/status     - Translation status
//! /*                           - Static viewer assets (fallback)
//! ```
//!
//! Every route runs under a per-request timeout; a request that exceeds it is
//! answered with 408 while any remote calls already in flight run to
//! completion on their own.

use std::path::PathBuf;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::{routing::get, Router};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::aps::{ApsService, AuthProvider, DerivativeService, ObjectStore};

use super::handlers::{
    health_handler, list_models_handler, translation_status_handler, upload_model_handler,
    viewer_token_handler, AppState,
};

/// Largest accepted upload body. Design files are routinely tens of
/// megabytes; axum's 2 MB default would reject them.
pub const MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Directory of static frontend assets
    pub wwwroot: PathBuf,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration with defaults:
    /// - CORS allows any origin
    /// - 120 second request timeout
    /// - static assets from `wwwroot/`
    /// - tracing enabled
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            wwwroot: PathBuf::from("wwwroot"),
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the static asset directory.
    pub fn with_wwwroot(mut self, wwwroot: impl Into<PathBuf>) -> Self {
        self.wwwroot = wwwroot.into();
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// Builds the complete Axum router with the JSON API, static asset fallback,
/// request timeout, CORS and optional tracing.
pub fn create_router<A, S, D>(service: ApsService<A, S, D>, config: RouterConfig) -> Router
where
    A: AuthProvider + 'static,
    S: ObjectStore + 'static,
    D: DerivativeService + 'static,
{
    let state = AppState::new(service);
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/auth/token", get(viewer_token_handler::<A, S, D>))
        .route(
            "/api/models",
            get(list_models_handler::<A, S, D>).post(upload_model_handler::<A, S, D>),
        )
        .route(
            "/api/models/{urn}/status",
            get(translation_status_handler::<A, S, D>),
        )
        .with_state(state)
        .fallback_service(ServeDir::new(&config.wwwroot))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

//! HTTP server layer for the APS viewer backend.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       HTTP Layer                         │
//! │        /api/auth/token   /api/models   /{static}         │
//! │                                                          │
//! │  ┌─────────────┐            ┌─────────────────────────┐  │
//! │  │  handlers   │            │        routes            │  │
//! │  │ (requests)  │            │ (router, timeout, CORS)  │  │
//! │  └─────────────┘            └─────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, list_models_handler, translation_status_handler, upload_model_handler,
    viewer_token_handler, AppState, ErrorResponse, HealthResponse, ModelSummary,
    TranslationStatus, UploadError, UploadResponse,
};
pub use routes::{create_router, RouterConfig, DEFAULT_REQUEST_TIMEOUT, MAX_UPLOAD_BYTES};

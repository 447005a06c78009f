//! # APS Viewer
//!
//! A thin backend for viewing design files with Autodesk Platform Services
//! (APS). It lets a web client obtain a read-only viewer token, upload design
//! files into an OSS bucket, and start/poll Model Derivative translation jobs
//! that turn those files into viewable derivatives.
//!
//! All state lives in the remote APS services; this crate only sequences
//! HTTPS calls against them and reshapes identifiers.
//!
//! ## Architecture
//!
//! The library is organized into a few modules:
//!
//! - [`aps`] - clients for the three APS services and the façade sequencing
//!   them
//! - [`server`] - Axum-based HTTP API and static asset serving
//! - [`config`] - CLI and environment configuration
//! - [`error`] - the error taxonomy shared across layers
//!
//! ## Example
//!
//! ```rust,no_run
//! use aps_viewer::{
//!     ApsService, HttpAuthClient, HttpDerivativeClient, HttpObjectStore, RouterConfig,
//!     DEFAULT_BASE_URL,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let http = reqwest::Client::new();
//!     let service = ApsService::new(
//!         HttpAuthClient::new(http.clone(), DEFAULT_BASE_URL, "client-id", "client-secret"),
//!         HttpObjectStore::new(http.clone(), DEFAULT_BASE_URL),
//!         HttpDerivativeClient::new(http, DEFAULT_BASE_URL),
//!         "my-bucket",
//!     );
//!     let router = aps_viewer::create_router(service, RouterConfig::new());
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod aps;
pub mod config;
pub mod error;
pub mod server;

// Re-export commonly used types
pub use aps::{
    join_scopes, urnify, AccessToken, ApsService, AuthProvider, BucketDetails, Derivative,
    DerivativeService, HttpAuthClient, HttpDerivativeClient, HttpObjectStore, JobAcceptance,
    JobSpec, Manifest, ObjectDetails, ObjectStore, ObjectsPage, Scope, DEFAULT_BASE_URL,
    PAGE_LIMIT,
};
pub use config::Config;
pub use error::ApsError;
pub use server::{
    create_router, AppState, ErrorResponse, HealthResponse, ModelSummary, RouterConfig,
    TranslationStatus, UploadResponse,
};

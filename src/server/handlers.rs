//! HTTP request handlers for the APS viewer API.
//!
//! # Endpoints
//!
//! - `GET /api/auth/token` - viewer-scoped access token
//! - `GET /api/models` - list uploaded designs as `{name, urn}` pairs
//! - `POST /api/models` - upload a design and start its translation
//! - `GET /api/models/{urn}/status` - translation progress for a URN
//! - `GET /health` - health check

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::aps::{
    urnify, AccessToken, ApsService, AuthProvider, DerivativeService, Manifest, ObjectStore,
};
use crate::error::ApsError;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state holding the APS façade.
///
/// Passed to all handlers via Axum's State extractor.
pub struct AppState<A, S, D> {
    /// The façade used for every remote call
    pub service: Arc<ApsService<A, S, D>>,
}

impl<A, S, D> AppState<A, S, D> {
    pub fn new(service: ApsService<A, S, D>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

impl<A, S, D> Clone for AppState<A, S, D> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "upstream_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// One uploaded design, as shown in the model list.
#[derive(Debug, Serialize)]
pub struct ModelSummary {
    /// Object name chosen by the uploader
    pub name: String,

    /// URN referencing the design in translation/viewer calls
    pub urn: String,
}

/// Response to a successful upload: the design is stored and its
/// translation job has been accepted.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub name: String,
    pub urn: String,
}

/// Translation progress reported by the status endpoint.
#[derive(Debug, Serialize)]
pub struct TranslationStatus {
    /// Manifest status, or "n/a" when no job is visible yet
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,

    /// Diagnostics from the translation pipeline, flattened across
    /// derivatives and their children
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<serde_json::Value>>,
}

impl TranslationStatus {
    /// Status for a URN with no visible translation job.
    pub fn not_started() -> Self {
        Self {
            status: "n/a".to_string(),
            progress: None,
            messages: None,
        }
    }

    /// Status derived from a fetched manifest.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            status: manifest.status.clone(),
            progress: Some(manifest.progress.clone()),
            messages: Some(manifest.collect_messages()),
        }
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert ApsError to an HTTP response.
///
/// Upstream statuses pass through so callers can distinguish failure classes;
/// transport failures become 502. Severity drives the log level:
/// - 5xx at ERROR
/// - 404 at DEBUG (expected during polling)
/// - other 4xx at WARN
impl IntoResponse for ApsError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApsError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Not found: {}", resource),
            ),

            ApsError::Remote { status, message } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                "upstream_error",
                format!("APS request failed ({}): {}", status, message),
            ),

            ApsError::Connection(msg) => (
                StatusCode::BAD_GATEWAY,
                "connection_error",
                format!("Connection error: {}", msg),
            ),

            ApsError::Io(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                format!("I/O error: {}", msg),
            ),
        };

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else if status == StatusCode::NOT_FOUND {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Resource not found: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

/// Errors specific to the upload endpoint: bad multipart input on top of the
/// usual façade failures.
#[derive(Debug)]
pub enum UploadError {
    /// The multipart body carried no usable "model-file" part
    MissingFile,

    /// The multipart body could not be parsed
    BadRequest(String),

    /// A façade call failed
    Aps(ApsError),
}

impl From<ApsError> for UploadError {
    fn from(err: ApsError) -> Self {
        UploadError::Aps(err)
    }
}

impl From<axum::extract::multipart::MultipartError> for UploadError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        UploadError::BadRequest(err.to_string())
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::MissingFile => {
                warn!("upload rejected: no model-file part in request");
                let body = ErrorResponse::with_status(
                    "missing_file",
                    "The request must include a \"model-file\" form field",
                    StatusCode::BAD_REQUEST,
                );
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            UploadError::BadRequest(message) => {
                warn!("upload rejected: {}", message);
                let body = ErrorResponse::with_status(
                    "invalid_request",
                    format!("Malformed upload request: {}", message),
                    StatusCode::BAD_REQUEST,
                );
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            UploadError::Aps(err) => err.into_response(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle viewer token requests.
///
/// # Endpoint
///
/// `GET /api/auth/token`
///
/// # Response
///
/// `200 OK` with the token payload as returned by the authentication
/// service, e.g.:
/// ```json
/// {"access_token": "...", "token_type": "Bearer", "expires_in": 3599}
/// ```
///
/// The token is scoped to `viewables:read` only and safe to hand to the
/// browser. Every request mints a fresh token.
pub async fn viewer_token_handler<A, S, D>(
    State(state): State<AppState<A, S, D>>,
) -> Result<Json<AccessToken>, ApsError>
where
    A: AuthProvider,
    S: ObjectStore,
    D: DerivativeService,
{
    let token = state.service.get_viewer_token().await?;
    Ok(Json(token))
}

/// Handle model list requests.
///
/// # Endpoint
///
/// `GET /api/models`
///
/// # Response
///
/// `200 OK` with a JSON array of `{name, urn}` pairs, in store order:
/// ```json
/// [{"name": "house.rvt", "urn": "dXJuOmFiYw"}]
/// ```
///
/// # Errors
///
/// Upstream failures surface with their status; transport failures as 502.
pub async fn list_models_handler<A, S, D>(
    State(state): State<AppState<A, S, D>>,
) -> Result<Json<Vec<ModelSummary>>, ApsError>
where
    A: AuthProvider,
    S: ObjectStore,
    D: DerivativeService,
{
    let objects = state.service.list_objects().await?;

    let models = objects
        .into_iter()
        .map(|object| ModelSummary {
            urn: urnify(&object.object_id),
            name: object.object_key,
        })
        .collect();

    Ok(Json(models))
}

/// Handle design uploads.
///
/// # Endpoint
///
/// `POST /api/models` (multipart/form-data)
///
/// # Form Fields
///
/// - `model-file`: the design file (required)
/// - `model-zip-entrypoint`: entry point filename when uploading a zip
///   archive (optional)
///
/// # Response
///
/// `200 OK` with `{"name": ..., "urn": ...}` once the object is stored and
/// its translation job accepted.
///
/// # Errors
///
/// - `400 Bad Request`: missing file part or malformed multipart body
/// - upstream errors pass through with their status
pub async fn upload_model_handler<A, S, D>(
    State(state): State<AppState<A, S, D>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, UploadError>
where
    A: AuthProvider,
    S: ObjectStore,
    D: DerivativeService,
{
    let mut file_name: Option<String> = None;
    let mut file_bytes: Option<axum::body::Bytes> = None;
    let mut entrypoint = String::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("model-file") => {
                file_name = field.file_name().map(str::to_string);
                file_bytes = Some(field.bytes().await?);
            }
            Some("model-zip-entrypoint") => {
                entrypoint = field.text().await?;
            }
            _ => {}
        }
    }

    let (name, data) = match (file_name, file_bytes) {
        (Some(name), Some(data)) if !name.is_empty() => (name, data),
        _ => return Err(UploadError::MissingFile),
    };

    // Stage the payload to disk so the store client can stream it.
    let staging = staging_path();
    tokio::fs::write(&staging, &data)
        .await
        .map_err(|err| ApsError::Io(format!("{}: {err}", staging.display())))?;

    let result = upload_and_translate(&state, &name, &staging, &entrypoint).await;

    // Best-effort cleanup; a leftover temp file is not worth failing over.
    let _ = tokio::fs::remove_file(&staging).await;

    Ok(Json(result?))
}

/// Upload the staged file and kick off its translation.
async fn upload_and_translate<A, S, D>(
    state: &AppState<A, S, D>,
    name: &str,
    staging: &std::path::Path,
    entrypoint: &str,
) -> Result<UploadResponse, ApsError>
where
    A: AuthProvider,
    S: ObjectStore,
    D: DerivativeService,
{
    let object = state.service.upload_object(name, staging).await?;
    let urn = urnify(&object.object_id);
    state.service.translate_object(&urn, entrypoint).await?;

    Ok(UploadResponse {
        name: name.to_string(),
        urn,
    })
}

fn staging_path() -> PathBuf {
    std::env::temp_dir().join(format!("aps-viewer-upload-{}", Uuid::new_v4()))
}

/// Handle translation status requests.
///
/// # Endpoint
///
/// `GET /api/models/{urn}/status`
///
/// # Response
///
/// `200 OK` with the manifest-derived status:
/// ```json
/// {"status": "inprogress", "progress": "42% complete", "messages": []}
/// ```
///
/// A URN with no visible job yields `{"status": "n/a"}` - still 200, since
/// "not started yet" is an expected state during polling, not a failure.
///
/// # Errors
///
/// Genuine upstream failures (anything but the manifest 404) surface as
/// non-2xx with their status.
pub async fn translation_status_handler<A, S, D>(
    State(state): State<AppState<A, S, D>>,
    Path(urn): Path<String>,
) -> Result<Json<TranslationStatus>, ApsError>
where
    A: AuthProvider,
    S: ObjectStore,
    D: DerivativeService,
{
    let status = match state.service.get_manifest(&urn).await? {
        Some(manifest) => TranslationStatus::from_manifest(&manifest),
        None => TranslationStatus::not_started(),
    };
    Ok(Json(status))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================

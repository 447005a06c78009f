use thiserror::Error;

/// Errors produced when talking to the APS services.
///
/// The two "expected absence" conditions (bucket probe, manifest fetch) are
/// signalled via `NotFound` so callers can branch on a tagged variant instead
/// of inspecting response shapes. Everything else propagates unchanged.
#[derive(Debug, Clone, Error)]
pub enum ApsError {
    /// The remote resource does not exist (HTTP 404 upstream)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-2xx answer from an APS service
    #[error("APS request failed with status {status}: {message}")]
    Remote { status: u16, message: String },

    /// Network or transport-level failure before a response was obtained
    #[error("Connection error: {0}")]
    Connection(String),

    /// Local file error while staging an upload
    #[error("I/O error: {0}")]
    Io(String),
}

impl ApsError {
    /// Whether this error is the expected-absence signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApsError::NotFound(_))
    }

    /// Whether this error is an upstream 409 Conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApsError::Remote { status: 409, .. })
    }
}

impl From<reqwest::Error> for ApsError {
    fn from(err: reqwest::Error) -> Self {
        ApsError::Connection(err.to_string())
    }
}

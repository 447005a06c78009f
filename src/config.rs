//! Configuration management for the APS viewer backend.
//!
//! All settings come from command-line arguments or environment variables,
//! with the credential variables matching what the APS tooling ecosystem
//! expects:
//!
//! - `APS_CLIENT_ID` - APS application client ID (required)
//! - `APS_CLIENT_SECRET` - APS application client secret (required)
//! - `APS_BUCKET` - OSS bucket for uploaded designs (default: derived from
//!   the client ID)
//! - `PORT` - server port (default: 8080)
//!
//! Configuration is loaded once at startup into an explicit struct and passed
//! into the façade and the router; nothing reads the environment afterwards.

use std::path::PathBuf;

use clap::Parser;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default static asset directory.
pub const DEFAULT_WWWROOT: &str = "wwwroot";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Suffix appended to the lowercased client ID when no bucket is configured.
const BUCKET_SUFFIX: &str = "-basic-app";

// =============================================================================
// CLI Arguments
// =============================================================================

/// APS Viewer - backend for uploading and viewing design files.
///
/// Wraps the APS authentication, OSS and Model Derivative services behind a
/// small JSON API and serves the static viewer frontend.
#[derive(Parser, Debug, Clone)]
#[command(name = "aps-viewer")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // APS Credentials
    // =========================================================================
    /// APS application client ID.
    #[arg(long, env = "APS_CLIENT_ID")]
    pub client_id: Option<String>,

    /// APS application client secret.
    #[arg(long, env = "APS_CLIENT_SECRET")]
    pub client_secret: Option<String>,

    /// OSS bucket holding uploaded designs.
    ///
    /// Bucket keys are globally unique across all APS applications. If not
    /// set, a key is derived from the client ID.
    #[arg(long, env = "APS_BUCKET")]
    pub bucket: Option<String>,

    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "APS_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    /// Directory of static frontend assets served for unmatched paths.
    #[arg(long, default_value = DEFAULT_WWWROOT, env = "APS_WWWROOT")]
    pub wwwroot: PathBuf,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS, env = "APS_REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "APS_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.client_id.as_deref().unwrap_or("").is_empty()
            || self.client_secret.as_deref().unwrap_or("").is_empty()
        {
            return Err(
                "Missing APS credentials. Set APS_CLIENT_ID and APS_CLIENT_SECRET".to_string(),
            );
        }

        if self.request_timeout == 0 {
            return Err("request_timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// The bucket key to use for all object operations.
    ///
    /// Falls back to `lowercase(client_id) + "-basic-app"` when no bucket is
    /// configured (call validate() first so the client ID is known present).
    pub fn bucket(&self) -> String {
        match self.bucket.as_deref() {
            Some(bucket) if !bucket.is_empty() => bucket.to_string(),
            _ => format!(
                "{}{}",
                self.client_id.as_deref().unwrap_or("").to_lowercase(),
                BUCKET_SUFFIX
            ),
        }
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the client ID, empty if not set (call validate() first).
    pub fn client_id_or_empty(&self) -> &str {
        self.client_id.as_deref().unwrap_or("")
    }

    /// Get the client secret, empty if not set (call validate() first).
    pub fn client_secret_or_empty(&self) -> &str {
        self.client_secret.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Tests
// =============================================================================

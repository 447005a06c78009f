//! OAuth scopes and access tokens for the two-legged APS flow.

use serde::{Deserialize, Serialize};

/// OAuth scopes recognized by the APS authentication service.
///
/// Only the scopes this application actually requests are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Read viewable derivatives (the only scope handed out to web clients)
    ViewablesRead,
    /// Read objects and buckets
    DataRead,
    /// Create objects
    DataCreate,
    /// Write objects
    DataWrite,
    /// Create buckets
    BucketCreate,
    /// Read bucket metadata
    BucketRead,
}

impl Scope {
    /// Scope set for the read-only token exposed to the viewer.
    pub const VIEWER: &'static [Scope] = &[Scope::ViewablesRead];

    /// Elevated scope set used internally for storage and translation calls.
    pub const INTERNAL: &'static [Scope] = &[
        Scope::DataRead,
        Scope::DataCreate,
        Scope::DataWrite,
        Scope::BucketCreate,
        Scope::BucketRead,
    ];

    /// The wire representation of this scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::ViewablesRead => "viewables:read",
            Scope::DataRead => "data:read",
            Scope::DataCreate => "data:create",
            Scope::DataWrite => "data:write",
            Scope::BucketCreate => "bucket:create",
            Scope::BucketRead => "bucket:read",
        }
    }
}

/// Join scopes into the space-separated form the token endpoint expects.
pub fn join_scopes(scopes: &[Scope]) -> String {
    scopes
        .iter()
        .map(Scope::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A two-legged access token as returned by the authentication service.
///
/// Returned verbatim (expiry metadata included) to the viewer token endpoint;
/// never cached, so expiry bookkeeping stays on the remote side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

//! APS integration layer.
//!
//! Three remote services sit behind this module:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ApsService                           │
//! │   get_viewer_token / ensure_bucket_exists / list_objects    │
//! │   upload_object / translate_object / get_manifest / urnify  │
//! │                                                             │
//! │  ┌──────────────┐  ┌──────────────┐  ┌───────────────────┐  │
//! │  │ AuthProvider │  │ ObjectStore  │  │ DerivativeService │  │
//! │  │  (tokens)    │  │ (OSS bucket) │  │  (translations)   │  │
//! │  └──────────────┘  └──────────────┘  └───────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The traits are the substitution points; the `Http*` types are the
//! reqwest-backed production clients.

pub mod client;
pub mod service;
pub mod token;
pub mod types;

pub use client::{
    AuthProvider, DerivativeService, HttpAuthClient, HttpDerivativeClient, HttpObjectStore,
    ObjectStore, DEFAULT_BASE_URL,
};
pub use service::{urnify, ApsService, PAGE_LIMIT};
pub use token::{join_scopes, AccessToken, Scope};
pub use types::{
    BucketDetails, Derivative, JobAcceptance, JobFormat, JobInput, JobOutput, JobSpec, Manifest,
    ObjectDetails, ObjectsPage, SignedUpload,
};

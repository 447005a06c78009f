//! Client seams for the three remote APS services, plus their
//! reqwest-backed implementations.
//!
//! Each service is modeled as an async trait so the façade and the HTTP
//! handlers can be exercised against test doubles. The real implementations
//! are thin: one method per REST call, sharing a single `reqwest::Client`
//! connection pool, with non-2xx statuses mapped into [`ApsError`] before any
//! body decoding happens.

use std::path::Path;

use async_trait::async_trait;
use http::StatusCode;
use serde_json::json;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::error::ApsError;

use super::token::{join_scopes, AccessToken, Scope};
use super::types::{
    BucketDetails, JobAcceptance, JobSpec, Manifest, ObjectDetails, ObjectsPage, SignedUpload,
};

/// Production APS endpoint.
pub const DEFAULT_BASE_URL: &str = "https://developer.api.autodesk.com";

// =============================================================================
// Service Seams
// =============================================================================

/// Two-legged token acquisition.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Fetch a fresh token for the given scopes. Never cached.
    async fn fetch_token(&self, scopes: &[Scope]) -> Result<AccessToken, ApsError>;
}

/// The OSS object storage service.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Probe bucket metadata. Yields `ApsError::NotFound` for missing buckets.
    async fn bucket_details(&self, token: &str, bucket_key: &str)
        -> Result<BucketDetails, ApsError>;

    /// Create a bucket in the US region with persistent retention.
    async fn create_bucket(&self, token: &str, bucket_key: &str)
        -> Result<BucketDetails, ApsError>;

    /// Fetch one page of the object listing, optionally resuming at a cursor.
    async fn list_page(
        &self,
        token: &str,
        bucket_key: &str,
        limit: usize,
        start_at: Option<&str>,
    ) -> Result<ObjectsPage, ApsError>;

    /// Upload the file at `file_path` into the bucket under `object_name`.
    async fn upload(
        &self,
        token: &str,
        bucket_key: &str,
        object_name: &str,
        file_path: &Path,
    ) -> Result<ObjectDetails, ApsError>;
}

/// The Model Derivative translation service.
#[async_trait]
pub trait DerivativeService: Send + Sync {
    /// Submit a translation job; returns the acceptance acknowledgement.
    async fn start_job(&self, token: &str, spec: &JobSpec) -> Result<JobAcceptance, ApsError>;

    /// Fetch the manifest for a URN. Yields `ApsError::NotFound` when no job
    /// is visible for the URN yet.
    async fn manifest(&self, token: &str, urn: &str) -> Result<Manifest, ApsError>;
}

// =============================================================================
// Shared Response Handling
// =============================================================================

/// Map non-success statuses to `ApsError` and hand successful responses back.
///
/// `resource` names what was being fetched; it becomes the payload of the
/// `NotFound` variant so callers can log something meaningful.
async fn check_status(
    response: reqwest::Response,
    resource: &str,
) -> Result<reqwest::Response, ApsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApsError::NotFound(resource.to_string()));
    }
    let message = response.text().await.unwrap_or_default();
    Err(ApsError::Remote {
        status: status.as_u16(),
        message,
    })
}

// =============================================================================
// Authentication Client
// =============================================================================

/// Reqwest-backed client for the APS authentication service.
#[derive(Clone)]
pub struct HttpAuthClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl HttpAuthClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

#[async_trait]
impl AuthProvider for HttpAuthClient {
    async fn fetch_token(&self, scopes: &[Scope]) -> Result<AccessToken, ApsError> {
        let scope = join_scopes(scopes);
        debug!(scope = %scope, "fetching two-legged token");

        let response = self
            .http
            .post(format!("{}/authentication/v2/token", self.base_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", scope.as_str()),
            ])
            .send()
            .await?;

        let response = check_status(response, "authentication token").await?;
        Ok(response.json().await?)
    }
}

// =============================================================================
// Object Storage Client
// =============================================================================

/// Reqwest-backed client for the OSS service.
///
/// Uploads use the signed-S3 handshake: request a signed URL, PUT the payload
/// there, then complete the upload to obtain the object descriptor. The
/// legacy direct PUT endpoint is deprecated upstream.
#[derive(Clone)]
pub struct HttpObjectStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpObjectStore {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn object_url(&self, bucket_key: &str, object_name: &str, suffix: &str) -> String {
        format!(
            "{}/oss/v2/buckets/{}/objects/{}{}",
            self.base_url,
            urlencoding::encode(bucket_key),
            urlencoding::encode(object_name),
            suffix
        )
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn bucket_details(
        &self,
        token: &str,
        bucket_key: &str,
    ) -> Result<BucketDetails, ApsError> {
        let response = self
            .http
            .get(format!(
                "{}/oss/v2/buckets/{}/details",
                self.base_url,
                urlencoding::encode(bucket_key)
            ))
            .bearer_auth(token)
            .send()
            .await?;

        let response = check_status(response, &format!("bucket {bucket_key}")).await?;
        Ok(response.json().await?)
    }

    async fn create_bucket(
        &self,
        token: &str,
        bucket_key: &str,
    ) -> Result<BucketDetails, ApsError> {
        debug!(bucket = bucket_key, "creating bucket");

        let response = self
            .http
            .post(format!("{}/oss/v2/buckets", self.base_url))
            .bearer_auth(token)
            .header("x-ads-region", "US")
            .json(&json!({
                "bucketKey": bucket_key,
                "policyKey": "persistent",
            }))
            .send()
            .await?;

        let response = check_status(response, &format!("bucket {bucket_key}")).await?;
        Ok(response.json().await?)
    }

    async fn list_page(
        &self,
        token: &str,
        bucket_key: &str,
        limit: usize,
        start_at: Option<&str>,
    ) -> Result<ObjectsPage, ApsError> {
        let mut request = self
            .http
            .get(format!(
                "{}/oss/v2/buckets/{}/objects",
                self.base_url,
                urlencoding::encode(bucket_key)
            ))
            .bearer_auth(token)
            .query(&[("limit", limit.to_string())]);

        if let Some(cursor) = start_at {
            request = request.query(&[("startAt", cursor)]);
        }

        let response = request.send().await?;
        let response = check_status(response, &format!("objects in bucket {bucket_key}")).await?;
        Ok(response.json().await?)
    }

    async fn upload(
        &self,
        token: &str,
        bucket_key: &str,
        object_name: &str,
        file_path: &Path,
    ) -> Result<ObjectDetails, ApsError> {
        // Step 1: obtain a single-part signed URL.
        let response = self
            .http
            .get(self.object_url(bucket_key, object_name, "/signeds3upload"))
            .bearer_auth(token)
            .query(&[("parts", "1")])
            .send()
            .await?;
        let response = check_status(response, &format!("upload slot for {object_name}")).await?;
        let signed: SignedUpload = response.json().await?;

        let upload_url = signed.urls.first().ok_or_else(|| ApsError::Remote {
            status: 500,
            message: "signed upload response contained no URLs".to_string(),
        })?;

        // Step 2: stream the file body to the signed URL. No bearer token
        // here; the URL itself carries the authorization.
        let file = tokio::fs::File::open(file_path)
            .await
            .map_err(|err| ApsError::Io(format!("{}: {err}", file_path.display())))?;
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

        let response = self.http.put(upload_url).body(body).send().await?;
        check_status(response, &format!("upload of {object_name}")).await?;

        // Step 3: complete the upload; the answer is the object descriptor.
        let response = self
            .http
            .post(self.object_url(bucket_key, object_name, "/signeds3upload"))
            .bearer_auth(token)
            .json(&json!({ "uploadKey": signed.upload_key }))
            .send()
            .await?;
        let response = check_status(response, &format!("upload of {object_name}")).await?;
        Ok(response.json().await?)
    }
}

// =============================================================================
// Model Derivative Client
// =============================================================================

/// Reqwest-backed client for the Model Derivative service.
#[derive(Clone)]
pub struct HttpDerivativeClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDerivativeClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DerivativeService for HttpDerivativeClient {
    async fn start_job(&self, token: &str, spec: &JobSpec) -> Result<JobAcceptance, ApsError> {
        debug!(urn = %spec.input.urn, "starting translation job");

        let response = self
            .http
            .post(format!(
                "{}/modelderivative/v2/designdata/job",
                self.base_url
            ))
            .bearer_auth(token)
            .json(spec)
            .send()
            .await?;

        let response = check_status(response, &format!("job for {}", spec.input.urn)).await?;
        Ok(response.json().await?)
    }

    async fn manifest(&self, token: &str, urn: &str) -> Result<Manifest, ApsError> {
        let response = self
            .http
            .get(format!(
                "{}/modelderivative/v2/designdata/{}/manifest",
                self.base_url,
                urlencoding::encode(urn)
            ))
            .bearer_auth(token)
            .send()
            .await?;

        let response = check_status(response, &format!("manifest for {urn}")).await?;
        Ok(response.json().await?)
    }
}

//! The cloud façade: sequences calls against the three APS services.
//!
//! This is the only place in the crate with any cross-service logic. Each
//! operation authenticates independently (a fresh internal token per call,
//! never cached), so callers can treat façade calls as self-contained.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::info;
use url::Url;

use crate::error::ApsError;

use super::client::{AuthProvider, DerivativeService, ObjectStore};
use super::token::{AccessToken, Scope};
use super::types::{JobAcceptance, JobSpec, Manifest, ObjectDetails};

/// Page size used when listing bucket objects.
pub const PAGE_LIMIT: usize = 64;

/// Façade over the authentication, object storage and translation services.
///
/// Constructed once at startup with concrete clients and the process-wide
/// bucket key; handlers hold it behind an `Arc`. The generic parameters exist
/// so tests can substitute doubles for any of the three services.
pub struct ApsService<A, S, D> {
    auth: A,
    store: S,
    derivatives: D,
    bucket_key: String,
}

impl<A, S, D> ApsService<A, S, D>
where
    A: AuthProvider,
    S: ObjectStore,
    D: DerivativeService,
{
    /// Create the façade. `bucket_key` is fixed for the process lifetime and
    /// used for every object operation; it is never user-selectable.
    pub fn new(auth: A, store: S, derivatives: D, bucket_key: impl Into<String>) -> Self {
        Self {
            auth,
            store,
            derivatives,
            bucket_key: bucket_key.into(),
        }
    }

    /// The bucket all object operations target.
    pub fn bucket_key(&self) -> &str {
        &self.bucket_key
    }

    /// Fetch a token scoped to reading viewables only, suitable for handing
    /// to the web client. Expiry metadata is passed through untouched.
    pub async fn get_viewer_token(&self) -> Result<AccessToken, ApsError> {
        self.auth.fetch_token(Scope::VIEWER).await
    }

    /// Fetch a fresh elevated-scope token for storage/translation calls.
    async fn internal_token(&self) -> Result<String, ApsError> {
        let token = self.auth.fetch_token(Scope::INTERNAL).await?;
        Ok(token.access_token)
    }

    /// Make sure the configured bucket exists, creating it on first use.
    ///
    /// Only a `NotFound` from the probe triggers creation; any other probe
    /// failure propagates unchanged. A create that loses the race against a
    /// concurrent caller (409 from the store) counts as success, since the
    /// bucket exists either way. Idempotent.
    pub async fn ensure_bucket_exists(&self) -> Result<(), ApsError> {
        let token = self.internal_token().await?;

        match self.store.bucket_details(&token, &self.bucket_key).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_not_found() => {
                info!(bucket = %self.bucket_key, "bucket missing, creating it");
                match self.store.create_bucket(&token, &self.bucket_key).await {
                    Ok(_) => Ok(()),
                    Err(err) if err.is_conflict() => Ok(()),
                    Err(err) => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    /// List every object in the bucket, following pagination until the store
    /// stops handing out `next` links. Order is whatever the store returns.
    pub async fn list_objects(&self) -> Result<Vec<ObjectDetails>, ApsError> {
        self.ensure_bucket_exists().await?;
        let token = self.internal_token().await?;

        let mut page = self
            .store
            .list_page(&token, &self.bucket_key, PAGE_LIMIT, None)
            .await?;
        let mut objects = page.items;

        while let Some(next) = page.next {
            let Some(cursor) = pagination_cursor(&next) else {
                break;
            };
            page = self
                .store
                .list_page(&token, &self.bucket_key, PAGE_LIMIT, Some(&cursor))
                .await?;
            objects.extend(page.items);
        }

        Ok(objects)
    }

    /// Upload the local file at `file_path` into the bucket as `object_name`.
    ///
    /// No retry: a transient upload failure propagates to the caller.
    pub async fn upload_object(
        &self,
        object_name: &str,
        file_path: &Path,
    ) -> Result<ObjectDetails, ApsError> {
        self.ensure_bucket_exists().await?;
        let token = self.internal_token().await?;
        self.store
            .upload(&token, &self.bucket_key, object_name, file_path)
            .await
    }

    /// Start a translation job producing SVF2 with 2D and 3D views.
    ///
    /// A non-empty `root_filename` flags the URN as a composite archive with
    /// that entry point. Returns the acceptance result, not the manifest.
    pub async fn translate_object(
        &self,
        urn: &str,
        root_filename: &str,
    ) -> Result<JobAcceptance, ApsError> {
        let token = self.internal_token().await?;
        let spec = JobSpec::svf2(urn, root_filename);
        self.derivatives.start_job(&token, &spec).await
    }

    /// Fetch the current manifest for a URN.
    ///
    /// `Ok(None)` means no job is visible for the URN yet; that is a defined
    /// outcome, not an error. Everything except the 404 propagates.
    pub async fn get_manifest(&self, urn: &str) -> Result<Option<Manifest>, ApsError> {
        let token = self.internal_token().await?;
        match self.derivatives.manifest(&token, urn).await {
            Ok(manifest) => Ok(Some(manifest)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Convert an object identifier into the URN form the viewer and the
/// translation service use: standard base64 with `=` padding stripped.
///
/// Pure and deterministic; no I/O, no failure mode.
pub fn urnify(id: &str) -> String {
    STANDARD.encode(id).replace('=', "")
}

/// Pull the `startAt` cursor out of a `next` page link.
fn pagination_cursor(next: &str) -> Option<String> {
    let parsed = Url::parse(next).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "startAt")
        .map(|(_, value)| value.into_owned())
}

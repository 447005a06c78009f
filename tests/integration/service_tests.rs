//! Façade sequencing tests against mocked APS services.
//!
//! Covers the observable contract: lazy bucket creation, pagination,
//! expected-absence handling, error propagation and job parameters.

use aps_viewer::{urnify, ApsError, Manifest, Scope};

use super::test_utils::{
    object, objects, page, service, MockAuth, MockDerivativeClient, MockObjectStore,
};

// =============================================================================
// Token Scoping
// =============================================================================

#[tokio::test]
async fn test_viewer_token_uses_read_only_scope() {
    let auth = MockAuth::new();
    let service = service(
        auth.clone(),
        MockObjectStore::new(),
        MockDerivativeClient::new(),
    );

    let token = service.get_viewer_token().await.unwrap();
    assert_eq!(token.access_token, "test-token");
    assert_eq!(token.expires_in, 3599);

    let scopes = auth.recorded_scopes();
    assert_eq!(scopes, vec![vec![Scope::ViewablesRead]]);
}

#[tokio::test]
async fn test_elevated_operations_fetch_fresh_internal_tokens() {
    let auth = MockAuth::new();
    let store = MockObjectStore::new().with_existing_bucket();
    let service = service(auth.clone(), store, MockDerivativeClient::new());

    service.ensure_bucket_exists().await.unwrap();
    service.ensure_bucket_exists().await.unwrap();

    // No caching: every call re-authenticates with the internal scope set.
    assert_eq!(auth.fetch_count(), 2);
    for scopes in auth.recorded_scopes() {
        assert_eq!(scopes, Scope::INTERNAL.to_vec());
    }
}

// =============================================================================
// Bucket Lifecycle
// =============================================================================

#[tokio::test]
async fn test_ensure_bucket_creates_missing_bucket_exactly_once() {
    let store = MockObjectStore::new();
    let service = service(MockAuth::new(), store.clone(), MockDerivativeClient::new());

    service.ensure_bucket_exists().await.unwrap();
    service.ensure_bucket_exists().await.unwrap();

    // Two probes, one create, and the second call is a no-op beyond its probe.
    assert_eq!(store.probe_calls(), 2);
    assert_eq!(store.create_calls(), 1);
}

#[tokio::test]
async fn test_ensure_bucket_skips_create_when_bucket_exists() {
    let store = MockObjectStore::new().with_existing_bucket();
    let service = service(MockAuth::new(), store.clone(), MockDerivativeClient::new());

    service.ensure_bucket_exists().await.unwrap();

    assert_eq!(store.probe_calls(), 1);
    assert_eq!(store.create_calls(), 0);
}

#[tokio::test]
async fn test_ensure_bucket_propagates_probe_failure_without_creating() {
    let store = MockObjectStore::new().with_probe_error(ApsError::Remote {
        status: 403,
        message: "forbidden".to_string(),
    });
    let service = service(MockAuth::new(), store.clone(), MockDerivativeClient::new());

    let err = service.ensure_bucket_exists().await.unwrap_err();
    match err {
        ApsError::Remote { status, .. } => assert_eq!(status, 403),
        other => panic!("expected Remote error, got {other:?}"),
    }
    assert_eq!(store.create_calls(), 0);
}

#[tokio::test]
async fn test_ensure_bucket_treats_create_conflict_as_success() {
    // A concurrent caller won the probe-then-create race; the 409 from our
    // create means the bucket exists, which is the goal state.
    let store = MockObjectStore::new().with_create_error(ApsError::Remote {
        status: 409,
        message: "bucket already exists".to_string(),
    });
    let service = service(MockAuth::new(), store.clone(), MockDerivativeClient::new());

    service.ensure_bucket_exists().await.unwrap();
    assert_eq!(store.create_calls(), 1);
}

#[tokio::test]
async fn test_ensure_bucket_propagates_other_create_failures() {
    let store = MockObjectStore::new().with_create_error(ApsError::Remote {
        status: 500,
        message: "oss unavailable".to_string(),
    });
    let service = service(MockAuth::new(), store, MockDerivativeClient::new());

    let err = service.ensure_bucket_exists().await.unwrap_err();
    assert!(matches!(err, ApsError::Remote { status: 500, .. }));
}

// =============================================================================
// Object Listing
// =============================================================================

#[tokio::test]
async fn test_list_objects_follows_pagination() {
    let pages = vec![
        page(objects(64, 0), Some("obj-63")),
        page(objects(64, 64), Some("obj-127")),
        page(objects(10, 128), None),
    ];
    let store = MockObjectStore::new()
        .with_existing_bucket()
        .with_pages(pages);
    let service = service(MockAuth::new(), store.clone(), MockDerivativeClient::new());

    let listed = service.list_objects().await.unwrap();

    assert_eq!(listed.len(), 138);
    assert_eq!(store.list_calls(), 3);

    // Store order is preserved, not re-sorted.
    assert_eq!(listed[0].object_key, "obj-0");
    assert_eq!(listed[64].object_key, "obj-64");
    assert_eq!(listed[137].object_key, "obj-137");

    // Cursors come from the next links' startAt parameters.
    assert_eq!(
        store.recorded_cursors(),
        vec![
            None,
            Some("obj-63".to_string()),
            Some("obj-127".to_string())
        ]
    );
}

#[tokio::test]
async fn test_list_objects_single_page() {
    let store = MockObjectStore::new()
        .with_existing_bucket()
        .with_pages(vec![page(objects(3, 0), None)]);
    let service = service(MockAuth::new(), store.clone(), MockDerivativeClient::new());

    let listed = service.list_objects().await.unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(store.list_calls(), 1);
}

#[tokio::test]
async fn test_list_objects_empty_bucket() {
    let store = MockObjectStore::new().with_existing_bucket();
    let service = service(MockAuth::new(), store.clone(), MockDerivativeClient::new());

    let listed = service.list_objects().await.unwrap();
    assert!(listed.is_empty());
    assert_eq!(store.list_calls(), 1);
}

#[tokio::test]
async fn test_list_objects_ensures_bucket_first() {
    let store = MockObjectStore::new();
    let service = service(MockAuth::new(), store.clone(), MockDerivativeClient::new());

    service.list_objects().await.unwrap();

    assert_eq!(store.probe_calls(), 1);
    assert_eq!(store.create_calls(), 1);
}

// =============================================================================
// Uploads
// =============================================================================

#[tokio::test]
async fn test_upload_object_ensures_bucket_and_streams_file() {
    let store = MockObjectStore::new();
    let service = service(MockAuth::new(), store.clone(), MockDerivativeClient::new());

    let staging = std::env::temp_dir().join(format!("aps-viewer-test-{}", uuid::Uuid::new_v4()));
    tokio::fs::write(&staging, b"design bytes").await.unwrap();

    let uploaded = service.upload_object("house.rvt", &staging).await.unwrap();
    tokio::fs::remove_file(&staging).await.unwrap();

    assert_eq!(uploaded.object_key, "house.rvt");
    assert_eq!(store.create_calls(), 1);
    assert_eq!(
        store.recorded_uploads(),
        vec![("house.rvt".to_string(), b"design bytes".to_vec())]
    );
}

#[tokio::test]
async fn test_upload_object_missing_file_fails() {
    let store = MockObjectStore::new().with_existing_bucket();
    let service = service(MockAuth::new(), store, MockDerivativeClient::new());

    let missing = std::env::temp_dir().join("aps-viewer-test-does-not-exist");
    let err = service.upload_object("x.rvt", &missing).await.unwrap_err();
    assert!(matches!(err, ApsError::Io(_)));
}

// =============================================================================
// Translation Jobs
// =============================================================================

#[tokio::test]
async fn test_translate_object_direct_file() {
    let derivatives = MockDerivativeClient::new();
    let service = service(MockAuth::new(), MockObjectStore::new(), derivatives.clone());

    let urn = urnify(&object("house.rvt").object_id);
    service.translate_object(&urn, "").await.unwrap();

    let jobs = derivatives.recorded_jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].input.urn, urn);
    assert!(!jobs[0].input.compressed_urn);
    assert_eq!(jobs[0].input.root_filename, "");
    assert_eq!(jobs[0].output.formats[0].kind, "svf2");
    assert_eq!(jobs[0].output.formats[0].views, vec!["2d", "3d"]);
}

#[tokio::test]
async fn test_translate_object_archive_sets_compressed_flag() {
    let derivatives = MockDerivativeClient::new();
    let service = service(MockAuth::new(), MockObjectStore::new(), derivatives.clone());

    service
        .translate_object("dXJuOmFiYw", "model.rvt")
        .await
        .unwrap();

    let jobs = derivatives.recorded_jobs();
    assert!(jobs[0].input.compressed_urn);
    assert_eq!(jobs[0].input.root_filename, "model.rvt");
}

// =============================================================================
// Manifests
// =============================================================================

#[tokio::test]
async fn test_get_manifest_absent_is_none() {
    // Default mock answers 404; the façade converts it into a defined
    // "no job visible yet" outcome.
    let service = service(
        MockAuth::new(),
        MockObjectStore::new(),
        MockDerivativeClient::new(),
    );

    let manifest = service.get_manifest("dXJuOmFiYw").await.unwrap();
    assert!(manifest.is_none());
}

#[tokio::test]
async fn test_get_manifest_returns_document() {
    let manifest = Manifest {
        urn: "dXJuOmFiYw".to_string(),
        status: "success".to_string(),
        progress: "complete".to_string(),
        derivatives: Vec::new(),
    };
    let derivatives = MockDerivativeClient::new().with_manifest(manifest);
    let service = service(MockAuth::new(), MockObjectStore::new(), derivatives);

    let fetched = service.get_manifest("dXJuOmFiYw").await.unwrap().unwrap();
    assert_eq!(fetched.status, "success");
    assert_eq!(fetched.progress, "complete");
}

#[tokio::test]
async fn test_get_manifest_propagates_genuine_failures() {
    let derivatives = MockDerivativeClient::new().with_manifest_error(ApsError::Remote {
        status: 500,
        message: "derivative service down".to_string(),
    });
    let service = service(MockAuth::new(), MockObjectStore::new(), derivatives);

    let err = service.get_manifest("dXJuOmFiYw").await.unwrap_err();
    assert!(matches!(err, ApsError::Remote { status: 500, .. }));
}

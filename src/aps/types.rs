//! Wire types exchanged with the OSS and Model Derivative services.
//!
//! Field names follow the JSON the services actually emit (camelCase), so
//! every struct carries explicit `rename` attributes rather than a blanket
//! rename rule. Unknown fields are ignored on deserialization; the façade
//! forwards these values to clients without reshaping them.

use serde::{Deserialize, Serialize};

/// Details of an OSS bucket as returned by the bucket probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketDetails {
    #[serde(rename = "bucketKey")]
    pub bucket_key: String,

    /// Retention policy: "transient", "temporary" or "persistent"
    #[serde(rename = "policyKey")]
    pub policy_key: String,
}

/// Descriptor of an object stored in a bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDetails {
    #[serde(rename = "bucketKey")]
    pub bucket_key: String,

    /// Opaque store-assigned identifier, e.g.
    /// `urn:adsk.objects:os.object:my-bucket/house.rvt`
    #[serde(rename = "objectId")]
    pub object_id: String,

    /// Uploader-chosen object name
    #[serde(rename = "objectKey")]
    pub object_key: String,

    #[serde(default)]
    pub size: Option<u64>,
}

/// One page of an object listing.
///
/// `next` carries the full URL of the following page; its `startAt` query
/// parameter is the pagination cursor.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectsPage {
    pub items: Vec<ObjectDetails>,

    #[serde(default)]
    pub next: Option<String>,
}

/// Intermediate response of the signed-upload handshake.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedUpload {
    #[serde(rename = "uploadKey")]
    pub upload_key: String,

    /// Pre-signed URLs to PUT the payload parts to
    pub urls: Vec<String>,
}

/// Translation job description sent to the Model Derivative service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSpec {
    pub input: JobInput,
    pub output: JobOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobInput {
    pub urn: String,

    /// True when the URN points at a zip archive rather than a single file
    #[serde(rename = "compressedUrn")]
    pub compressed_urn: bool,

    /// Entry point inside the archive; blank for direct files
    #[serde(rename = "rootFilename")]
    pub root_filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobOutput {
    pub formats: Vec<JobFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobFormat {
    #[serde(rename = "type")]
    pub kind: String,
    pub views: Vec<String>,
}

impl JobSpec {
    /// Build the one job shape this application submits: a single SVF2
    /// output with both 2D and 3D views.
    ///
    /// A non-empty `root_filename` marks the input as a composite archive
    /// whose entry point is that file; an empty one means a direct design.
    pub fn svf2(urn: &str, root_filename: &str) -> Self {
        Self {
            input: JobInput {
                urn: urn.to_string(),
                compressed_urn: !root_filename.is_empty(),
                root_filename: root_filename.to_string(),
            },
            output: JobOutput {
                formats: vec![JobFormat {
                    kind: "svf2".to_string(),
                    views: vec!["2d".to_string(), "3d".to_string()],
                }],
            },
        }
    }
}

/// Acknowledgement returned when a translation job is accepted.
///
/// This is the job acceptance result, not the final manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAcceptance {
    pub result: String,

    #[serde(default)]
    pub urn: Option<String>,
}

/// Manifest of a translation job: overall status plus per-derivative outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub urn: String,

    /// "pending", "inprogress", "success", "failed" or "timeout"
    pub status: String,

    #[serde(default)]
    pub progress: String,

    #[serde(default)]
    pub derivatives: Vec<Derivative>,
}

/// One derivative output within a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Derivative {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "outputType", default)]
    pub output_type: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub progress: Option<String>,

    /// Diagnostic messages emitted by the translation pipeline
    #[serde(default)]
    pub messages: Vec<serde_json::Value>,

    #[serde(default)]
    pub children: Vec<Derivative>,
}

impl Manifest {
    /// Collect diagnostic messages from all derivatives and their children.
    ///
    /// Used by the status endpoint to surface translation failures to the
    /// web client in one flat list.
    pub fn collect_messages(&self) -> Vec<serde_json::Value> {
        fn walk(derivative: &Derivative, out: &mut Vec<serde_json::Value>) {
            out.extend(derivative.messages.iter().cloned());
            for child in &derivative.children {
                walk(child, out);
            }
        }

        let mut messages = Vec::new();
        for derivative in &self.derivatives {
            walk(derivative, &mut messages);
        }
        messages
    }
}

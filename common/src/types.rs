//! Data model shared by the batch runner and its callers
//!
//! - DetectionResult: one detector run over one image
//! - Rect: one detected region with its crop file
//! - BatchResult: the flattened outcome of a whole run
//!
//! Field names follow the detector's JSON (snake_case) on the way in and the
//! UI contract (`isBatch`, `imageCount`) on the way out. Unknown fields are
//! kept in `extra` and written back untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Structured payload decoded from a QR code inside a region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecodedMetadata(pub Map<String, Value>);

impl DecodedMetadata {
    /// Text of a field, if present as a scalar.
    ///
    /// Strings are returned verbatim, numbers and booleans as their JSON
    /// text; null, arrays and objects count as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The payload as a JSON object, ready to be embedded.
    pub fn to_record(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// One detected region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    /// Display label, the crop's file name
    pub name: String,

    /// Crop file written by the detector (may be empty)
    pub crop_path: PathBuf,

    /// Present only when the region carried a readable QR payload
    #[serde(alias = "decoded_metadata", skip_serializing_if = "Option::is_none")]
    pub qr_data: Option<DecodedMetadata>,

    /// Bounding box and anything else the detector reports
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Rect {
    pub fn has_crop(&self) -> bool {
        !self.crop_path.as_os_str().is_empty()
    }
}

/// Output of one detector run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionResult {
    /// Image to show as backdrop; the corrected copy when the detector
    /// straightened the input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,

    pub rects: Vec<Rect>,

    /// Opaque debug artifacts, owned by the detector
    pub debug_qrs: Vec<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub crops_folder: Option<PathBuf>,

    /// Set when the detector caught an internal failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Flags forwarded to the detector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeOptions {
    /// Emit extra debug artifacts
    pub is_debug: bool,
    /// Persist intermediate crops for inspection
    pub save_debug_crops: bool,
}

/// A rectangle whose post-processing was cut short
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkipRecord {
    pub image: PathBuf,
    pub rect: String,
    pub reason: String,
}

/// An image that contributed nothing to the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFailure {
    pub image: PathBuf,
    pub reason: String,
}

/// Result of a whole run, as handed to the UI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchResult {
    #[serde(rename = "image")]
    pub display_image: PathBuf,

    /// All rects across images, in processing order
    pub rects: Vec<Rect>,

    pub is_batch: bool,

    /// Files attempted, not files that succeeded
    pub image_count: usize,

    #[serde(rename = "debug_qrs")]
    pub debug_qrs: Vec<Value>,

    #[serde(rename = "crops_folder", skip_serializing_if = "Option::is_none")]
    pub crops_folder: Option<PathBuf>,

    pub skipped: Vec<SkipRecord>,

    pub failed: Vec<ImageFailure>,

    /// Auxiliary detector fields from the last successful image
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What `analyze` hands back: a batch, or one top-level error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Error { error: String },
    Batch(BatchResult),
}

impl AnalyzeResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, AnalyzeResponse::Error { .. })
    }
}

//! cropmark common library
//!
//! I/O-free types and helpers shared by the batch runner and any UI layer
//! that renders its results.

pub mod error;
pub mod naming;
pub mod parser;
pub mod sanitize;
pub mod types;

pub use error::{Error, Result};
pub use naming::{candidate_stem, with_suffix, NameField};
pub use parser::{first_line, parse_detector_output};
pub use sanitize::sanitize;
pub use types::{
    AnalyzeOptions, AnalyzeResponse, BatchResult, DecodedMetadata, DetectionResult,
    ImageFailure, Rect, SkipRecord,
};

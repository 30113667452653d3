//! cropmark
//!
//! Runs an external detector over scanned sheets, embeds the decoded QR
//! payload of every crop into its EXIF and renames the crops after it.

pub mod batch;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod metadata;
pub mod postprocess;
pub mod processor;
pub mod scanner;

pub use batch::{analyze, analyze_with_progress, run_batch, run_batch_with_progress, BatchProgress};
pub use detector::{Detector, DetectorFlag, ProcessDetector};
pub use scanner::list_images;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Detector failed: {0}")]
    Detector(String),

    #[error("Detector timed out after {0}s")]
    DetectorTimeout(u64),

    #[error("Cannot embed metadata: {0}")]
    Metadata(String),

    #[error("Unsupported image format for metadata: {0}")]
    UnsupportedFormat(String),

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("EXIF error: {0}")]
    Exif(#[from] exif::Error),

    #[error("Rename {from} -> {to} failed: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] cropmark_common::Error),
}

pub type Result<T> = std::result::Result<T, CropError>;

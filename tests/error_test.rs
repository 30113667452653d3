//! Error type tests
//!
//! Display texts and conversions of CropError

use cropmark::error::CropError;
use cropmark::scanner;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Listing a folder that does not exist
#[test]
fn test_list_nonexistent_folder() {
    let result = scanner::list_images(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(CropError::InvalidPath(_))));
}

/// An empty folder is not an error
#[test]
fn test_list_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::list_images(dir.path());
    assert!(result.unwrap().is_empty());
}

#[test]
fn test_error_display() {
    let errors = vec![
        CropError::InvalidPath("/scans".to_string()),
        CropError::Config("no home".to_string()),
        CropError::Detector("exit 1".to_string()),
        CropError::DetectorTimeout(120),
        CropError::Metadata("truncated".to_string()),
        CropError::UnsupportedFormat("Png".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "empty message: {:?}", err);
    }
}

#[test]
fn test_timeout_message() {
    assert_eq!(
        CropError::DetectorTimeout(30).to_string(),
        "Detector timed out after 30s"
    );
}

#[test]
fn test_rename_error_names_both_paths() {
    let err = CropError::Rename {
        from: PathBuf::from("/crops/ausschnitt_1.jpg"),
        to: PathBuf::from("/crops/anna.jpg"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    };
    let display = err.to_string();
    assert!(display.contains("ausschnitt_1.jpg"));
    assert!(display.contains("anna.jpg"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: CropError = io_err.into();
    assert!(matches!(err, CropError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: CropError = json_err.into();
    assert!(matches!(err, CropError::Json(_)));
}

/// Shared-crate errors pass through transparently
#[test]
fn test_common_error_conversion() {
    let common_err = cropmark_common::Error::Parse("detector printed nothing".to_string());
    let err: CropError = common_err.into();

    assert!(matches!(err, CropError::Common(_)));
    assert_eq!(err.to_string(), "Parse error: detector printed nothing");
}

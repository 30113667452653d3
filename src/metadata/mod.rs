//! Metadata embedding for crop files
//!
//! A JSON record is stored in the EXIF `UserComment` of a JPEG crop. The
//! file is rewritten in place; pixel data and the other marker segments are
//! copied byte for byte, a previous Exif block is replaced.

mod comment;
pub mod jpeg;

use crate::error::{CropError, Result};
use image::ImageFormat;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Embed `record` into the image at `path`.
///
/// The file must decode as a JPEG before anything is written.
pub fn embed(path: &Path, record: &Value) -> Result<()> {
    let bytes = std::fs::read(path)?;

    let format = image::guess_format(&bytes)?;
    if format != ImageFormat::Jpeg {
        return Err(CropError::UnsupportedFormat(format!(
            "{} is {:?}",
            path.display(),
            format
        )));
    }
    image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg)?;

    let text = serde_json::to_string(record)?;
    let tiff = comment::build_tiff(&text)?;
    let updated = jpeg::replace_exif(&bytes, &tiff)?;

    std::fs::write(path, updated)?;
    tracing::debug!("embedded {} bytes of metadata into {}", text.len(), path.display());
    Ok(())
}

/// Read back the record embedded by [`embed`].
///
/// `Ok(None)` when the file has no EXIF block or no UserComment.
pub fn read_comment(path: &Path) -> Result<Option<Value>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let data = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(data) => data,
        Err(exif::Error::NotFound(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    match comment::user_comment(&data)? {
        Some(text) if !text.is_empty() => Ok(Some(serde_json::from_str(&text)?)),
        _ => Ok(None),
    }
}

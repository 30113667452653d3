use crate::error::{CropError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Corrected/rotated copy the detector writes next to the input images
pub const SCRATCH_FILE_NAME: &str = "temp_corrected.jpg";

/// Files making up one batch run
#[derive(Debug, Clone, PartialEq)]
pub struct BatchInput {
    /// Images in processing order
    pub files: Vec<PathBuf>,
    /// Directory the detector writes its scratch file into
    pub base_dir: PathBuf,
}

fn is_image_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| is_image_extension(&ext.to_string_lossy()))
        .unwrap_or(false)
}

/// Image files directly inside `folder`, sorted by file name.
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            // The folder itself could not be read
            Err(e) if e.depth() == 0 => {
                return Err(CropError::InvalidPath(format!("{}: {}", folder.display(), e)));
            }
            Err(e) => {
                tracing::warn!("skipping unreadable entry in {}: {}", folder.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if path.is_file() && is_image_path(path) {
            images.push(path.to_path_buf());
        }
    }

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(images)
}

/// Sorted image file names in `folder`, for browsing.
pub fn list_images(folder: &Path) -> Result<Vec<String>> {
    if !folder.is_dir() {
        return Err(CropError::InvalidPath(folder.display().to_string()));
    }

    Ok(scan_folder(folder)?
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .collect())
}

/// Turn the user's input path into the list of images to process.
///
/// A directory yields its images (non-recursive), a file yields itself. Anything else, including a path that cannot
/// be stat'ed, is an `InvalidPath`.
pub fn resolve_input(input: &Path) -> Result<BatchInput> {
    let metadata = std::fs::metadata(input)
        .map_err(|e| CropError::InvalidPath(format!("{}: {}", input.display(), e)))?;

    if metadata.is_dir() {
        return Ok(BatchInput {
            files: scan_folder(input)?,
            base_dir: input.to_path_buf(),
        });
    }

    if metadata.is_file() {
        let base_dir = input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        return Ok(BatchInput {
            files: vec![input.to_path_buf()],
            base_dir,
        });
    }

    Err(CropError::InvalidPath(input.display().to_string()))
}

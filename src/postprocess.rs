//! Per-rectangle post-processing
//!
//! For every crop the detector reports:
//! 1. embed the decoded QR payload (or `{}`) into the crop's EXIF
//! 2. rename the crop after the payload's name fields, probing `_1`, `_2`, …
//!    until a free name is found
//!
//! Failures are logged and returned as [`RectIssue`]s; the rect keeps its
//! last known path and name and processing continues.

use crate::error::{CropError, Result};
use crate::metadata;
use cropmark_common::{candidate_stem, with_suffix, Rect};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

const FALLBACK_EXTENSION: &str = "jpg";

/// Why part of a rect's post-processing was skipped
#[derive(Debug, Clone, PartialEq)]
pub enum RectIssue {
    /// `crop_path` empty or not on disk
    MissingCrop(PathBuf),
    EmbedFailed(String),
    RenameFailed(String),
}

impl fmt::Display for RectIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RectIssue::MissingCrop(path) if path.as_os_str().is_empty() => {
                write!(f, "no crop file reported")
            }
            RectIssue::MissingCrop(path) => write!(f, "crop file missing: {}", path.display()),
            RectIssue::EmbedFailed(e) => write!(f, "metadata not embedded: {}", e),
            RectIssue::RenameFailed(e) => write!(f, "not renamed: {}", e),
        }
    }
}

/// A rect after post-processing, with whatever went wrong on the way
#[derive(Debug, Clone, PartialEq)]
pub struct PostProcessed {
    pub rect: Rect,
    pub issues: Vec<RectIssue>,
}

impl PostProcessed {
    fn clean(rect: Rect) -> Self {
        Self {
            rect,
            issues: Vec::new(),
        }
    }
}

/// Embed metadata into a rect's crop and rename it.
///
/// Never fails; see [`RectIssue`].
pub fn post_process(mut rect: Rect) -> PostProcessed {
    if !rect.has_crop() || !rect.crop_path.is_file() {
        tracing::debug!("rect {:?}: no crop on disk, skipping", rect.name);
        let issue = RectIssue::MissingCrop(rect.crop_path.clone());
        return PostProcessed {
            rect,
            issues: vec![issue],
        };
    }

    let mut result = PostProcessed::clean(rect.clone());

    let record = rect
        .qr_data
        .as_ref()
        .map(|m| m.to_record())
        .unwrap_or_else(|| Value::Object(Map::new()));

    if let Err(e) = metadata::embed(&rect.crop_path, &record) {
        tracing::warn!("cannot embed metadata into {}: {}", rect.crop_path.display(), e);
        result.issues.push(RectIssue::EmbedFailed(e.to_string()));
    }

    let Some(stem) = rect.qr_data.as_ref().and_then(candidate_stem) else {
        return result;
    };

    match rename_crop(&rect.crop_path, &stem) {
        Ok(Some(new_path)) => {
            tracing::info!("{} -> {}", rect.crop_path.display(), new_path.display());
            rect.name = new_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            rect.crop_path = new_path;
            result.rect = rect;
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!("{}", e);
            result.issues.push(RectIssue::RenameFailed(e.to_string()));
        }
    }

    result
}

fn occupied(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

/// First free `stem[_n].ext` in `dir`.
///
/// `current` counts as free so a crop that already carries its name keeps
/// it instead of moving to `_1`.
pub fn resolve_free_name(dir: &Path, stem: &str, ext: &str, current: &Path) -> PathBuf {
    let mut n = 0;
    loop {
        let candidate = dir.join(with_suffix(stem, n, ext));
        if candidate == current || !occupied(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Move `crop` to the first free name for `stem` in its directory.
///
/// `Ok(None)` when the crop already has that name.
pub fn rename_crop(crop: &Path, stem: &str) -> Result<Option<PathBuf>> {
    let dir = crop.parent().unwrap_or_else(|| Path::new(""));
    let ext = crop
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

    let target = resolve_free_name(dir, stem, &ext, crop);
    if target == crop {
        return Ok(None);
    }

    std::fs::rename(crop, &target).map_err(|source| CropError::Rename {
        from: crop.to_path_buf(),
        to: target.clone(),
        source,
    })?;

    Ok(Some(target))
}

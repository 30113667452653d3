//! Batch orchestration
//!
//! Resolves the input path, runs [`process_image`] over every image one
//! after the other, flattens the rects and removes the detector's shared
//! scratch file afterwards.
//!
//! Images are never processed concurrently: the detector writes the same
//! scratch file for every image of a directory, and crop renames probe for
//! free names in shared directories.

use crate::detector::Detector;
use crate::error::Result;
use crate::processor::process_image;
use crate::scanner;
use cropmark_common::{
    AnalyzeOptions, AnalyzeResponse, BatchResult, DetectionResult, ImageFailure, SkipRecord,
};
use std::path::Path;

pub use crate::scanner::SCRATCH_FILE_NAME;

/// Reported before each image is processed
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    /// Zero-based
    pub index: usize,
    pub total: usize,
    pub image: &'a Path,
}

/// Entry point for callers: a batch result, or `{ "error": ... }` when the
/// input path cannot be resolved.
pub async fn analyze<D: Detector>(
    detector: &D,
    input: &Path,
    options: &AnalyzeOptions,
) -> AnalyzeResponse {
    analyze_with_progress(detector, input, options, |_| {}).await
}

/// [`analyze`] with a callback before each image
pub async fn analyze_with_progress<D, F>(
    detector: &D,
    input: &Path,
    options: &AnalyzeOptions,
    on_image: F,
) -> AnalyzeResponse
where
    D: Detector,
    F: FnMut(BatchProgress<'_>),
{
    match run_batch_with_progress(detector, input, options, on_image).await {
        Ok(batch) => AnalyzeResponse::Batch(batch),
        Err(e) => {
            tracing::error!("{}", e);
            AnalyzeResponse::Error {
                error: e.to_string(),
            }
        }
    }
}

pub async fn run_batch<D: Detector>(
    detector: &D,
    input: &Path,
    options: &AnalyzeOptions,
) -> Result<BatchResult> {
    run_batch_with_progress(detector, input, options, |_| {}).await
}

/// Process one file or every image in a directory.
///
/// Only an unresolvable input path fails. A failing image is logged,
/// recorded in `failed` and skipped; there are no retries.
pub async fn run_batch_with_progress<D, F>(
    detector: &D,
    input: &Path,
    options: &AnalyzeOptions,
    mut on_image: F,
) -> Result<BatchResult>
where
    D: Detector,
    F: FnMut(BatchProgress<'_>),
{
    let batch = scanner::resolve_input(input)?;
    let total = batch.files.len();
    tracing::info!("{}: {} image(s) to process", input.display(), total);

    let mut rects = Vec::new();
    let mut last: Option<DetectionResult> = None;
    let mut skipped = Vec::new();
    let mut failed = Vec::new();

    for (index, image) in batch.files.iter().enumerate() {
        on_image(BatchProgress {
            index,
            total,
            image,
        });

        match process_image(detector, image, options).await {
            Ok(outcome) => {
                for (rect, issue) in outcome.issues {
                    skipped.push(SkipRecord {
                        image: image.clone(),
                        rect,
                        reason: issue.to_string(),
                    });
                }
                let mut result = outcome.result;
                rects.append(&mut result.rects);
                last = Some(result);
            }
            Err(e) => {
                tracing::warn!("{}: skipped: {}", image.display(), e);
                failed.push(ImageFailure {
                    image: image.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if total > 1 {
        remove_scratch_file(&batch.base_dir);
    }

    let fallback_image = batch
        .files
        .last()
        .cloned()
        .unwrap_or_else(|| batch.base_dir.clone());

    let mut result = BatchResult {
        display_image: fallback_image,
        rects,
        is_batch: total > 1,
        image_count: total,
        skipped,
        failed,
        ..Default::default()
    };

    if let Some(last) = last {
        if let Some(image) = last.image {
            result.display_image = image;
        }
        result.debug_qrs = last.debug_qrs;
        result.crops_folder = last.crops_folder;
        result.extra = last.extra;
    }

    tracing::info!(
        "done: {} rect(s), {} image(s) failed, {} rect(s) partly skipped",
        result.rects.len(),
        result.failed.len(),
        result.skipped.len()
    );

    Ok(result)
}

/// Delete `dir/temp_corrected.jpg` if present. Failure is only logged.
pub fn remove_scratch_file(dir: &Path) {
    let scratch = dir.join(SCRATCH_FILE_NAME);
    match std::fs::remove_file(&scratch) {
        Ok(()) => tracing::debug!("removed {}", scratch.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("cannot remove {}: {}", scratch.display(), e),
    }
}

//! Single-image processing: detector run + post-processing of its rects

use crate::detector::{Detector, DetectorFlag};
use crate::error::Result;
use crate::postprocess::{post_process, RectIssue};
use cropmark_common::{parse_detector_output, AnalyzeOptions, DetectionResult};
use std::path::Path;

/// A processed image: the detector's result with post-processed rects
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOutcome {
    pub result: DetectionResult,
    /// `(rect name, issue)` for every rect that was only partly handled
    pub issues: Vec<(String, RectIssue)>,
}

/// Run the detector on one image and post-process every rect it reports.
///
/// Detector failures and unparseable output fail the whole image. Rect
/// problems never do; they end up in [`ImageOutcome::issues`]. Rects are
/// handled one after the other, in the order the detector listed them.
pub async fn process_image<D: Detector>(
    detector: &D,
    image_path: &Path,
    options: &AnalyzeOptions,
) -> Result<ImageOutcome> {
    let flags = DetectorFlag::from_options(options);
    let stdout = detector.detect(image_path, &flags).await?;

    let mut result = parse_detector_output(&stdout)?;
    tracing::info!("{}: {} rect(s)", image_path.display(), result.rects.len());

    let mut issues = Vec::new();
    let rects = std::mem::take(&mut result.rects);
    for rect in rects {
        let processed = post_process(rect);
        for issue in processed.issues {
            issues.push((processed.rect.name.clone(), issue));
        }
        result.rects.push(processed.rect);
    }

    Ok(ImageOutcome { result, issues })
}

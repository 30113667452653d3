//! Detector output parser
//!
//! The detector prints one JSON line on stdout. Anything after the first
//! non-empty line (progress chatter, library warnings) is ignored.

use crate::error::{Error, Result};
use crate::types::DetectionResult;

/// First non-empty line of the detector's stdout
///
/// # Examples
/// ```
/// use cropmark_common::first_line;
///
/// assert_eq!(first_line("\n{\"rects\": []}\nwarning\n"), Some("{\"rects\": []}"));
/// assert_eq!(first_line("  \n"), None);
/// ```
// Leading blank lines are skipped: some interpreters print an empty line
// before the script's own output, and that is not the detector's answer.
pub fn first_line(stdout: &str) -> Option<&str> {
    stdout.lines().map(str::trim).find(|line| !line.is_empty())
}

/// Parse detector stdout into a DetectionResult
///
/// A detector that caught its own failure prints `{"error": "..."}`; that is
/// reported as `Error::Parse` just like malformed output.
pub fn parse_detector_output(stdout: &str) -> Result<DetectionResult> {
    let line = first_line(stdout).ok_or_else(|| Error::Parse("detector printed nothing".into()))?;

    let result: DetectionResult = serde_json::from_str(line)
        .map_err(|e| Error::Parse(format!("detector output is not valid JSON: {}", e)))?;

    if let Some(message) = &result.error {
        return Err(Error::Parse(format!("detector reported: {}", message)));
    }

    Ok(result)
}

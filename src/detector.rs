//! External detector invocation
//!
//! The detector is a separate process (a Python/OpenCV script by default).
//! It gets the image path plus optional flags as positional arguments,
//! writes the crops itself and prints one JSON line describing them.

use crate::config::Config;
use crate::error::{CropError, Result};
use cropmark_common::AnalyzeOptions;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Positional flags understood by the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorFlag {
    Debug,
    SaveCrops,
}

impl DetectorFlag {
    pub fn as_arg(&self) -> &'static str {
        match self {
            DetectorFlag::Debug => "DEBUG",
            DetectorFlag::SaveCrops => "SAVE_CROPS",
        }
    }

    /// Flags for a run, in argument order
    pub fn from_options(options: &AnalyzeOptions) -> Vec<DetectorFlag> {
        let mut flags = Vec::new();
        if options.is_debug {
            flags.push(DetectorFlag::Debug);
        }
        if options.save_debug_crops {
            flags.push(DetectorFlag::SaveCrops);
        }
        flags
    }
}

/// Anything that can analyze one image and report its raw stdout
#[allow(async_fn_in_trait)]
pub trait Detector {
    async fn detect(&self, image: &Path, flags: &[DetectorFlag]) -> Result<String>;
}

/// Runs the detector as a child process
#[derive(Debug, Clone)]
pub struct ProcessDetector {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessDetector {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// `python detector.py <image> [flags]`
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.python_path.clone(),
            vec![config.detector_script.display().to_string()],
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

impl Detector for ProcessDetector {
    async fn detect(&self, image: &Path, flags: &[DetectorFlag]) -> Result<String> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(image)
            .args(flags.iter().map(DetectorFlag::as_arg))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        tracing::debug!("running detector: {:?}", command.as_std());

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| CropError::DetectorTimeout(self.timeout.as_secs()))?
            .map_err(|e| CropError::Detector(format!("cannot start {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CropError::Detector(format!(
                "exited with code {:?}: {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_from_options() {
        assert!(DetectorFlag::from_options(&AnalyzeOptions::default()).is_empty());

        let both = AnalyzeOptions {
            is_debug: true,
            save_debug_crops: true,
        };
        let args: Vec<&str> = DetectorFlag::from_options(&both)
            .iter()
            .map(DetectorFlag::as_arg)
            .collect();
        assert_eq!(args, vec!["DEBUG", "SAVE_CROPS"]);

        let crops_only = AnalyzeOptions {
            save_debug_crops: true,
            ..Default::default()
        };
        assert_eq!(
            DetectorFlag::from_options(&crops_only),
            vec![DetectorFlag::SaveCrops]
        );
    }

    #[test]
    fn test_from_config() {
        let config = Config::default();
        let detector = ProcessDetector::from_config(&config);
        assert_eq!(detector.program, "python");
        assert_eq!(detector.args, vec!["detector.py".to_string()]);
        assert_eq!(detector.timeout, Duration::from_secs(120));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_detector_passes_arguments() {
        let detector = ProcessDetector::new(
            "sh",
            vec!["-c".into(), r#"echo "$1|$2|$3""#.into(), "detector".into()],
            Duration::from_secs(10),
        );
        let stdout = detector
            .detect(
                Path::new("/tmp/scan.jpg"),
                &[DetectorFlag::Debug, DetectorFlag::SaveCrops],
            )
            .await
            .unwrap();
        assert_eq!(stdout.trim(), "/tmp/scan.jpg|DEBUG|SAVE_CROPS");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_detector_nonzero_exit() {
        let detector = ProcessDetector::new(
            "sh",
            vec!["-c".into(), "echo boom >&2; exit 3".into(), "detector".into()],
            Duration::from_secs(10),
        );
        let err = detector.detect(Path::new("x.jpg"), &[]).await.unwrap_err();
        let message = format!("{}", err);
        assert!(message.contains("Some(3)"), "{}", message);
        assert!(message.contains("boom"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_detector_timeout() {
        let detector = ProcessDetector::new(
            "sh",
            vec!["-c".into(), "sleep 5".into(), "detector".into()],
            Duration::from_millis(100),
        );
        let err = detector.detect(Path::new("x.jpg"), &[]).await.unwrap_err();
        assert!(matches!(err, CropError::DetectorTimeout(_)));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let detector = ProcessDetector::new(
            "cropmark-no-such-detector-binary",
            vec![],
            Duration::from_secs(5),
        );
        let err = detector.detect(Path::new("x.jpg"), &[]).await.unwrap_err();
        assert!(matches!(err, CropError::Detector(_)));
    }
}

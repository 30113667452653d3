//! Shared fixtures: a scripted in-process detector and JPEG helpers

#![allow(dead_code)]

use cropmark::detector::{Detector, DetectorFlag};
use cropmark::error::{CropError, Result};
use image::{ImageBuffer, ImageFormat, Rgb};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub fn write_jpeg(path: &Path) {
    let img = ImageBuffer::from_fn(24, 16, |x, y| Rgb([(x * 10) as u8, (y * 15) as u8, 90]));
    img.save_with_format(path, ImageFormat::Jpeg).unwrap();
}

/// What the fake detector does for one image
#[derive(Clone)]
pub enum Script {
    /// Write one crop per payload (`None` = no QR) and report them
    Crops(Vec<Option<Value>>),
    /// Print this verbatim
    Raw(String),
    /// Fail like a crashed process
    Fail(String),
}

/// Detector stand-in keyed by image file name.
///
/// Crops go to `<image dir>/ausschnitte/<stem>_<n>.jpg`. With
/// `write_scratch` set it also leaves `temp_corrected.jpg` next to the image
/// and reports it as the display image, like the real detector after
/// straightening a sheet.
#[derive(Default)]
pub struct ScriptedDetector {
    scripts: HashMap<String, Script>,
    pub write_scratch: bool,
    pub calls: RefCell<Vec<(PathBuf, Vec<DetectorFlag>)>>,
}

impl ScriptedDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file_name: &str, script: Script) -> Self {
        self.scripts.insert(file_name.to_string(), script);
        self
    }

    pub fn called_files(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }
}

impl Detector for ScriptedDetector {
    async fn detect(&self, image: &Path, flags: &[DetectorFlag]) -> Result<String> {
        self.calls
            .borrow_mut()
            .push((image.to_path_buf(), flags.to_vec()));

        let file_name = image.file_name().unwrap().to_string_lossy().to_string();
        let stem = image.file_stem().unwrap().to_string_lossy().to_string();
        let dir = image.parent().unwrap();

        let script = self
            .scripts
            .get(&file_name)
            .cloned()
            .unwrap_or(Script::Crops(vec![None]));

        let payloads = match script {
            Script::Raw(stdout) => return Ok(stdout),
            Script::Fail(message) => return Err(CropError::Detector(message)),
            Script::Crops(payloads) => payloads,
        };

        let crops_dir = dir.join("ausschnitte");
        std::fs::create_dir_all(&crops_dir).unwrap();

        let rects: Vec<Value> = payloads
            .iter()
            .enumerate()
            .map(|(i, payload)| {
                let name = format!("{}_{}.jpg", stem, i + 1);
                let crop_path = crops_dir.join(&name);
                write_jpeg(&crop_path);
                let mut rect = json!({
                    "x": 10, "y": 10 + 50 * i, "width": 40, "height": 30,
                    "crop_path": crop_path,
                    "name": name,
                });
                if let Some(payload) = payload {
                    rect["qr_data"] = payload.clone();
                }
                rect
            })
            .collect();

        let display = if self.write_scratch {
            let scratch = dir.join(cropmark::batch::SCRATCH_FILE_NAME);
            write_jpeg(&scratch);
            scratch
        } else {
            image.to_path_buf()
        };

        let output = json!({
            "image": display,
            "rects": rects,
            "crops_folder": crops_dir,
            "debug_qrs": [{ "source": file_name }],
        });
        Ok(format!("{}\n", output))
    }
}

/// Payload with the four name fields
pub fn student(given: &str, surname: &str, class: &str, task: &str) -> Value {
    json!({
        "vorname": given,
        "nachname": surname,
        "klasse": class,
        "aufgabe": task,
    })
}

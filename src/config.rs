use crate::error::{CropError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const PYTHON_ENV: &str = "CROPMARK_PYTHON";
const DETECTOR_ENV: &str = "CROPMARK_DETECTOR";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Interpreter used to run the detector script
    pub python_path: String,
    /// Detector script, passed as the interpreter's first argument
    pub detector_script: PathBuf,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            python_path: "python".into(),
            detector_script: PathBuf::from("detector.py"),
            timeout_seconds: 120,
        }
    }
}

impl Config {
    /// File settings with environment overrides applied
    pub fn load() -> Result<Self> {
        Ok(Self::load_file()?.with_env_overrides())
    }

    /// File settings only, defaults when there is no file
    pub fn load_file() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CropError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("cropmark").join("config.json"))
    }

    // Environment wins over the file
    fn with_env_overrides(mut self) -> Self {
        if let Ok(python) = std::env::var(PYTHON_ENV) {
            self.python_path = python;
        }
        if let Ok(script) = std::env::var(DETECTOR_ENV) {
            self.detector_script = PathBuf::from(script);
        }
        self
    }
}

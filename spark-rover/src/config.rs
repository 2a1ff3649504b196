use crate::control::command::MAX_MAGNITUDE;
use crate::control::transport::LinkTarget;
use crate::detect::property::color::{ColorCategory, ColorReferenceSet};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub width: u32,
    pub height: u32,
    /// Directory of still frames played back as the camera.
    pub frames_dir: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            width: 640,
            height: 480,
            frames_dir: PathBuf::from("data/frames"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub interval_ms: u64,
    pub stop_duration_ms: u64,
    pub cruise_speed: u8,
    /// cm
    pub safe_distance: u32,
    /// Accepted and reported, no detector reads it.
    pub line_threshold: u8,
    pub selected_colors: Vec<ColorCategory>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            interval_ms: 100,
            stop_duration_ms: 2000,
            cruise_speed: 50,
            safe_distance: 20,
            line_threshold: 50,
            selected_colors: vec![ColorCategory::White],
        }
    }
}

impl DetectionConfig {
    pub fn colors(&self) -> ColorReferenceSet {
        self.selected_colors.iter().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoverConfig {
    pub capture: CaptureConfig,
    pub detection: DetectionConfig,
    pub manual_speed: u8,
    pub link: LinkTarget,
    pub server: ServerConfig,
    /// When set, every analysed frame is written here with its overlay.
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for RoverConfig {
    fn default() -> Self {
        RoverConfig {
            capture: CaptureConfig::default(),
            detection: DetectionConfig::default(),
            manual_speed: 50,
            link: LinkTarget::default(),
            server: ServerConfig::default(),
            snapshot_dir: None,
        }
    }
}

impl RoverConfig {
    /// Load and validate a JSON config. A missing file yields the defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config: RoverConfig = match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Config {} not found, using defaults", path.display());
                RoverConfig::default()
            }
            Err(e) => return Err(e.into()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "frame size {}x{} must be non-zero",
                self.capture.width, self.capture.height
            )));
        }
        if self.detection.interval_ms == 0 {
            return Err(ConfigError::Invalid("detection interval must be non-zero".to_string()));
        }
        for (name, speed) in [
            ("cruise_speed", self.detection.cruise_speed),
            ("manual_speed", self.manual_speed),
        ] {
            if speed > MAX_MAGNITUDE {
                return Err(ConfigError::Invalid(format!("{name} {speed} exceeds {MAX_MAGNITUDE}")));
            }
        }
        Ok(())
    }
}

/// Runtime adjustments from the control surface. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    pub selected_colors: Option<Vec<ColorCategory>>,
    pub line_threshold: Option<u8>,
    pub safe_distance: Option<u32>,
    /// Clamped to 0..=100 when applied.
    pub manual_speed: Option<u32>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self == &ConfigUpdate::default()
    }
}

use serde::{Deserialize, Serialize};
use shapescope_detection::{HsvRange, ShapeParams};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub system: SystemConfig,
    pub camera: CameraConfig,
    pub detection: DetectionConfig,
    pub display: DisplayConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SystemConfig {
    pub log_level: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub device_id: u32,
    pub mirror: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    pub color_lower: [u8; 3],
    pub color_upper: [u8; 3],
    pub min_area: f64,
    pub epsilon_factor: f64,
    pub erode_kernel: usize,
    /// Caption shapes with more than six vertices "Triangle".
    pub legacy_labels: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub poll_interval_ms: u64,
    pub show_settings: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            mirror: true,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        let shape = ShapeParams::default();
        Self {
            color_lower: [0, 0, 0],
            color_upper: [0, 0, 0],
            min_area: shape.min_area,
            epsilon_factor: shape.epsilon_factor,
            erode_kernel: 5,
            legacy_labels: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 3,
            show_settings: true,
        }
    }
}

impl DetectionConfig {
    pub fn initial_range(&self) -> HsvRange {
        HsvRange::new(self.color_lower, self.color_upper)
    }

    pub fn shape_params(&self) -> ShapeParams {
        ShapeParams {
            min_area: self.min_area,
            epsilon_factor: self.epsilon_factor,
        }
    }
}

impl Config {
    // Load config from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_file(DEFAULT_CONFIG_PATH)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

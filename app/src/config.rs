//! Application configuration
//!
//! Theme colors and canvas settings, read from a JSON file at startup.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{colors, defaults, files};
use dataflow_engine::NOT_CALCULATED;

/// An RGB color
pub type Rgb = [u8; 3];

/// Colors handed to the canvas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeConfig {
    pub source_button: Rgb,
    pub source_button_hovered: Rgb,
    pub source_button_active: Rgb,
    pub completion_title_bar: Rgb,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            source_button: colors::SOURCE_BUTTON,
            source_button_hovered: colors::SOURCE_BUTTON_HOVERED,
            source_button_active: colors::SOURCE_BUTTON_ACTIVE,
            completion_title_bar: colors::COMPLETION_TITLE_BAR,
        }
    }
}

/// Text canvas settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Shown for attributes that hold no value yet
    pub placeholder: String,
    /// Emit ANSI colors
    pub color: bool,
    /// Print attribute handles
    pub show_ids: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            placeholder: NOT_CALCULATED.to_string(),
            color: defaults::COLOR,
            show_ids: defaults::SHOW_IDS,
        }
    }
}

/// Full application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub theme: ThemeConfig,
    pub canvas: CanvasConfig,
}

impl AppConfig {
    /// Location of the configuration file
    ///
    /// `DATAFLOW_CONFIG` if set, otherwise `dataflow.json` in the working
    /// directory.
    pub fn path() -> PathBuf {
        env::var_os(files::PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(files::DEFAULT_FILE))
    }

    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(ConfigError::Parse)
    }

    /// Load configuration, falling back to the defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                log::info!("Configuration loaded from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("Failed to load config from {:?}, using defaults: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save configuration to `path`
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, contents)?;

        log::info!("Configuration saved to {:?}", path);
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(serde_json::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(serde_json::Error),
}

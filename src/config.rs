/// User settings
///
/// Loaded from a JSON file in the user's config directory:
/// - Linux: ~/.config/flickr-explorer/settings.json
/// - macOS: ~/Library/Application Support/flickr-explorer/settings.json
/// - Windows: %APPDATA%\flickr-explorer\settings.json
///
/// A missing file means defaults. `FLICKR_API_KEY` overrides the stored key.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::search::thumbnail::THUMBNAIL_SIZE;

const API_KEY_ENV: &str = "FLICKR_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Flickr API key
    pub api_key: String,
    /// Photos requested per search (Flickr allows up to 500)
    pub per_page: u32,
    /// Bounding side of stored thumbnails in pixels
    pub thumbnail_size: u32,
    /// Grid columns
    pub items_per_row: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            per_page: 20,
            thumbnail_size: THUMBNAIL_SIZE,
            items_per_row: 3,
        }
    }
}

impl Settings {
    /// Load settings from the default location, then apply the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = match Self::settings_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            settings.apply_api_key(key);
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Get the path where settings are stored
    pub fn settings_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("flickr-explorer");
        path.push("settings.json");
        Some(path)
    }

    /// Read settings from `path`; defaults if the file does not exist
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings = Self::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("📁 Settings loaded from: {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn apply_api_key(&mut self, key: String) {
        let key = key.trim();
        if !key.is_empty() {
            self.api_key = key.to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=500).contains(&self.per_page) {
            return Err(ConfigError::Invalid {
                field: "per_page",
                reason: format!("{} is outside 1..=500", self.per_page),
            });
        }
        if self.items_per_row == 0 {
            return Err(ConfigError::Invalid {
                field: "items_per_row",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.thumbnail_size < 16 {
            return Err(ConfigError::Invalid {
                field: "thumbnail_size",
                reason: format!("{} is smaller than 16", self.thumbnail_size),
            });
        }
        Ok(())
    }
}

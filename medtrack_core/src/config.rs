//! Configuration file support for medtrack.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/medtrack/config.toml`.

use crate::adherence::StatsOptions;
use crate::{Error, Result, WeekStart};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub stats: StatsConfig,

    #[serde(default)]
    pub photos: PhotoConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Statistics configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default)]
    pub week_start: WeekStart,

    #[serde(default = "default_max_streak_lookback_days")]
    pub max_streak_lookback_days: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::default(),
            max_streak_lookback_days: default_max_streak_lookback_days(),
        }
    }
}

impl StatsConfig {
    pub fn options(&self) -> StatsOptions {
        StatsOptions {
            week_start: self.week_start,
            max_streak_lookback_days: self.max_streak_lookback_days,
        }
    }
}

/// Photo proof attachment limits
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PhotoConfig {
    #[serde(default = "default_photo_max_bytes")]
    pub max_bytes: u64,

    #[serde(default = "default_photo_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_photo_max_bytes(),
            allowed_extensions: default_photo_extensions(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("medtrack")
}

fn default_max_streak_lookback_days() -> u32 {
    3650
}

fn default_photo_max_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_photo_extensions() -> Vec<String> {
    vec![
        "jpg".into(),
        "jpeg".into(),
        "png".into(),
        "gif".into(),
        "webp".into(),
        "heic".into(),
    ]
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values that would make the tracker unusable
    pub fn validate(&self) -> Result<()> {
        if self.photos.max_bytes == 0 {
            return Err(Error::Config("photos.max_bytes must be positive".into()));
        }
        if self.photos.allowed_extensions.is_empty() {
            return Err(Error::Config(
                "photos.allowed_extensions must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("medtrack").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

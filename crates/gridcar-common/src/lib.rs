//! Configuration types shared across gridcar crates

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Largest playfield edge in pixels; the player allocates a framebuffer of
/// this size
pub const MAX_PIXEL_EDGE: f32 = 16384.0;

/// Parameters handed to the simulation at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Grid width in tiles
    pub grid_width: u32,
    /// Grid height in tiles
    pub grid_height: u32,
    /// Edge length of one tile in pixels
    pub tile_size: f32,
    /// Target update frequency (Hz)
    pub target_fps: f64,
    /// Number of ticks the car takes to cover one lookahead distance
    pub car_speed: u32,
    /// Distance from the car to its next target, independent of tile size
    pub lookahead: f32,
    /// RNG seed; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_width: 5,
            grid_height: 5,
            tile_size: 150.0,
            target_fps: 120.0,
            car_speed: 30,
            lookahead: 150.0,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Playfield size in pixels
    pub fn pixel_size(&self) -> (f32, f32) {
        (
            self.grid_width as f32 * self.tile_size,
            self.grid_height as f32 * self.tile_size,
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 1x1 tiles, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tile_size must be positive, got {}",
                self.tile_size
            )));
        }
        let (w, h) = self.pixel_size();
        if w > MAX_PIXEL_EDGE || h > MAX_PIXEL_EDGE {
            return Err(ConfigError::Invalid(format!(
                "playfield {}x{} px exceeds {} px per side",
                w, h, MAX_PIXEL_EDGE
            )));
        }
        if !(self.target_fps.is_finite() && self.target_fps > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "target_fps must be positive, got {}",
                self.target_fps
            )));
        }
        if self.car_speed == 0 {
            return Err(ConfigError::Invalid("car_speed must be at least 1".into()));
        }
        if !(self.lookahead.is_finite() && self.lookahead > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "lookahead must be positive, got {}",
                self.lookahead
            )));
        }

        // The car needs room for at least one move along some axis
        if self.lookahead >= w && self.lookahead >= h {
            return Err(ConfigError::Invalid(format!(
                "lookahead {} does not fit a {}x{} px grid",
                self.lookahead, w, h
            )));
        }
        Ok(())
    }
}

/// Image resources for the background texture and the car sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub background: PathBuf,
    pub car: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            background: PathBuf::from("img/background.jpg"),
            car: PathBuf::from("img/car.png"),
        }
    }
}

/// Application-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
    pub sim: SimConfig,
    pub assets: AssetConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            sim: SimConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse a config from TOML text. Missing keys fall back to defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text)?;
        config.sim.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a config file. Relative asset paths are resolved against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text)?;

        if let Some(dir) = path.parent() {
            for asset in [&mut config.assets.background, &mut config.assets.car] {
                if asset.is_relative() {
                    *asset = dir.join(&*asset);
                }
            }
        }

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

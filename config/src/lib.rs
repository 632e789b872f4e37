//! Configuration for Lattice.
//!
//! ```toml
//! [capture]
//! delay_between_capture_ms = 1000
//! vibrate_on_invalid = true
//! invalid_vibrate_ms = 200
//! max_confirmation_attempts = 3
//!
//! [shape]
//! min_points = 4
//! max_points = 9
//! reject_weak = true
//! ```
//!
//! Every section and field is optional. The file lives at
//! `~/.lattice/config.toml` unless `LATTICE_CONFIG` names another path.

mod parameters;

use std::{env, path::Path, path::PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub use parameters::{CaptureParameters, DEFAULT_DELAY_BETWEEN_CAPTURE, DEFAULT_INVALID_VIBRATE};

pub const CONFIG_PATH_ENV: &str = "LATTICE_CONFIG";

// Default value function for serde (bool::default() is false, so only true needs a fn)
pub(crate) const fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatticeConfig {
    pub capture: Option<CaptureConfig>,
    pub shape: Option<ShapeConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// Timing and feedback settings for the capture surface.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaptureConfig {
    /// How long feedback stays on screen before input re-opens. Default: 1000.
    pub delay_between_capture_ms: Option<u64>,
    /// Pulse the haptic motor on rejected input. Default: true.
    #[serde(default = "default_true")]
    pub vibrate_on_invalid: bool,
    /// Pulse length in milliseconds. Default: 200.
    pub invalid_vibrate_ms: Option<u64>,
    /// Consecutive confirmation mismatches before enrollment starts over.
    /// Unset means the first pattern is kept until it is confirmed.
    pub max_confirmation_attempts: Option<u32>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            delay_between_capture_ms: None,
            vibrate_on_invalid: true,
            invalid_vibrate_ms: None,
            max_confirmation_attempts: None,
        }
    }
}

/// Limits enforced by the reference shape check.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapeConfig {
    pub min_points: Option<usize>,
    pub max_points: Option<usize>,
    #[serde(default = "default_true")]
    pub reject_weak: bool,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            min_points: None,
            max_points: None,
            reject_weak: true,
        }
    }
}

impl LatticeConfig {
    /// Load from the default location. `Ok(None)` when no file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        Self::parse(&content).map_err(|err| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, err);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source: err,
            }
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

/// `LATTICE_CONFIG` if set, otherwise `~/.lattice/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    if let Some(raw) = env::var_os(CONFIG_PATH_ENV)
        && !raw.is_empty()
    {
        return Some(PathBuf::from(raw));
    }
    dirs::home_dir().map(|home| home.join(".lattice").join("config.toml"))
}

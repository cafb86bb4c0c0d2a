//! Session settings
//!
//! Read once at session start from a JSON blob. Missing fields fall back to
//! defaults and unknown fields are ignored so older config files keep working.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tuning::Tuning;

/// Failure to read or parse a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Heal the player on a timer regardless of the heal zone
    pub auto_heal: bool,
    /// Seed for the simulation RNG (None = caller picks one)
    pub seed: Option<u64>,
    /// Gameplay balance overrides
    pub tuning: Tuning,
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings = serde_json::from_str(json)?;
        Ok(settings)
    }

    /// Load settings from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded settings from {} (autoHeal={})",
            path.display(),
            settings.auto_heal
        );
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

//! Session settings loaded from an optional TOML file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

/// Failures raised while loading session settings.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}")]
    Read {
        /// Location that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The settings file is not valid TOML for [`Settings`].
    #[error("failed to parse settings")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but lies outside its accepted range.
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Knobs controlling a headless session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) seed: u64,
    pub(crate) starting_level: u32,
    pub(crate) lives: u32,
    pub(crate) max_ticks: u64,
    pub(crate) autopilot: AutopilotSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            starting_level: 1,
            lives: 3,
            max_ticks: 50_000,
            autopilot: AutopilotSettings::default(),
        }
    }
}

/// Behaviour of the scripted stand-in for a human player.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AutopilotSettings {
    /// Chance, in percent, that a key is pressed on any given tick.
    pub(crate) key_chance_percent: u8,
}

impl Default for AutopilotSettings {
    fn default() -> Self {
        Self {
            key_chance_percent: 40,
        }
    }
}

impl Settings {
    /// Reads and validates settings from the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates settings from TOML text. Missing keys keep their defaults.
    pub(crate) fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_level == 0 {
            return Err(ConfigError::Invalid("starting_level must be at least 1".to_owned()));
        }
        if self.lives == 0 {
            return Err(ConfigError::Invalid("lives must be at least 1".to_owned()));
        }
        if self.max_ticks == 0 {
            return Err(ConfigError::Invalid("max_ticks must be at least 1".to_owned()));
        }
        if self.autopilot.key_chance_percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "autopilot.key_chance_percent must not exceed 100, got {}",
                self.autopilot.key_chance_percent
            )));
        }
        Ok(())
    }
}

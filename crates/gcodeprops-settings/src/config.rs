//! Configuration file handling for gcodeprops
//!
//! Supports JSON and TOML file formats stored in the platform config
//! directory. Configuration is organized into logical sections:
//! - Display settings (measurement system for reported properties)
//! - Interpreter settings (parameter file, startup code, machine units)
//! - Estimation settings (rapid rate, arc resolution)

pub use gcodeprops_core::units::MeasurementSystem;
use gcodeprops_core::constants::{DEFAULT_ARC_DIVISION, DEFAULT_MAX_RAPID_RATE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Application directory name under the platform config dir
pub const APP_DIR: &str = "gcodeprops";

/// Default configuration file name
pub const CONFIG_FILE: &str = "config.toml";

/// Display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DisplaySettings {
    /// Units used for every length in the report
    pub measurement_system: MeasurementSystem,
}

/// Interpreter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InterpreterSettings {
    /// Interpreter parameter (variable) file
    pub parameter_file: Option<PathBuf>,
    /// G-code run before every program
    pub startup_code: String,
    /// Units the machine is configured in
    pub machine_units: MeasurementSystem,
}

/// Run time estimation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationSettings {
    /// Traverse rate and feed ceiling, machine units per second
    pub max_rapid_rate: f64,
    /// Arc segments per half turn
    pub arc_division: u32,
}

impl Default for EstimationSettings {
    fn default() -> Self {
        Self {
            max_rapid_rate: DEFAULT_MAX_RAPID_RATE,
            arc_division: DEFAULT_ARC_DIVISION,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Display settings
    pub display: DisplaySettings,
    /// Interpreter settings
    pub interpreter: InterpreterSettings,
    /// Estimation settings
    pub estimation: EstimationSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )
            .into()),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location, `<config dir>/gcodeprops/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| SettingsError::ConfigDirectory("no config or home directory".to_string()))?;
        path.push(APP_DIR);
        path.push(CONFIG_FILE);
        Ok(path)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config at `path`, or the defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let rate = self.estimation.max_rapid_rate;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "estimation.max_rapid_rate".to_string(),
                value: rate.to_string(),
            }
            .into());
        }

        if self.estimation.arc_division == 0 {
            return Err(SettingsError::invalid(
                "estimation.arc_division",
                "must be > 0",
            ));
        }

        if let Some(path) = &self.interpreter.parameter_file {
            if path.as_os_str().is_empty() {
                return Err(SettingsError::invalid(
                    "interpreter.parameter_file",
                    "must not be empty",
                ));
            }
        }

        Ok(())
    }
}

//! gcodeprops Settings Crate
//!
//! Handles the configuration file: display units, interpreter options and
//! run time estimation parameters.

pub mod config;
pub mod error;

pub use config::{
    Config, DisplaySettings, EstimationSettings, InterpreterSettings, MeasurementSystem,
};
pub use error::{ConfigError, SettingsError, SettingsResult};

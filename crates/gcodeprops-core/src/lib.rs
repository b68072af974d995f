//! # gcodeprops Core
//!
//! Core types and utilities shared by the gcodeprops crates.
//! Provides the nine-axis position model, running extents, unit
//! conversion for display and the error taxonomy.

pub mod constants;
pub mod data;
pub mod error;
pub mod units;

pub use data::{Axis, Extents, Plane, Position};

pub use error::{CanonError, Error, ProgramError, Result};

pub use units::{format_duration, MeasurementSystem};

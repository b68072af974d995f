//! Error handling for gcodeprops
//!
//! Provides the error types for every layer of the pipeline:
//! - Canon errors (a single callback could not produce its event)
//! - Program errors (file access, interpreter diagnostics, parameter file)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Per-event error raised while a canon callback computes its event.
///
/// These never abort accumulation: the accumulator logs them and drops the
/// event that produced them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanonError {
    /// A coordinate was NaN or infinite
    #[error("Non-finite {axis} coordinate {value} at line {line_number}")]
    NonFiniteCoordinate {
        /// Source line being processed.
        line_number: i64,
        /// Axis letter.
        axis: char,
        /// Offending value.
        value: f64,
    },

    /// The arc could not be split into segments
    #[error("Arc segmentation failed at line {line_number}: {reason}")]
    ArcSegmentation {
        /// Source line being processed.
        line_number: i64,
        /// Why segmentation failed.
        reason: String,
    },

    /// A dwell with a negative or non-finite duration
    #[error("Invalid dwell of {seconds}s at line {line_number}")]
    InvalidDwell {
        /// Source line being processed.
        line_number: i64,
        /// Requested duration.
        seconds: f64,
    },

    /// An arc callback arrived while another arc was still being folded
    #[error("Nested arc at line {line_number}")]
    NestedArc {
        /// Source line being processed.
        line_number: i64,
    },
}

/// Program-level error type
///
/// Represents errors related to loading a program and running the external
/// interpreter over it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProgramError {
    /// Program file does not exist
    #[error("Program file not found: {path}")]
    FileNotFound {
        /// The path that was requested.
        path: String,
    },

    /// Program file exists but cannot be read
    #[error("Program file unreadable: {path}: {reason}")]
    Unreadable {
        /// The path that was requested.
        path: String,
        /// The underlying failure.
        reason: String,
    },

    /// The interpreter reported an error
    #[error("Interpreter error in {path} line {line_number}: {message}")]
    Interpreter {
        /// The program being interpreted.
        path: String,
        /// The last line the interpreter processed.
        line_number: i64,
        /// The interpreter's message.
        message: String,
    },

    /// The parameter file could not be duplicated or cleaned up
    #[error("Parameter file error on {path}: {reason}")]
    ParameterFile {
        /// The file involved.
        path: String,
        /// The underlying failure.
        reason: String,
    },
}

/// Main error type for gcodeprops
#[derive(Error, Debug)]
pub enum Error {
    /// Canon error
    #[error(transparent)]
    Canon(#[from] CanonError),

    /// Program error
    #[error(transparent)]
    Program(#[from] ProgramError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a program error
    pub fn is_program_error(&self) -> bool {
        matches!(self, Error::Program(_))
    }

    /// Check if this error means no program file was available
    pub fn is_missing_file(&self) -> bool {
        matches!(
            self,
            Error::Program(ProgramError::FileNotFound { .. })
                | Error::Program(ProgramError::Unreadable { .. })
        )
    }
}

/// Result type alias using the gcodeprops Error type
pub type Result<T> = std::result::Result<T, Error>;

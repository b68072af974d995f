//! Program loader
//!
//! Runs an external [`Interpreter`] over a program file, records the canon
//! callbacks into a fresh [`ProgramAccumulator`] and computes the program's
//! properties.
//!
//! The interpreter works on a temporary copy of the parameter file
//! (`<parameter_file>.temp`) so the live file is never modified; the copy and
//! its `.bak` companion are removed after every load.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use gcodeprops_core::constants::{DEFAULT_ARC_DIVISION, DEFAULT_MAX_RAPID_RATE};
use gcodeprops_core::{MeasurementSystem, ProgramError, Result};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::accumulator::ProgramAccumulator;
use crate::cancel::CancelToken;
use crate::canon::Canon;
use crate::program::RecordedProgram;
use crate::properties::{FileInfo, ProgramProperties, PropertyAggregator};

/// Diagnostic raised by an interpreter; interpretation stops at `line_number`
#[derive(Error, Debug, Clone, PartialEq)]
#[error("line {line_number}: {message}")]
pub struct InterpreterError {
    pub line_number: i64,
    pub message: String,
}

impl InterpreterError {
    pub fn new(line_number: i64, message: impl Into<String>) -> Self {
        Self {
            line_number,
            message: message.into(),
        }
    }
}

/// Inputs for one interpreter run
#[derive(Debug, Clone, Copy)]
pub struct InterpretRequest<'a> {
    pub program: &'a Path,
    /// Scratch copy of the parameter file, if one is configured
    pub parameter_file: Option<&'a Path>,
    /// `G20` or `G21`
    pub unit_code: &'a str,
    /// Extra startup code run before the program
    pub init_code: &'a str,
}

/// What an interpreter reports after a clean run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterpretSummary {
    /// Last sequence number processed
    pub last_line: i64,
    /// Number of canon callbacks made
    pub calls: u64,
}

/// G-code interpreter driving a [`Canon`] implementation.
///
/// Callbacks must be made synchronously and in source-line order. An
/// interpreter should poll [`Canon::should_stop`] between callbacks and
/// return early once it is true.
pub trait Interpreter {
    fn interpret(
        &mut self,
        request: &InterpretRequest<'_>,
        canon: &mut dyn Canon,
    ) -> std::result::Result<InterpretSummary, InterpreterError>;
}

/// Loader configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderSettings {
    /// Interpreter parameter (variable) file
    pub parameter_file: Option<PathBuf>,
    pub startup_code: String,
    /// Units the machine is configured in; selects `G20`/`G21`
    pub machine_units: MeasurementSystem,
    /// Units for reported properties
    pub display_units: MeasurementSystem,
    pub arc_division: u32,
    /// Units per second
    pub max_rapid_rate: f64,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            parameter_file: None,
            startup_code: String::new(),
            machine_units: MeasurementSystem::Metric,
            display_units: MeasurementSystem::Metric,
            arc_division: DEFAULT_ARC_DIVISION,
            max_rapid_rate: DEFAULT_MAX_RAPID_RATE,
        }
    }
}

impl LoaderSettings {
    /// Unit selection code matching the machine units
    pub fn unit_code(&self) -> &'static str {
        match self.machine_units {
            MeasurementSystem::Metric => "G21",
            MeasurementSystem::Imperial => "G20",
        }
    }
}

/// Result of the most recent successful load
#[derive(Debug, Clone)]
pub struct LoadedProgram {
    pub path: PathBuf,
    pub program: RecordedProgram,
    pub properties: ProgramProperties,
    /// Set when the interpreter stopped on an error; `program` holds
    /// everything recorded up to that point
    pub interpreter_error: Option<ProgramError>,
}

/// Loads programs one at a time through an interpreter
#[derive(Debug)]
pub struct ProgramLoader<I> {
    interpreter: I,
    settings: LoaderSettings,
    current: Option<LoadedProgram>,
    cancel: CancelToken,
}

impl<I: Interpreter> ProgramLoader<I> {
    pub fn new(interpreter: I, settings: LoaderSettings) -> Self {
        Self {
            interpreter,
            settings,
            current: None,
            cancel: CancelToken::new(),
        }
    }

    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    pub fn interpreter_mut(&mut self) -> &mut I {
        &mut self.interpreter
    }

    /// Most recently loaded program, if any
    pub fn current(&self) -> Option<&LoadedProgram> {
        self.current.as_ref()
    }

    /// Properties of the current program, or the "No file loaded" defaults
    pub fn properties(&self) -> ProgramProperties {
        match &self.current {
            Some(loaded) => loaded.properties.clone(),
            None => ProgramProperties::no_file(self.settings.display_units),
        }
    }

    /// Token that cancels the next (or running) load.
    ///
    /// A fresh token is armed after every load, so a token only ever affects
    /// one load.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Forget the current program
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Interpret `path` and replace the current program with the result
    ///
    /// # Arguments
    /// * `path` - Program file handed to the interpreter
    ///
    /// # Errors
    /// Returns [`ProgramError::FileNotFound`] or [`ProgramError::Unreadable`]
    /// without running the interpreter when the file cannot be accessed; the
    /// current program is cleared in that case. Interpreter diagnostics are
    /// not errors: they are logged and kept on [`LoadedProgram`].
    pub fn load(&mut self, path: &Path) -> Result<&LoadedProgram> {
        let file = match check_program_file(path) {
            Ok(file) => file,
            Err(e) => {
                self.current = None;
                return Err(e.into());
            }
        };

        let staged = self.settings.parameter_file.as_deref().map(stage_parameter_file);
        let request = InterpretRequest {
            program: path,
            parameter_file: staged.as_deref(),
            unit_code: self.settings.unit_code(),
            init_code: &self.settings.startup_code,
        };

        let mut accumulator = ProgramAccumulator::new()
            .with_arc_division(self.settings.arc_division)
            .with_cancel_token(self.cancel.clone());

        debug!("Interpreting {} with {}", path.display(), request.unit_code);
        let interpreter_error = match self.interpreter.interpret(&request, &mut accumulator) {
            Ok(summary) => {
                debug!(
                    "Interpreter finished at line {} after {} calls",
                    summary.last_line, summary.calls
                );
                None
            }
            Err(e) => {
                warn!(
                    "Error in {} line {}: {}",
                    path.display(),
                    e.line_number,
                    e.message
                );
                Some(ProgramError::Interpreter {
                    path: path.display().to_string(),
                    line_number: e.line_number,
                    message: e.message,
                })
            }
        };

        if let Some(temp) = &staged {
            remove_scratch_files(temp);
        }

        let program = accumulator.into_program();
        let properties = PropertyAggregator::new(self.settings.display_units)
            .with_max_rapid_rate(self.settings.max_rapid_rate)
            .compute(&program, &file);
        info!(
            "Loaded {}: {} lines, {} events, {} tool calls",
            file.name,
            properties.line_count,
            program.events().len(),
            properties.tool_call_count
        );
        if program.stopped() {
            info!("Interpretation of {} stopped early", file.name);
        }

        self.cancel = CancelToken::new();
        Ok(self.current.insert(LoadedProgram {
            path: path.to_path_buf(),
            program,
            properties,
            interpreter_error,
        }))
    }
}

fn check_program_file(path: &Path) -> std::result::Result<FileInfo, ProgramError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(ProgramError::FileNotFound { path: display });
    }
    if !path.is_file() {
        return Err(ProgramError::Unreadable {
            path: display,
            reason: "not a regular file".to_string(),
        });
    }
    FileInfo::from_path(path).map_err(|e| ProgramError::Unreadable {
        path: display,
        reason: e.to_string(),
    })
}

/// `<path>.temp`
pub fn scratch_parameter_path(parameter_file: &Path) -> PathBuf {
    with_suffix(parameter_file, ".temp")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Copy the parameter file to its scratch path; the scratch path is used even
/// when there is nothing to copy
fn stage_parameter_file(parameter_file: &Path) -> PathBuf {
    let temp = scratch_parameter_path(parameter_file);
    if parameter_file.exists() {
        if let Err(e) = fs::copy(parameter_file, &temp) {
            let err = ProgramError::ParameterFile {
                path: parameter_file.display().to_string(),
                reason: e.to_string(),
            };
            warn!("{}", err);
        }
    } else {
        debug!("No parameter file at {}", parameter_file.display());
    }
    temp
}

fn remove_scratch_files(temp: &Path) {
    for file in [temp.to_path_buf(), with_suffix(temp, ".bak")] {
        match fs::remove_file(&file) {
            Ok(()) => debug!("Removed {}", file.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No {} to remove", file.display())
            }
            Err(e) => {
                let err = ProgramError::ParameterFile {
                    path: file.display().to_string(),
                    reason: e.to_string(),
                };
                warn!("Cleanup failed: {}", err);
            }
        }
    }
}

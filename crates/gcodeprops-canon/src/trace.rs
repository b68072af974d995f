//! Canon trace replay
//!
//! A trace is a JSON-lines recording of the callbacks an interpreter made
//! for a program, one [`CanonCall`] per line:
//!
//! ```text
//! # comments and blank lines are skipped
//! {"call":"next_line","sequence_number":1}
//! {"call":"straight_feed","target":[10,0,0,0,0,0,0,0,0]}
//! ```
//!
//! [`TraceInterpreter`] replays such a recording into any [`Canon`], which
//! lets the rest of the pipeline run without a G-code parser.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use gcodeprops_core::{Plane, Position};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canon::{ArcSpec, Canon, InterpreterState};
use crate::loader::{InterpretRequest, InterpretSummary, Interpreter, InterpreterError};

/// One recorded canon callback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum CanonCall {
    StraightTraverse { target: Position },
    StraightFeed { target: Position },
    ArcFeed(ArcSpec),
    RigidTap { x: f64, y: f64, z: f64 },
    Dwell { seconds: f64 },
    ChangeTool { pocket: i32 },
    NextLine(InterpreterState),
    SetPlane { plane: Plane },
    SetFeedRate { rate: f64 },
    SetG5xOffset { index: i32, offset: Position },
    SetG92Offset { offset: Position },
    SetXyRotation { degrees: f64 },
    ToolOffset { offset: Position },
    Comment { text: String },
    /// The interpreter gave up at this point
    Error { line_number: i64, message: String },
}

impl CanonCall {
    /// Deliver this call to `canon`
    ///
    /// # Errors
    /// Returns the recorded diagnostic for [`CanonCall::Error`]
    pub fn apply(&self, canon: &mut dyn Canon) -> Result<(), InterpreterError> {
        match self {
            Self::StraightTraverse { target } => canon.straight_traverse(*target),
            Self::StraightFeed { target } => canon.straight_feed(*target),
            Self::ArcFeed(arc) => canon.arc_feed(arc),
            Self::RigidTap { x, y, z } => canon.rigid_tap(*x, *y, *z),
            Self::Dwell { seconds } => canon.dwell(*seconds),
            Self::ChangeTool { pocket } => canon.change_tool(*pocket),
            Self::NextLine(state) => canon.next_line(state),
            Self::SetPlane { plane } => canon.set_plane(*plane),
            Self::SetFeedRate { rate } => canon.set_feed_rate(*rate),
            Self::SetG5xOffset { index, offset } => canon.set_g5x_offset(*index, *offset),
            Self::SetG92Offset { offset } => canon.set_g92_offset(*offset),
            Self::SetXyRotation { degrees } => canon.set_xy_rotation(*degrees),
            Self::ToolOffset { offset } => canon.tool_offset(*offset),
            Self::Comment { text } => canon.comment(text),
            Self::Error {
                line_number,
                message,
            } => return Err(InterpreterError::new(*line_number, message.clone())),
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum TraceSource {
    File(PathBuf),
    Calls(Vec<CanonCall>),
}

/// [`Interpreter`] that replays a recorded trace instead of parsing G-code
#[derive(Debug, Clone)]
pub struct TraceInterpreter {
    source: TraceSource,
}

impl TraceInterpreter {
    /// Replay the JSON-lines trace at `path` (read on every run)
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self {
            source: TraceSource::File(path.as_ref().to_path_buf()),
        }
    }

    pub fn from_calls(calls: Vec<CanonCall>) -> Self {
        Self {
            source: TraceSource::Calls(calls),
        }
    }
}

/// Counts calls and tracks the last line while replaying
#[derive(Default)]
struct Replay {
    summary: InterpretSummary,
}

impl Replay {
    /// Returns `false` once the canon asks to stop
    fn step(&mut self, call: &CanonCall, canon: &mut dyn Canon) -> Result<bool, InterpreterError> {
        if canon.should_stop() {
            debug!("Replay stopped after {} calls", self.summary.calls);
            return Ok(false);
        }
        if let CanonCall::NextLine(state) = call {
            self.summary.last_line = state.sequence_number;
        }
        call.apply(canon)?;
        self.summary.calls += 1;
        Ok(true)
    }
}

impl Interpreter for TraceInterpreter {
    fn interpret(
        &mut self,
        request: &InterpretRequest<'_>,
        canon: &mut dyn Canon,
    ) -> Result<InterpretSummary, InterpreterError> {
        debug!(
            "Replaying trace for {} ({})",
            request.program.display(),
            request.unit_code
        );
        let mut replay = Replay::default();
        match &self.source {
            TraceSource::Calls(calls) => {
                for call in calls {
                    if !replay.step(call, canon)? {
                        break;
                    }
                }
            }
            TraceSource::File(path) => {
                let file = File::open(path).map_err(|e| {
                    InterpreterError::new(0, format!("cannot open trace {}: {}", path.display(), e))
                })?;
                for (index, line) in BufReader::new(file).lines().enumerate() {
                    let record = index as i64 + 1;
                    let line = line.map_err(|e| {
                        InterpreterError::new(replay.summary.last_line, e.to_string())
                    })?;
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    let call: CanonCall = serde_json::from_str(line).map_err(|e| {
                        InterpreterError::new(
                            replay.summary.last_line,
                            format!("invalid trace record {}: {}", record, e),
                        )
                    })?;
                    if !replay.step(&call, canon)? {
                        break;
                    }
                }
            }
        }
        Ok(replay.summary)
    }
}

//! Canon callback protocol
//!
//! An external G-code interpreter decodes a program and reports every motion
//! primitive and modal change through the [`Canon`] trait, synchronously and
//! in source-line order.

use gcodeprops_core::{Plane, Position};
use serde::{Deserialize, Serialize};

/// Arc primitive as reported by the interpreter, in program coordinates.
///
/// `first`/`second` are the two in-plane axes of the active plane and
/// `axial` the axis normal to it (see [`Plane::axes`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSpec {
    pub end_first: f64,
    pub end_second: f64,
    pub center_first: f64,
    pub center_second: f64,
    /// Winding: negative is clockwise, positive counter-clockwise;
    /// `|rotation| > 1` adds full turns.
    pub rotation: i32,
    pub end_axial: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

/// Snapshot of interpreter modal state handed over with every new line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InterpreterState {
    pub sequence_number: i64,
    pub motion_mode: i32,
    pub plane: i32,
    pub feed_rate: f64,
    pub tool_length_offset: Position,
    pub toolchange: i32,
    pub gcodes: Vec<i32>,
    pub mcodes: Vec<i32>,
}

impl InterpreterState {
    pub fn at_line(sequence_number: i64) -> Self {
        Self {
            sequence_number,
            ..Self::default()
        }
    }
}

/// Callback interface invoked by an external interpreter.
pub trait Canon {
    /// Rapid move to `target` (program coordinates)
    fn straight_traverse(&mut self, target: Position);

    /// Linear cutting move to `target` (program coordinates)
    fn straight_feed(&mut self, target: Position);

    /// Circular or helical cutting move in the active plane
    fn arc_feed(&mut self, arc: &ArcSpec);

    /// Rigid tapping cycle to `(x, y, z)`; recorded as one feed to the bottom
    fn rigid_tap(&mut self, x: f64, y: f64, z: f64);

    /// Pause for `seconds`
    fn dwell(&mut self, seconds: f64);

    /// Tool change to `pocket`; `-1` means no change
    fn change_tool(&mut self, pocket: i32);

    /// The interpreter moved on to a new source line
    fn next_line(&mut self, state: &InterpreterState);

    fn set_plane(&mut self, plane: Plane);

    /// Feed rate in units per minute
    fn set_feed_rate(&mut self, rate: f64);

    fn set_g5x_offset(&mut self, index: i32, offset: Position);

    fn set_g92_offset(&mut self, offset: Position);

    /// Coordinate system rotation about Z, in degrees
    fn set_xy_rotation(&mut self, degrees: f64);

    /// New tool-length offset
    fn tool_offset(&mut self, offset: Position);

    fn comment(&mut self, text: &str);

    /// Polled between callbacks; the interpreter stops when this is true
    fn should_stop(&self) -> bool {
        false
    }
}

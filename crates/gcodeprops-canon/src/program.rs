//! Frozen result of one program load.

use gcodeprops_core::{Extents, Position};
use serde::Serialize;

use crate::events::{self, Dwell, Feed, MotionEvent, Traverse};

/// Everything an accumulator recorded, read-only once frozen.
///
/// Produced by [`ProgramAccumulator::into_program`](crate::ProgramAccumulator::into_program);
/// safe to hand to another thread for aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct RecordedProgram {
    pub(crate) events: Vec<MotionEvent>,
    pub(crate) num_lines: u64,
    pub(crate) tool_calls: u64,
    pub(crate) dwell_time: f64,
    pub(crate) extents: Extents,
    pub(crate) last_position: Position,
    pub(crate) notifications: Vec<String>,
    pub(crate) dropped_events: u64,
    pub(crate) stopped: bool,
}

impl RecordedProgram {
    /// All events in call order
    pub fn events(&self) -> &[MotionEvent] {
        &self.events
    }

    pub fn traverses(&self) -> impl Iterator<Item = &Traverse> {
        events::traverses(&self.events)
    }

    pub fn linear_feeds(&self) -> impl Iterator<Item = &Feed> {
        events::linear_feeds(&self.events)
    }

    pub fn arc_feeds(&self) -> impl Iterator<Item = &Feed> {
        events::arc_feeds(&self.events)
    }

    pub fn dwells(&self) -> impl Iterator<Item = &Dwell> {
        events::dwells(&self.events)
    }

    /// Source lines reported through `next_line`
    pub fn num_lines(&self) -> u64 {
        self.num_lines
    }

    /// Tool changes to a real pocket
    pub fn tool_calls(&self) -> u64 {
        self.tool_calls
    }

    /// Sum of all dwell durations, seconds
    pub fn dwell_time(&self) -> f64 {
        self.dwell_time
    }

    /// Running extents over every position visited, all nine axes
    pub fn extents(&self) -> &Extents {
        &self.extents
    }

    pub fn last_position(&self) -> &Position {
        &self.last_position
    }

    /// Messages from `AXIS,notify` comments
    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    /// Events lost to per-event errors
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events
    }

    /// Whether the program asked to stop interpretation early
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

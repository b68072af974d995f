//! Program accumulator
//!
//! [`ProgramAccumulator`] implements [`Canon`] and records every callback of
//! one program load into an ordered list of [`MotionEvent`]s plus the
//! counters the property aggregator needs. One accumulator serves exactly one
//! load; freeze it with [`ProgramAccumulator::into_program`] when the
//! interpreter is done.

use std::ops::{Deref, DerefMut};

use gcodeprops_core::constants::{NO_POCKET, SHORT_DWELL_SECONDS};
use gcodeprops_core::{Axis, CanonError, Extents, Plane, Position};
use tracing::{debug, trace};

use crate::arc::{ArcRequest, ArcTessellator};
use crate::cancel::CancelToken;
use crate::canon::{ArcSpec, Canon, InterpreterState};
use crate::events::{self, Dwell, Feed, MotionEvent, Traverse};
use crate::program::RecordedProgram;
use crate::transform::CoordinateContext;

/// Canon callback recorder for a single program load
#[derive(Debug)]
pub struct ProgramAccumulator {
    events: Vec<MotionEvent>,
    num_lines: u64,
    tool_calls: u64,
    dwell_time: f64,
    extents: Extents,
    last_position: Position,
    suppress_depth: u32,
    first_move: bool,
    in_arc: bool,
    line_number: i64,
    context: CoordinateContext,
    tessellator: ArcTessellator,
    state: InterpreterState,
    notifications: Vec<String>,
    stop_requested: bool,
    cancel: Option<CancelToken>,
    dropped_events: u64,
}

impl Default for ProgramAccumulator {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            num_lines: 0,
            tool_calls: 0,
            dwell_time: 0.0,
            extents: Extents::new(),
            last_position: Position::ORIGIN,
            suppress_depth: 0,
            first_move: true,
            in_arc: false,
            line_number: 0,
            context: CoordinateContext::new(),
            tessellator: ArcTessellator::default(),
            state: InterpreterState::default(),
            notifications: Vec::new(),
            stop_requested: false,
            cancel: None,
            dropped_events: 0,
        }
    }
}

impl ProgramAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `arc_division` segments per half turn when splitting arcs
    pub fn with_arc_division(mut self, arc_division: u32) -> Self {
        self.tessellator = ArcTessellator::new(arc_division);
        self
    }

    pub fn with_tessellator(mut self, tessellator: ArcTessellator) -> Self {
        self.tessellator = tessellator;
        self
    }

    /// Discard all callbacks once `token` fires
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

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

    pub fn num_lines(&self) -> u64 {
        self.num_lines
    }

    pub fn tool_calls(&self) -> u64 {
        self.tool_calls
    }

    pub fn dwell_time(&self) -> f64 {
        self.dwell_time
    }

    pub fn extents(&self) -> &Extents {
        &self.extents
    }

    pub fn min_extents(&self) -> &Position {
        self.extents.min()
    }

    pub fn max_extents(&self) -> &Position {
        self.extents.max()
    }

    /// Machine position after the most recent recorded motion
    pub fn last_position(&self) -> &Position {
        &self.last_position
    }

    /// Sequence number of the line being interpreted
    pub fn line_number(&self) -> i64 {
        self.line_number
    }

    pub fn suppress_depth(&self) -> u32 {
        self.suppress_depth
    }

    /// True only while an arc is being folded into events
    pub fn in_arc(&self) -> bool {
        self.in_arc
    }

    pub fn context(&self) -> &CoordinateContext {
        &self.context
    }

    /// Modal state from the latest `next_line`
    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    pub fn dropped_events(&self) -> u64 {
        self.dropped_events
    }

    /// Freeze the recording into a read-only program
    pub fn into_program(self) -> RecordedProgram {
        let stopped = self.should_stop();
        RecordedProgram {
            events: self.events,
            num_lines: self.num_lines,
            tool_calls: self.tool_calls,
            dwell_time: self.dwell_time,
            extents: self.extents,
            last_position: self.last_position,
            notifications: self.notifications,
            dropped_events: self.dropped_events,
            stopped,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Motion callbacks are ignored inside hidden regions and after cancel
    fn discarding_motion(&self) -> bool {
        self.suppress_depth > 0 || self.is_cancelled()
    }

    fn to_machine(&self, target: Position) -> Result<Position, CanonError> {
        let line_number = self.line_number;
        let check = |p: &Position| match p.first_non_finite() {
            Some((axis, value)) => Err(CanonError::NonFiniteCoordinate {
                line_number,
                axis: axis.letter(),
                value,
            }),
            None => Ok(()),
        };
        check(&target)?;
        let machine = self.context.rotate_and_translate(target);
        check(&machine)?;
        Ok(machine)
    }

    fn push(&mut self, event: MotionEvent) {
        if let (Some(start), Some(end)) = (event.start(), event.end()) {
            self.extents.include(start);
            self.extents.include(end);
        }
        trace!("Recorded {} at line {}", event.class(), event.line_number());
        self.events.push(event);
    }

    fn feed(&self, start: Position, end: Position) -> Feed {
        Feed {
            line_number: self.line_number,
            start,
            end,
            feed_rate: self.context.feed_rate,
            tool_offset: self.context.tool_offset,
        }
    }

    fn drop_event(&mut self, callback: &str, err: CanonError) {
        self.dropped_events += 1;
        debug!(
            "Dropped {} at line {}: {}",
            callback, self.line_number, err
        );
    }

    fn fold_arc(&mut self, arc: &ArcSpec) -> Result<(), CanonError> {
        let request = ArcRequest {
            start: self.last_position,
            arc,
            context: &self.context,
            line_number: self.line_number,
        };
        let points = self.tessellator.tessellate(&request)?;

        let mut start = self.last_position;
        for end in points {
            let event = MotionEvent::ArcFeed(self.feed(start, end));
            self.push(event);
            start = end;
        }
        self.last_position = start;
        Ok(())
    }
}

/// Marks the accumulator as inside an arc for as long as it lives
struct ArcScope<'a> {
    accumulator: &'a mut ProgramAccumulator,
}

impl<'a> ArcScope<'a> {
    fn enter(accumulator: &'a mut ProgramAccumulator) -> Self {
        accumulator.in_arc = true;
        Self { accumulator }
    }
}

impl Deref for ArcScope<'_> {
    type Target = ProgramAccumulator;

    fn deref(&self) -> &Self::Target {
        self.accumulator
    }
}

impl DerefMut for ArcScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.accumulator
    }
}

impl Drop for ArcScope<'_> {
    fn drop(&mut self) {
        self.accumulator.in_arc = false;
    }
}

impl Canon for ProgramAccumulator {
    fn straight_traverse(&mut self, target: Position) {
        if self.discarding_motion() {
            return;
        }
        let pos = match self.to_machine(target) {
            Ok(pos) => pos,
            Err(e) => return self.drop_event("traverse", e),
        };
        if !self.first_move {
            self.push(MotionEvent::Traverse(Traverse {
                line_number: self.line_number,
                start: self.last_position,
                end: pos,
                tool_offset: self.context.tool_offset,
            }));
        }
        self.last_position = pos;
        self.extents.include(&pos);
    }

    fn straight_feed(&mut self, target: Position) {
        if self.discarding_motion() {
            return;
        }
        self.first_move = false;
        let pos = match self.to_machine(target) {
            Ok(pos) => pos,
            Err(e) => return self.drop_event("feed", e),
        };
        let event = MotionEvent::LinearFeed(self.feed(self.last_position, pos));
        self.push(event);
        self.last_position = pos;
    }

    fn arc_feed(&mut self, arc: &ArcSpec) {
        if self.discarding_motion() {
            return;
        }
        self.first_move = false;
        if self.in_arc {
            let line_number = self.line_number;
            return self.drop_event("arc", CanonError::NestedArc { line_number });
        }

        let mut scope = ArcScope::enter(self);
        if let Err(e) = scope.fold_arc(arc) {
            scope.drop_event("arc", e);
        }
    }

    fn rigid_tap(&mut self, x: f64, y: f64, z: f64) {
        if self.discarding_motion() {
            return;
        }
        self.first_move = false;
        let tip = match self.to_machine(Position::xyz(x, y, z)) {
            Ok(tip) => tip,
            Err(e) => return self.drop_event("rigid tap", e),
        };
        let start = self.last_position;
        let mut bottom = start;
        for axis in Axis::LINEAR {
            bottom[axis] = tip[axis];
        }
        let tap = MotionEvent::LinearFeed(self.feed(start, bottom));
        self.push(tap);
    }

    fn dwell(&mut self, seconds: f64) {
        if self.discarding_motion() {
            return;
        }
        if !seconds.is_finite() || seconds < 0.0 {
            let line_number = self.line_number;
            return self.drop_event("dwell", CanonError::InvalidDwell { line_number, seconds });
        }
        if seconds < SHORT_DWELL_SECONDS {
            debug!("Dwell {:.0} ms at line {}", seconds * 1000.0, self.line_number);
        } else {
            debug!("Dwell {} seconds at line {}", seconds, self.line_number);
        }
        self.dwell_time += seconds;
        self.push(MotionEvent::Dwell(Dwell {
            line_number: self.line_number,
            position: self.last_position,
            duration_seconds: seconds,
        }));
    }

    fn change_tool(&mut self, pocket: i32) {
        if self.is_cancelled() {
            return;
        }
        if pocket != NO_POCKET {
            self.tool_calls += 1;
        }
    }

    fn next_line(&mut self, state: &InterpreterState) {
        if self.is_cancelled() {
            return;
        }
        self.num_lines += 1;
        self.line_number = state.sequence_number;
        self.state = state.clone();
    }

    fn set_plane(&mut self, plane: Plane) {
        if self.is_cancelled() {
            return;
        }
        self.context.plane = plane;
    }

    fn set_feed_rate(&mut self, rate: f64) {
        if self.is_cancelled() {
            return;
        }
        self.context.feed_rate = rate / 60.0;
    }

    fn set_g5x_offset(&mut self, index: i32, offset: Position) {
        if self.is_cancelled() {
            return;
        }
        self.context.g5x_index = index;
        self.context.g5x_offset = offset;
    }

    fn set_g92_offset(&mut self, offset: Position) {
        if self.is_cancelled() {
            return;
        }
        self.context.g92_offset = offset;
    }

    fn set_xy_rotation(&mut self, degrees: f64) {
        if self.is_cancelled() {
            return;
        }
        self.context.set_xy_rotation(degrees);
    }

    fn tool_offset(&mut self, offset: Position) {
        if self.is_cancelled() {
            return;
        }
        let previous = self.context.tool_offset;
        self.last_position = self.last_position - offset + previous;
        self.first_move = true;
        self.context.tool_offset = offset;
    }

    fn comment(&mut self, text: &str) {
        if self.is_cancelled() {
            return;
        }
        let Some(rest) = text.trim().strip_prefix("AXIS,") else {
            return;
        };
        let (command, argument) = rest.split_once(',').unwrap_or((rest, ""));
        match command.trim() {
            "hide" => self.suppress_depth += 1,
            "show" => self.suppress_depth = self.suppress_depth.saturating_sub(1),
            "stop" => {
                debug!("Stop requested at line {}", self.line_number);
                self.stop_requested = true;
            }
            "notify" => self.notifications.push(argument.trim().to_string()),
            other => trace!("Ignoring AXIS comment command {:?}", other),
        }
    }

    fn should_stop(&self) -> bool {
        self.stop_requested || self.is_cancelled()
    }
}

//! Arc tessellation
//!
//! Splits a circular or helical arc into short linear segments. The
//! trigonometry sits behind [`SegmentGenerator`]; [`ArcTessellator`]
//! validates requests and results so the accumulator only ever folds finite,
//! non-empty segment lists.

use std::f64::consts::{PI, TAU};
use std::fmt;

use gcodeprops_core::constants::{
    CIRCLE_FUZZ, DEFAULT_ARC_DIVISION, MAX_ARC_SEGMENTS, MIN_ARC_SEGMENTS,
};
use gcodeprops_core::{Axis, CanonError, Position};
use tracing::trace;

use crate::canon::ArcSpec;
use crate::transform::CoordinateContext;

/// Everything a generator needs to split one arc
#[derive(Debug, Clone, Copy)]
pub struct ArcRequest<'a> {
    /// Pre-arc position in machine coordinates
    pub start: Position,
    pub arc: &'a ArcSpec,
    pub context: &'a CoordinateContext,
    pub line_number: i64,
}

/// Geometry routine producing segment end points in machine coordinates.
///
/// The returned list must end at the arc's end point; segment `i` starts at
/// point `i - 1` and segment 0 starts at `request.start`.
pub trait SegmentGenerator: fmt::Debug + Send + Sync {
    fn segments(
        &self,
        request: &ArcRequest<'_>,
        arc_division: u32,
    ) -> Result<Vec<Position>, CanonError>;
}

/// Equal-angle circular interpolation with linear interpolation of the
/// axial, rotary and auxiliary axes.
#[derive(Debug, Default, Clone, Copy)]
pub struct CircularSegments;

impl SegmentGenerator for CircularSegments {
    fn segments(
        &self,
        request: &ArcRequest<'_>,
        arc_division: u32,
    ) -> Result<Vec<Position>, CanonError> {
        let arc = request.arc;
        let ctx = request.context;
        let (first, second, axial) = ctx.plane.axes();

        let origin = ctx.to_program(request.start);
        let mut end = Position::new(0.0, 0.0, 0.0, arc.a, arc.b, arc.c, arc.u, arc.v, arc.w);
        end[first] = arc.end_first;
        end[second] = arc.end_second;
        end[axial] = arc.end_axial;

        let (cx, cy) = (arc.center_first, arc.center_second);
        let theta1 = (origin[second] - cy).atan2(origin[first] - cx);
        let mut theta2 = (end[second] - cy).atan2(end[first] - cx);

        if arc.rotation < 0 {
            while theta2 - theta1 > -CIRCLE_FUZZ {
                theta2 -= TAU;
            }
        } else {
            while theta2 - theta1 < CIRCLE_FUZZ {
                theta2 += TAU;
            }
        }

        // Extra full turns for multi-turn arcs
        if arc.rotation < -1 {
            theta2 += TAU * f64::from(arc.rotation + 1);
        }
        if arc.rotation > 1 {
            theta2 += TAU * f64::from(arc.rotation - 1);
        }

        let sweep = theta2 - theta1;
        let raw_steps = (f64::from(arc_division) * sweep.abs() / PI).floor();
        if !raw_steps.is_finite() || raw_steps > MAX_ARC_SEGMENTS as f64 {
            return Err(CanonError::ArcSegmentation {
                line_number: request.line_number,
                reason: format!(
                    "{} segments exceeds the limit of {}",
                    raw_steps, MAX_ARC_SEGMENTS
                ),
            });
        }
        let steps = MIN_ARC_SEGMENTS.max(raw_steps as usize);
        let fraction_step = 1.0 / steps as f64;
        let (dc, ds) = {
            let angle = sweep * fraction_step;
            (angle.cos(), angle.sin())
        };
        let delta = end - origin;

        trace!(
            "Arc line {}: theta {:.4} -> {:.4}, {} steps",
            request.line_number,
            theta1,
            theta2,
            steps
        );

        let mut tx = origin[first] - cx;
        let mut ty = origin[second] - cy;
        let mut points = Vec::with_capacity(steps);
        for i in 1..steps {
            let f = i as f64 * fraction_step;
            (tx, ty) = (tx * dc - ty * ds, tx * ds + ty * dc);

            let mut p = origin;
            for axis in Axis::ALL {
                p[axis] += delta[axis] * f;
            }
            p[first] = tx + cx;
            p[second] = ty + cy;
            points.push(ctx.rotate_and_translate(p));
        }
        points.push(ctx.rotate_and_translate(end));

        Ok(points)
    }
}

/// Arc-to-segment converter with a configurable angular resolution
#[derive(Debug)]
pub struct ArcTessellator {
    arc_division: u32,
    generator: Box<dyn SegmentGenerator>,
}

impl Default for ArcTessellator {
    fn default() -> Self {
        Self::new(DEFAULT_ARC_DIVISION)
    }
}

impl ArcTessellator {
    /// Tessellator using [`CircularSegments`]; `arc_division` is the number of
    /// segments per half turn.
    pub fn new(arc_division: u32) -> Self {
        Self::with_generator(arc_division, Box::new(CircularSegments))
    }

    pub fn with_generator(arc_division: u32, generator: Box<dyn SegmentGenerator>) -> Self {
        Self {
            arc_division,
            generator,
        }
    }

    pub fn arc_division(&self) -> u32 {
        self.arc_division
    }

    /// Split one arc into segment end points (machine coordinates)
    pub fn tessellate(&self, request: &ArcRequest<'_>) -> Result<Vec<Position>, CanonError> {
        let line_number = request.line_number;
        if self.arc_division == 0 {
            return Err(CanonError::ArcSegmentation {
                line_number,
                reason: "arc division must be positive".to_string(),
            });
        }
        validate_arc(request)?;

        let points = self.generator.segments(request, self.arc_division)?;
        if points.is_empty() {
            return Err(CanonError::ArcSegmentation {
                line_number,
                reason: "no segments produced".to_string(),
            });
        }
        if let Some((axis, value)) = points.iter().find_map(Position::first_non_finite) {
            return Err(CanonError::NonFiniteCoordinate {
                line_number,
                axis: axis.letter(),
                value,
            });
        }
        Ok(points)
    }
}

fn validate_arc(request: &ArcRequest<'_>) -> Result<(), CanonError> {
    let line_number = request.line_number;
    let arc = request.arc;
    let (first, second, axial) = request.context.plane.axes();
    let inputs = [
        (first.letter(), arc.end_first),
        (second.letter(), arc.end_second),
        ('I', arc.center_first),
        ('J', arc.center_second),
        (axial.letter(), arc.end_axial),
        ('A', arc.a),
        ('B', arc.b),
        ('C', arc.c),
        ('U', arc.u),
        ('V', arc.v),
        ('W', arc.w),
    ];
    let start = request.start.first_non_finite().map(|(a, v)| (a.letter(), v));
    match start.or_else(|| inputs.into_iter().find(|(_, v)| !v.is_finite())) {
        Some((axis, value)) => Err(CanonError::NonFiniteCoordinate {
            line_number,
            axis,
            value,
        }),
        None => Ok(()),
    }
}

//! Coordinate context and the program-to-machine transform.

use gcodeprops_core::{Axis, Plane, Position};

/// Modal state that shapes how interpreter coordinates map to the machine
/// frame, plus the feed rate recorded on feed events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateContext {
    pub plane: Plane,
    /// Units per second
    pub feed_rate: f64,
    pub g5x_index: i32,
    pub g5x_offset: Position,
    pub g92_offset: Position,
    pub tool_offset: Position,
    rotation_xy: f64,
    rotation_cos: f64,
    rotation_sin: f64,
}

impl Default for CoordinateContext {
    fn default() -> Self {
        Self {
            plane: Plane::XY,
            feed_rate: 1.0,
            g5x_index: 1,
            g5x_offset: Position::ORIGIN,
            g92_offset: Position::ORIGIN,
            tool_offset: Position::ORIGIN,
            rotation_xy: 0.0,
            rotation_cos: 1.0,
            rotation_sin: 0.0,
        }
    }
}

impl CoordinateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the XY rotation in degrees
    pub fn set_xy_rotation(&mut self, degrees: f64) {
        self.rotation_xy = degrees;
        let radians = degrees.to_radians();
        self.rotation_sin = radians.sin();
        self.rotation_cos = radians.cos();
    }

    /// Active XY rotation in degrees
    pub fn xy_rotation(&self) -> f64 {
        self.rotation_xy
    }

    /// Program coordinates to machine coordinates: G92 offset, XY rotation,
    /// then the G5x work offset.
    pub fn rotate_and_translate(&self, raw: Position) -> Position {
        let mut p = raw + self.g92_offset;
        self.rotate(&mut p);
        p + self.g5x_offset
    }

    /// Inverse of [`rotate_and_translate`](Self::rotate_and_translate)
    pub fn to_program(&self, machine: Position) -> Position {
        let mut p = machine - self.g5x_offset;
        self.unrotate(&mut p);
        p - self.g92_offset
    }

    fn rotate(&self, p: &mut Position) {
        if self.rotation_xy == 0.0 {
            return;
        }
        let (x, y) = (p[Axis::X], p[Axis::Y]);
        p[Axis::X] = x * self.rotation_cos - y * self.rotation_sin;
        p[Axis::Y] = x * self.rotation_sin + y * self.rotation_cos;
    }

    fn unrotate(&self, p: &mut Position) {
        if self.rotation_xy == 0.0 {
            return;
        }
        let (x, y) = (p[Axis::X], p[Axis::Y]);
        p[Axis::X] = x * self.rotation_cos + y * self.rotation_sin;
        p[Axis::Y] = -x * self.rotation_sin + y * self.rotation_cos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &Position, b: &Position) -> bool {
        a.as_slice()
            .iter()
            .zip(b.as_slice())
            .all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_identity_by_default() {
        let ctx = CoordinateContext::new();
        let p = Position::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        assert_eq!(ctx.rotate_and_translate(p), p);
    }

    #[test]
    fn test_offsets_are_added() {
        let mut ctx = CoordinateContext::new();
        ctx.g92_offset = Position::xyz(1.0, 0.0, 0.0);
        ctx.g5x_offset = Position::xyz(10.0, 20.0, -5.0);
        let out = ctx.rotate_and_translate(Position::xyz(1.0, 1.0, 1.0));
        assert_eq!(out.linear(), [12.0, 21.0, -4.0]);
    }

    #[test]
    fn test_rotation_applies_before_work_offset() {
        let mut ctx = CoordinateContext::new();
        ctx.set_xy_rotation(90.0);
        ctx.g5x_offset = Position::xyz(100.0, 0.0, 0.0);
        let out = ctx.rotate_and_translate(Position::xyz(1.0, 0.0, 0.0));
        assert!(close(&out, &Position::xyz(100.0, 1.0, 0.0)));
    }

    #[test]
    fn test_to_program_inverts() {
        let mut ctx = CoordinateContext::new();
        ctx.set_xy_rotation(30.0);
        ctx.g92_offset = Position::xyz(-2.0, 3.0, 0.5);
        ctx.g5x_offset = Position::new(5.0, 6.0, 7.0, 0.0, 0.0, 45.0, 1.0, 1.0, 1.0);
        let raw = Position::new(1.5, -2.5, 3.0, 0.0, 0.0, 10.0, 0.0, 2.0, 0.0);
        let round = ctx.to_program(ctx.rotate_and_translate(raw));
        assert!(close(&round, &raw));
        assert_eq!(ctx.xy_rotation(), 30.0);
    }
}

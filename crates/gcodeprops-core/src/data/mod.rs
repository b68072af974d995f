//! Data models for positions, planes and extents
//!
//! This module provides:
//! - Nine-axis positions (X, Y, Z, A, B, C, U, V, W) in internal millimetres
//! - Axis and arc-plane identifiers
//! - Running extents over every position visited by a program

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Index, IndexMut, Sub};

/// Number of axes carried by a [`Position`].
pub const AXIS_COUNT: usize = 9;

/// Machine axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    A,
    B,
    C,
    U,
    V,
    W,
}

impl Axis {
    /// All axes in storage order
    pub const ALL: [Axis; AXIS_COUNT] = [
        Axis::X,
        Axis::Y,
        Axis::Z,
        Axis::A,
        Axis::B,
        Axis::C,
        Axis::U,
        Axis::V,
        Axis::W,
    ];

    /// The three primary linear axes
    pub const LINEAR: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Storage index of this axis
    pub fn index(self) -> usize {
        self as usize
    }

    /// Axis letter
    pub fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
            Axis::A => 'A',
            Axis::B => 'B',
            Axis::C => 'C',
            Axis::U => 'U',
            Axis::V => 'V',
            Axis::W => 'W',
        }
    }

    /// Rotary axes are measured in degrees and never unit-converted
    pub fn is_rotary(self) -> bool {
        matches!(self, Axis::A | Axis::B | Axis::C)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Active arc plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Plane {
    /// G17
    #[default]
    XY,
    /// G19
    YZ,
    /// G18
    XZ,
}

impl Plane {
    /// Plane from the interpreter's numeric plane code (1 = XY, 2 = YZ, 3 = XZ)
    pub fn from_canon(code: i32) -> Option<Self> {
        match code {
            1 => Some(Plane::XY),
            2 => Some(Plane::YZ),
            3 => Some(Plane::XZ),
            _ => None,
        }
    }

    /// The interpreter's numeric plane code
    pub fn canon_code(self) -> i32 {
        match self {
            Plane::XY => 1,
            Plane::YZ => 2,
            Plane::XZ => 3,
        }
    }

    /// In-plane first axis, in-plane second axis and the axial (helix) axis
    pub fn axes(self) -> (Axis, Axis, Axis) {
        match self {
            Plane::XY => (Axis::X, Axis::Y, Axis::Z),
            Plane::XZ => (Axis::Z, Axis::X, Axis::Y),
            Plane::YZ => (Axis::Y, Axis::Z, Axis::X),
        }
    }
}

/// Nine-axis position in internal units (millimetres, degrees for A/B/C)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position(pub [f64; AXIS_COUNT]);

impl Position {
    /// Machine origin
    pub const ORIGIN: Position = Position([0.0; AXIS_COUNT]);

    /// Create a position from all nine components
    #[allow(clippy::too_many_arguments)]
    pub fn new(x: f64, y: f64, z: f64, a: f64, b: f64, c: f64, u: f64, v: f64, w: f64) -> Self {
        Self([x, y, z, a, b, c, u, v, w])
    }

    /// Create a position with only the linear axes set
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
    }

    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }

    pub fn z(&self) -> f64 {
        self.0[2]
    }

    /// The first three components
    pub fn linear(&self) -> [f64; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    /// Components as a slice in storage order
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Euclidean distance over the first three axes
    pub fn distance_xyz(&self, other: &Position) -> f64 {
        let dx = self.0[0] - other.0[0];
        let dy = self.0[1] - other.0[1];
        let dz = self.0[2] - other.0[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// First axis holding a NaN or infinite value
    pub fn first_non_finite(&self) -> Option<(Axis, f64)> {
        Axis::ALL
            .iter()
            .map(|axis| (*axis, self[*axis]))
            .find(|(_, value)| !value.is_finite())
    }

    /// Componentwise minimum
    pub fn min(&self, other: &Position) -> Position {
        let mut out = *self;
        for (lhs, rhs) in out.0.iter_mut().zip(other.0.iter()) {
            *lhs = lhs.min(*rhs);
        }
        out
    }

    /// Componentwise maximum
    pub fn max(&self, other: &Position) -> Position {
        let mut out = *self;
        for (lhs, rhs) in out.0.iter_mut().zip(other.0.iter()) {
            *lhs = lhs.max(*rhs);
        }
        out
    }
}

impl Index<Axis> for Position {
    type Output = f64;

    fn index(&self, axis: Axis) -> &f64 {
        &self.0[axis.index()]
    }
}

impl IndexMut<Axis> for Position {
    fn index_mut(&mut self, axis: Axis) -> &mut f64 {
        &mut self.0[axis.index()]
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        let mut out = self;
        for (lhs, rhs) in out.0.iter_mut().zip(rhs.0.iter()) {
            *lhs += rhs;
        }
        out
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        let mut out = self;
        for (lhs, rhs) in out.0.iter_mut().zip(rhs.0.iter()) {
            *lhs -= rhs;
        }
        out
    }
}

impl From<[f64; AXIS_COUNT]> for Position {
    fn from(values: [f64; AXIS_COUNT]) -> Self {
        Self(values)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X:{:.3} Y:{:.3} Z:{:.3} A:{:.3} B:{:.3} C:{:.3} U:{:.3} V:{:.3} W:{:.3}",
            self.0[0],
            self.0[1],
            self.0[2],
            self.0[3],
            self.0[4],
            self.0[5],
            self.0[6],
            self.0[7],
            self.0[8]
        )
    }
}

/// Running bounding box over all nine axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extents {
    min: Position,
    max: Position,
}

impl Default for Extents {
    fn default() -> Self {
        Self::new()
    }
}

impl Extents {
    /// Empty extents: every component of `min` is +inf, of `max` is -inf
    pub fn new() -> Self {
        Self {
            min: Position([f64::INFINITY; AXIS_COUNT]),
            max: Position([f64::NEG_INFINITY; AXIS_COUNT]),
        }
    }

    /// Grow the box to contain `position`
    pub fn include(&mut self, position: &Position) {
        self.min = self.min.min(position);
        self.max = self.max.max(position);
    }

    /// True until the first position is included
    pub fn is_empty(&self) -> bool {
        self.min.0.iter().zip(self.max.0.iter()).any(|(lo, hi)| lo > hi)
    }

    pub fn min(&self) -> &Position {
        &self.min
    }

    pub fn max(&self) -> &Position {
        &self.max
    }

    /// Whether every component of `position` lies inside the box
    pub fn contains(&self, position: &Position) -> bool {
        position
            .0
            .iter()
            .zip(self.min.0.iter().zip(self.max.0.iter()))
            .all(|(value, (lo, hi))| lo <= value && value <= hi)
    }

    /// Size of the box along one axis, `None` when empty
    pub fn span(&self, axis: Axis) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.max[axis] - self.min[axis])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance_ignores_rotary() {
        let a = Position::new(0.0, 0.0, 0.0, 90.0, 0.0, 0.0, 5.0, 0.0, 0.0);
        let b = Position::xyz(3.0, 4.0, 0.0);
        assert_eq!(a.distance_xyz(&b), 5.0);
    }

    #[test]
    fn test_position_arithmetic() {
        let a = Position::xyz(1.0, 2.0, 3.0);
        let b = Position::new(1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0);
        let sum = a + b;
        assert_eq!(sum.linear(), [2.0, 3.0, 4.0]);
        assert_eq!(sum[Axis::W], 1.0);
        assert_eq!((sum - b), a);
    }

    #[test]
    fn test_first_non_finite() {
        let mut p = Position::xyz(1.0, 2.0, 3.0);
        assert!(p.first_non_finite().is_none());
        p[Axis::B] = f64::INFINITY;
        assert_eq!(p.first_non_finite(), Some((Axis::B, f64::INFINITY)));
    }

    #[test]
    fn test_plane_axes() {
        assert_eq!(Plane::XY.axes(), (Axis::X, Axis::Y, Axis::Z));
        assert_eq!(Plane::XZ.axes(), (Axis::Z, Axis::X, Axis::Y));
        assert_eq!(Plane::YZ.axes(), (Axis::Y, Axis::Z, Axis::X));
        assert_eq!(Plane::from_canon(3), Some(Plane::XZ));
        assert_eq!(Plane::from_canon(7), None);
        assert_eq!(Plane::YZ.canon_code(), 2);
    }

    #[test]
    fn test_extents_lifecycle() {
        let mut extents = Extents::new();
        assert!(extents.is_empty());
        assert_eq!(extents.span(Axis::X), None);

        extents.include(&Position::xyz(1.0, -2.0, 0.0));
        extents.include(&Position::xyz(-1.0, 5.0, 0.0));
        assert!(!extents.is_empty());
        assert_eq!(extents.min().linear(), [-1.0, -2.0, 0.0]);
        assert_eq!(extents.max().linear(), [1.0, 5.0, 0.0]);
        assert_eq!(extents.span(Axis::Y), Some(7.0));
        assert!(extents.contains(&Position::xyz(0.0, 0.0, 0.0)));
        assert!(!extents.contains(&Position::xyz(2.0, 0.0, 0.0)));
    }
}

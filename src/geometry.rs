//! Coordinate math between a peer's reported rectangle, its anchor point and
//! the vector from one anchor to another. Pure functions, no state.

use std::f64::consts::PI;
use std::ops::{Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::common::PeerState;

/// Where the anchor sits inside a viewport: `inset_x` left of the right edge,
/// `inset_y` below the chrome. Every peer on a channel must use the same
/// values or the vectors they compute are meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    pub inset_x: i64,
    pub inset_y: i64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            inset_x: 100,
            inset_y: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vector {
    pub dx: i64,
    pub dy: i64,
}

impl Vector {
    pub const ZERO: Vector = Vector { dx: 0, dy: 0 };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn length(&self) -> f64 {
        (self.dx as f64).hypot(self.dy as f64)
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Point) -> Vector {
        Vector {
            dx: self.x.saturating_sub(rhs.x),
            dy: self.y.saturating_sub(rhs.y),
        }
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector {
            dx: self.dx.saturating_neg(),
            dy: self.dy.saturating_neg(),
        }
    }
}

/// Direction of a vector in radians, screen convention (y grows downward),
/// so `0` is due east and `PI / 2` due south.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Bearing(f64);

impl Bearing {
    pub fn radians(&self) -> f64 {
        self.0
    }

    pub fn degrees(&self) -> f64 {
        self.0 * 180.0 / PI
    }

    /// Unit vector pointing along the bearing.
    pub fn unit(&self) -> (f64, f64) {
        (self.0.cos(), self.0.sin())
    }
}

/// Insets come straight from the config file, so they may be anywhere in
/// `i64`; the result saturates instead of wrapping.
pub fn anchor(config: &AnchorConfig, state: &PeerState) -> Point {
    Point {
        x: (i64::from(state.x) + i64::from(state.width)).saturating_sub(config.inset_x),
        y: (i64::from(state.y) + i64::from(state.offset)).saturating_add(config.inset_y),
    }
}

/// Displacement from `me`'s anchor to `other`'s anchor.
pub fn relative_vector(config: &AnchorConfig, me: &PeerState, other: &PeerState) -> Vector {
    anchor(config, other) - anchor(config, me)
}

/// `atan2(dy, dx)`; the zero vector maps to `0.0`.
pub fn bearing(vector: Vector) -> Bearing {
    Bearing((vector.dy as f64).atan2(vector.dx as f64))
}

//! Data models for toolpath geometry
//!
//! This module provides:
//! - Absolute 3-axis positions in document units
//! - Plane selection for circular interpolation (G17/G18/G19)

use crate::constants::POSITION_EPSILON;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position in 3D space, in the document's working units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X-axis position
    pub x: f32,
    /// Y-axis position
    pub y: f32,
    /// Z-axis position
    pub z: f32,
}

impl Position {
    /// Create a new position with X, Y, Z coordinates
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The machine origin (0, 0, 0)
    pub const fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f32 {
        (self.to_vec3() - other.to_vec3()).length()
    }

    /// True when every axis differs by no more than `epsilon`.
    pub fn approx_eq(&self, other: &Position, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }

    /// Same point within [`POSITION_EPSILON`].
    pub fn coincides_with(&self, other: &Position) -> bool {
        self.approx_eq(other, POSITION_EPSILON)
    }

    /// All three coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn from_vec3(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Position {
    fn from(v: Vec3) -> Self {
        Self::from_vec3(v)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X:{:.3} Y:{:.3} Z:{:.3}", self.x, self.y, self.z)
    }
}

/// Active plane for circular interpolation.
///
/// Each plane names its two in-plane axes `(a, b)` in right-hand order, so a
/// positive rotation from `a` towards `b` is counter-clockwise when viewed
/// from the positive end of the remaining (normal) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    /// G17: X then Y, normal Z
    #[default]
    XY,
    /// G18: Z then X, normal Y
    ZX,
    /// G19: Y then Z, normal X
    YZ,
}

impl Plane {
    /// Split a position into `(a, b, normal)` components for this plane.
    pub fn project(self, p: Position) -> (f32, f32, f32) {
        match self {
            Plane::XY => (p.x, p.y, p.z),
            Plane::ZX => (p.z, p.x, p.y),
            Plane::YZ => (p.y, p.z, p.x),
        }
    }

    /// Inverse of [`Plane::project`].
    pub fn compose(self, a: f32, b: f32, normal: f32) -> Position {
        match self {
            Plane::XY => Position::new(a, b, normal),
            Plane::ZX => Position::new(b, normal, a),
            Plane::YZ => Position::new(normal, a, b),
        }
    }

    /// The G-code word that selects this plane.
    pub fn gcode(self) -> &'static str {
        match self {
            Plane::XY => "G17",
            Plane::ZX => "G18",
            Plane::YZ => "G19",
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plane::XY => write!(f, "XY plane (G17)"),
            Plane::ZX => write!(f, "ZX plane (G18)"),
            Plane::YZ => write!(f, "YZ plane (G19)"),
        }
    }
}

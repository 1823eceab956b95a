use std::ops::{Add, Mul, Neg, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a collidable object in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub Uuid);

impl ObstacleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_owned()
    }
}

impl Default for ObstacleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A coordinate on the ground plane.
///
/// The plane is spanned by the world's X and Z axes; Y (height) never takes
/// part in movement or collision. `Point2` also serves as the 2D vector type
/// for directions, edges and projection axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub z: f64,
}

impl Point2 {
    pub const ZERO: Self = Self { x: 0.0, z: 0.0 };

    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    pub fn dot(self, other: Self) -> f64 {
        DVec2::from(self).dot(other.into())
    }

    /// The edge normal used for separating axes: `(z, -x)`. Not normalized.
    pub fn edge_normal(self) -> Self {
        Self::new(self.z, -self.x)
    }

    pub fn length(self) -> f64 {
        DVec2::from(self).length()
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Heading of this vector, `atan2(z, x)`. The zero vector yields `0.0`.
    pub fn heading(self) -> f64 {
        self.z.atan2(self.x)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }
}

impl From<DVec2> for Point2 {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Point2> for DVec2 {
    fn from(p: Point2) -> Self {
        DVec2::new(p.x, p.z)
    }
}

impl Add for Point2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for Point2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Mul<f64> for Point2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.z * rhs)
    }
}

impl Neg for Point2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.z)
    }
}

/// Planar pose: position on the ground plane plus heading in radians.
///
/// Heading follows the `atan2(z, x)` convention, so `0` faces +X and
/// `-PI / 2` faces -Z ("forward").
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point2,
    pub rotation: f64,
}

impl Pose {
    pub const fn new(position: Point2, rotation: f64) -> Self {
        Self { position, rotation }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }
}

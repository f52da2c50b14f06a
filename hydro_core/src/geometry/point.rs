//! 3D point value type and the rigid rotations used for heel and trim.

use serde::{Deserialize, Serialize};

use crate::units::Radians;

/// Tolerance below which a transverse coordinate counts as on the centerline.
pub const CENTERLINE_TOLERANCE: f64 = 1e-9;

/// A point in meters: x longitudinal, y transverse (0 = centerline), z vertical.
///
/// Serializes as a bare `[x, y, z]` array.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn on_centerline(&self) -> bool {
        self.y.abs() <= CENTERLINE_TOLERANCE
    }

    pub fn distance_to(&self, other: &Point3) -> f64 {
        let (dx, dy, dz) = (other.x - self.x, other.y - self.y, other.z - self.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Reflection across the centerline plane y = 0
    pub fn mirrored(&self) -> Point3 {
        Point3::new(self.x, -self.y, self.z)
    }

    pub fn scaled(&self, factor: f64) -> Point3 {
        Point3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Rotate about the longitudinal axis through `origin`.
    ///
    /// A positive angle lowers the +y (starboard) side:
    ///
    /// ```text
    /// y' = y·cos φ + z·sin φ
    /// z' = -y·sin φ + z·cos φ      (relative to origin)
    /// ```
    pub fn heeled(&self, origin: &Point3, angle: Radians) -> Point3 {
        let (sin, cos) = angle.sin_cos();
        let (dy, dz) = (self.y - origin.y, self.z - origin.z);
        Point3::new(self.x, origin.y + dy * cos + dz * sin, origin.z - dy * sin + dz * cos)
    }

    /// Rotate about the transverse axis through `origin`.
    ///
    /// A positive angle lowers the +x end.
    pub fn trimmed(&self, origin: &Point3, angle: Radians) -> Point3 {
        let (sin, cos) = angle.sin_cos();
        let (dx, dz) = (self.x - origin.x, self.z - origin.z);
        Point3::new(origin.x + dx * cos + dz * sin, self.y, origin.z - dx * sin + dz * cos)
    }

    /// Hull frame to world frame: heel first, then trim.
    pub fn to_world(&self, origin: &Point3, heel: Radians, trim: Radians) -> Point3 {
        self.heeled(origin, heel).trimmed(origin, trim)
    }

    /// World frame back to hull frame; inverse of [`Point3::to_world`].
    pub fn to_hull(&self, origin: &Point3, heel: Radians, trim: Radians) -> Point3 {
        self.trimmed(origin, Radians(-trim.0)).heeled(origin, Radians(-heel.0))
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(coords: [f64; 3]) -> Self {
        Point3::new(coords[0], coords[1], coords[2])
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        [p.x, p.y, p.z]
    }
}

impl From<(f64, f64, f64)> for Point3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Point3::new(x, y, z)
    }
}

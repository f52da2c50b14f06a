//! # Unit Types
//!
//! Lightweight newtype wrappers for the units that cross the hydro_core API.
//! They serialize as bare numbers, so JSON stays clean.
//!
//! ## Conventions
//!
//! The engine works internally in SI units:
//! - Length: meters (hull definitions may be authored in cm or mm, see
//!   [`crate::config::LengthUnit`])
//! - Mass: kilograms
//! - Angles: degrees at the API boundary, radians inside the math
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::units::{Degrees, Millimeters, Meters, Radians};
//!
//! let station: Meters = Millimeters(2500.0).into();
//! assert_eq!(station.0, 2.5);
//!
//! let heel: Radians = Degrees(180.0).into();
//! assert!((heel.0 - std::f64::consts::PI).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / 100.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

// ============================================================================
// Angle Units
// ============================================================================

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Radians(pub f64);

impl From<Degrees> for Radians {
    fn from(deg: Degrees) -> Self {
        Radians(deg.0.to_radians())
    }
}

impl From<Radians> for Degrees {
    fn from(rad: Radians) -> Self {
        Degrees(rad.0.to_degrees())
    }
}

impl Radians {
    /// Sine and cosine in one call
    pub fn sin_cos(self) -> (f64, f64) {
        self.0.sin_cos()
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Centimeters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Degrees);
impl_arithmetic!(Radians);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversions() {
        let m: Meters = Centimeters(30.0).into();
        assert!((m.0 - 0.3).abs() < 1e-12);
        let mm: Millimeters = Meters(0.28).into();
        assert!((mm.0 - 280.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_conversions() {
        let rad: Radians = Degrees(90.0).into();
        assert!((rad.0 - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        let deg: Degrees = rad.into();
        assert!((deg.0 - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = Degrees(10.0);
        let b = Degrees(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).value(), 5.0);
    }

    #[test]
    fn test_serialization() {
        let heel = Degrees(12.5);
        let json = serde_json::to_string(&heel).unwrap();
        assert_eq!(json, "12.5");
        let roundtrip: Degrees = serde_json::from_str(&json).unwrap();
        assert_eq!(heel, roundtrip);
    }
}

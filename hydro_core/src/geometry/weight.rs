//! # Weights and Loading
//!
//! Point masses and their composition. Combining weights sums mass and
//! mass-weighted moments, so the result does not depend on the order in which
//! hull shell, paddler and gear are added.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::geometry::{LoadingCondition, Point3, Weight};
//!
//! let shell = Weight::new(10.0, Point3::new(2.5, 0.0, 0.10));
//! let loading = LoadingCondition::new()
//!     .with_item("Paddler", 80.0, Point3::new(2.5, 0.0, 0.25));
//!
//! let total = loading.total_with(&shell)?;
//! assert!((total.mass - 90.0).abs() < 1e-12);
//! assert!((total.cg.z - (1.0 + 20.0) / 90.0).abs() < 1e-12);
//! # Ok::<(), hydro_core::HydroError>(())
//! ```

use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use super::point::Point3;
use crate::errors::{HydroError, HydroResult};

/// A point mass in kg at a center of gravity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Weight {
    pub mass: f64,
    pub cg: Point3,
}

impl Weight {
    pub const fn new(mass: f64, cg: Point3) -> Self {
        Weight { mass, cg }
    }

    /// Identity for composition
    pub const fn zero() -> Self {
        Weight::new(0.0, Point3::ORIGIN)
    }

    pub fn validate(&self, field: &str) -> HydroResult<()> {
        if !self.mass.is_finite() || self.mass < 0.0 {
            return Err(HydroError::invalid_input(
                format!("{field}.mass"),
                self.mass.to_string(),
                "Mass must be a finite, non-negative number",
            ));
        }
        if !self.cg.is_finite() {
            return Err(HydroError::invalid_input(
                format!("{field}.cg"),
                format!("{:?}", self.cg),
                "Center of gravity must be finite",
            ));
        }
        Ok(())
    }

    /// First moments (mass × coordinate) about the origin planes
    fn moments(&self) -> (f64, f64, f64) {
        (self.mass * self.cg.x, self.mass * self.cg.y, self.mass * self.cg.z)
    }

    fn from_moments(mass: f64, (mx, my, mz): (f64, f64, f64)) -> Self {
        if mass > 0.0 {
            Weight::new(mass, Point3::new(mx / mass, my / mass, mz / mass))
        } else {
            Weight::zero()
        }
    }

    /// Mass-weighted combination of two weights
    pub fn combine(&self, other: &Weight) -> Weight {
        let (ax, ay, az) = self.moments();
        let (bx, by, bz) = other.moments();
        Weight::from_moments(self.mass + other.mass, (ax + bx, ay + by, az + bz))
    }

    /// Compose any number of weights
    pub fn compose<'a>(weights: impl IntoIterator<Item = &'a Weight>) -> Weight {
        let mut mass = 0.0;
        let mut moments = (0.0, 0.0, 0.0);
        for w in weights {
            let (mx, my, mz) = w.moments();
            mass += w.mass;
            moments.0 += mx;
            moments.1 += my;
            moments.2 += mz;
        }
        Weight::from_moments(mass, moments)
    }
}

impl Add for Weight {
    type Output = Weight;
    fn add(self, rhs: Weight) -> Weight {
        self.combine(&rhs)
    }
}

impl Sum for Weight {
    fn sum<I: Iterator<Item = Weight>>(iter: I) -> Weight {
        iter.fold(Weight::zero(), |acc, w| acc + w)
    }
}

/// A named item of the loading (paddler, gear, ballast...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassItem {
    pub name: String,
    pub mass: f64,
    pub cg: Point3,
}

impl MassItem {
    pub fn weight(&self) -> Weight {
        Weight::new(self.mass, self.cg)
    }
}

/// Everything carried by the hull in one analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadingCondition {
    pub items: Vec<MassItem>,
}

impl LoadingCondition {
    pub fn new() -> Self {
        LoadingCondition::default()
    }

    /// Builder-style item addition
    pub fn with_item(mut self, name: impl Into<String>, mass: f64, cg: Point3) -> Self {
        self.items.push(MassItem {
            name: name.into(),
            mass,
            cg,
        });
        self
    }

    pub fn validate(&self) -> HydroResult<()> {
        for (i, item) in self.items.iter().enumerate() {
            item.weight().validate(&format!("loading.items[{i}]"))?;
        }
        Ok(())
    }

    /// Compose the hull shell weight with every loading item.
    pub fn total_with(&self, shell: &Weight) -> HydroResult<Weight> {
        shell.validate("hull_weight")?;
        self.validate()?;
        let weights: Vec<Weight> = std::iter::once(*shell)
            .chain(self.items.iter().map(MassItem::weight))
            .collect();
        Ok(Weight::compose(&weights))
    }

    /// Each item's share of the total mass, hull shell first.
    pub fn mass_summary(&self, shell: &Weight) -> HydroResult<Vec<MassShare>> {
        let total = self.total_with(shell)?;
        let share = |mass: f64| if total.mass > 0.0 { mass / total.mass } else { 0.0 };
        let mut summary = vec![MassShare {
            name: "Hull".to_string(),
            mass: shell.mass,
            fraction: share(shell.mass),
        }];
        summary.extend(self.items.iter().map(|item| MassShare {
            name: item.name.clone(),
            mass: item.mass,
            fraction: share(item.mass),
        }));
        Ok(summary)
    }
}

/// One line of a mass summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassShare {
    pub name: String,
    pub mass: f64,
    pub fraction: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_combine_is_mass_weighted() {
        let a = Weight::new(10.0, Point3::new(2.0, 0.0, 0.1));
        let b = Weight::new(30.0, Point3::new(4.0, 0.2, 0.3));
        let c = a + b;
        assert_eq!(c.mass, 40.0);
        assert_abs_diff_eq!(c.cg.x, 3.5, epsilon = 1e-12);
        assert_abs_diff_eq!(c.cg.y, 0.15, epsilon = 1e-12);
        assert_abs_diff_eq!(c.cg.z, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_is_identity() {
        let a = Weight::new(12.0, Point3::new(1.0, 0.5, 0.2));
        let b = a + Weight::zero();
        assert_eq!(b.mass, a.mass);
        assert_abs_diff_eq!(b.cg.x, a.cg.x, epsilon = 1e-12);
        assert_abs_diff_eq!(b.cg.z, a.cg.z, epsilon = 1e-12);
        assert_eq!(Weight::zero() + Weight::zero(), Weight::zero());
    }

    #[test]
    fn test_sum_matches_compose() {
        let ws = [
            Weight::new(10.0, Point3::new(2.5, 0.0, 0.1)),
            Weight::new(80.0, Point3::new(2.4, 0.0, 0.25)),
            Weight::new(5.0, Point3::new(3.5, 0.05, 0.15)),
        ];
        let summed: Weight = ws.iter().copied().sum();
        let composed = Weight::compose(&ws);
        assert_abs_diff_eq!(summed.cg.x, composed.cg.x, epsilon = 1e-12);
        assert_abs_diff_eq!(summed.mass, composed.mass, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_mass_rejected() {
        let loading = LoadingCondition::new().with_item("Gear", -1.0, Point3::ORIGIN);
        let err = loading.total_with(&Weight::new(10.0, Point3::ORIGIN)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_mass_summary() {
        let shell = Weight::new(10.0, Point3::new(2.5, 0.0, 0.1));
        let loading = LoadingCondition::new().with_item("Paddler", 90.0, Point3::new(2.5, 0.0, 0.25));
        let summary = loading.mass_summary(&shell).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].name, "Hull");
        assert_abs_diff_eq!(summary[1].fraction, 0.9, epsilon = 1e-12);
    }
}

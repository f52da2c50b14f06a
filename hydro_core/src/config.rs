//! # Configuration
//!
//! Explicit settings handed to every [`Hull`](crate::geometry::Hull) construction
//! and every solve. Nothing about units, origin or axis direction is ambient:
//! a hull definition is only meaningful together with its [`HullFrame`].
//!
//! ## Structure
//!
//! ```text
//! HullConfig
//! ├── frame: HullFrame (origin, length unit, modelled side, rotation origin)
//! ├── water_density / gravity
//! ├── stations: StationPlan (where profiles are integrated)
//! ├── ordering: ProfileOrdering (deck -> keel traversal policy)
//! └── shell_cg: ShellCg (given or derived from the hull volume)
//!
//! SolverSettings (tolerances and iteration limit)
//! TrimMode (how trim is treated during equilibrium and heel sweeps)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::config::{HullConfig, StationPlan, SEA_WATER_DENSITY};
//!
//! let config = HullConfig {
//!     water_density: SEA_WATER_DENSITY,
//!     stations: StationPlan::Uniform { count: 81 },
//!     ..HullConfig::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_finite, HydroError, HydroResult};
use crate::geometry::Point3;
use crate::units::{Centimeters, Meters, Millimeters};

/// Fresh water density in kg/m³
pub const FRESH_WATER_DENSITY: f64 = 1000.0;

/// Sea water density in kg/m³
pub const SEA_WATER_DENSITY: f64 = 1025.0;

/// Standard gravity in m/s²
pub const STANDARD_GRAVITY: f64 = 9.81;

// ============================================================================
// Hull Frame
// ============================================================================

/// Where x = 0 sits and which way x grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordinateOrigin {
    /// x = 0 at the bow, growing toward the stern
    Bow,
    /// x = 0 at the stern, growing toward the bow
    #[default]
    Stern,
    /// x = 0 amidships, positive toward the bow
    Midship,
}

impl CoordinateOrigin {
    /// True when x grows toward the bow
    pub fn bow_is_max_x(&self) -> bool {
        !matches!(self, CoordinateOrigin::Bow)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CoordinateOrigin::Bow => "Bow origin",
            CoordinateOrigin::Stern => "Stern origin",
            CoordinateOrigin::Midship => "Midship origin",
        }
    }
}

/// Length unit the hull definition was authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    Meters,
    Centimeters,
    Millimeters,
}

impl LengthUnit {
    /// Convert a length in this unit to meters
    pub fn to_meters(self, value: f64) -> f64 {
        let meters: Meters = match self {
            LengthUnit::Meters => Meters(value),
            LengthUnit::Centimeters => Centimeters(value).into(),
            LengthUnit::Millimeters => Millimeters(value).into(),
        };
        meters.value()
    }

    pub fn code(&self) -> &'static str {
        match self {
            LengthUnit::Meters => "m",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Millimeters => "mm",
        }
    }
}

/// Which half of the hull the curve control points describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceSide {
    /// Points have y ≥ 0
    #[default]
    Starboard,
    /// Points have y ≤ 0
    Port,
}

impl SourceSide {
    /// True if `y` lies on this side (or on the centerline)
    pub fn contains(&self, y: f64, tolerance: f64) -> bool {
        match self {
            SourceSide::Starboard => y >= -tolerance,
            SourceSide::Port => y <= tolerance,
        }
    }
}

/// Coordinate conventions of a hull definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullFrame {
    pub origin: CoordinateOrigin,
    pub length_unit: LengthUnit,
    pub source_side: SourceSide,
    /// Pivot for heel and trim rotations, in `length_unit`
    pub rotation_origin: Point3,
}

impl Default for HullFrame {
    fn default() -> Self {
        HullFrame {
            origin: CoordinateOrigin::default(),
            length_unit: LengthUnit::default(),
            source_side: SourceSide::default(),
            rotation_origin: Point3::ORIGIN,
        }
    }
}

// ============================================================================
// Stations and Profile Ordering
// ============================================================================

/// Longitudinal positions at which profiles are built and integrated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StationPlan {
    /// `count` equally spaced stations from the first to the last control point
    Uniform { count: usize },
    /// Caller-supplied stations (in the definition's length unit)
    Explicit { stations: Vec<f64> },
    /// Every distinct control-point station (the main profiles)
    ControlPoints,
}

impl Default for StationPlan {
    fn default() -> Self {
        StationPlan::Uniform { count: 61 }
    }
}

/// Policy used to order the evaluated curve points of a profile from deck to keel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProfileOrdering {
    /// Highest point first; ties broken by half-breadth then curve name
    #[default]
    Vertical,
    /// Curve names listed from deck to keel
    Explicit { levels: Vec<String> },
}

/// Source of the hull shell's center of gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShellCg {
    /// `hull_weight.cg` as written in the definition
    #[default]
    Given,
    /// Volumetric centroid of the closed hull; only the shell mass is used
    Volumetric,
}

// ============================================================================
// Hull Configuration
// ============================================================================

/// Everything a [`Hull`](crate::geometry::Hull) needs besides its curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullConfig {
    pub frame: HullFrame,
    /// kg/m³
    pub water_density: f64,
    /// m/s²
    pub gravity: f64,
    pub stations: StationPlan,
    pub ordering: ProfileOrdering,
    pub shell_cg: ShellCg,
}

impl Default for HullConfig {
    fn default() -> Self {
        HullConfig {
            frame: HullFrame::default(),
            water_density: FRESH_WATER_DENSITY,
            gravity: STANDARD_GRAVITY,
            stations: StationPlan::default(),
            ordering: ProfileOrdering::default(),
            shell_cg: ShellCg::default(),
        }
    }
}

impl HullConfig {
    pub fn validate(&self) -> HydroResult<()> {
        require_finite("water_density", self.water_density)?;
        if self.water_density <= 0.0 {
            return Err(HydroError::invalid_input(
                "water_density",
                self.water_density.to_string(),
                "Water density must be positive",
            ));
        }
        require_finite("gravity", self.gravity)?;
        if self.gravity <= 0.0 {
            return Err(HydroError::invalid_input(
                "gravity",
                self.gravity.to_string(),
                "Gravity must be positive",
            ));
        }
        if !self.frame.rotation_origin.is_finite() {
            return Err(HydroError::invalid_input(
                "frame.rotation_origin",
                format!("{:?}", self.frame.rotation_origin),
                "Rotation origin must be finite",
            ));
        }
        match &self.stations {
            StationPlan::Uniform { count } if *count < 3 => Err(HydroError::invalid_input(
                "stations.count",
                count.to_string(),
                "At least 3 stations are required",
            )),
            StationPlan::Explicit { stations } if stations.len() < 2 => Err(HydroError::invalid_input(
                "stations.stations",
                stations.len().to_string(),
                "At least 2 explicit stations are required",
            )),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Solver Settings
// ============================================================================

/// Tolerances and iteration limit for the equilibrium solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Accepted |displaced mass - total mass| in kg
    pub mass_tolerance_kg: f64,
    /// Accepted |total mass × (LCB - LCG)| in kg·m when trim is solved
    pub moment_tolerance_kgm: f64,
    /// Smallest waterline bracket width in m before the search gives up
    pub waterline_tolerance_m: f64,
    pub max_iterations: usize,
    /// Trim search range is ±`max_trim_deg`
    pub max_trim_deg: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            mass_tolerance_kg: 1e-4,
            moment_tolerance_kgm: 1e-3,
            waterline_tolerance_m: 1e-12,
            max_iterations: 100,
            max_trim_deg: 15.0,
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> HydroResult<()> {
        for (field, value) in [
            ("mass_tolerance_kg", self.mass_tolerance_kg),
            ("moment_tolerance_kgm", self.moment_tolerance_kgm),
            ("waterline_tolerance_m", self.waterline_tolerance_m),
        ] {
            require_finite(field, value)?;
            if value <= 0.0 {
                return Err(HydroError::invalid_input(field, value.to_string(), "Tolerance must be positive"));
            }
        }
        if self.max_iterations == 0 {
            return Err(HydroError::invalid_input("max_iterations", "0", "At least one iteration is required"));
        }
        require_finite("max_trim_deg", self.max_trim_deg)?;
        if self.max_trim_deg <= 0.0 || self.max_trim_deg >= 45.0 {
            return Err(HydroError::invalid_input(
                "max_trim_deg",
                self.max_trim_deg.to_string(),
                "Trim search range must be within (0, 45) degrees",
            ));
        }
        Ok(())
    }
}

/// How trim is treated when solving equilibrium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TrimMode {
    /// Hold a given trim (degrees, positive = +x end down)
    Fixed { angle_deg: f64 },
    /// Solve trim upright, then hold that value at every heel angle
    HoldUpright,
    /// Solve trim jointly with the waterline at every heel angle
    SolveEachAngle,
}

impl Default for TrimMode {
    fn default() -> Self {
        TrimMode::Fixed { angle_deg: 0.0 }
    }
}

impl TrimMode {
    pub fn validate(&self) -> HydroResult<()> {
        if let TrimMode::Fixed { angle_deg } = self {
            require_finite("trim.angle_deg", *angle_deg)?;
            if angle_deg.abs() >= 45.0 {
                return Err(HydroError::invalid_input(
                    "trim.angle_deg",
                    angle_deg.to_string(),
                    "Fixed trim must be within (-45, 45) degrees",
                ));
            }
        }
        Ok(())
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TrimMode::Fixed { .. } => "Fixed trim",
            TrimMode::HoldUpright => "Upright trim held through sweep",
            TrimMode::SolveEachAngle => "Trim solved at every heel angle",
        }
    }
}

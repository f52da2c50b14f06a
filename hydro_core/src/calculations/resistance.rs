//! # Resistance
//!
//! Calm-water drag and paddling power of the loaded hull over a range of
//! speeds, from its upright waterline length, wetted surface and prismatic
//! coefficient.
//!
//! ## Method
//!
//! ```text
//! Re = V · Lwl / ν                     Fn = V / √(g · Lwl)
//! Cf = 0.075 / (log10 Re − 2)² + ΔCf   (ITTC-57 with roughness allowance)
//! Rf = ½ ρ V² S Cf                     Rr = ½ ρ V² S Cr
//! Pe = (Rf + Rr) · V                   Pp = Pe / η
//! ```
//!
//! `Cr` is an empirical curve for slender displacement hulls: small below
//! Fn = 0.30, rising linearly to hull speed (Fn = 0.40) and steeply beyond,
//! scaled by `1 + ½ (Cp − 0.55)`.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::calculations::resistance::{calculate, ResistanceInput};
//! use hydro_core::config::HullConfig;
//! use hydro_core::geometry::{CurveDefinition, Hull, HullDefinition, LoadingCondition, Point3, Weight};
//!
//! let definition = HullDefinition {
//!     name: "Simple V".to_string(),
//!     description: None,
//!     curves: vec![
//!         CurveDefinition::new("keel", vec![[0.0, 0.0, 0.30].into(), [2.5, 0.0, 0.0].into(), [5.0, 0.0, 0.30].into()]),
//!         CurveDefinition::new("gunwale", vec![[0.0, 0.0, 0.30].into(), [2.5, 0.30, 0.28].into(), [5.0, 0.0, 0.30].into()]),
//!     ],
//!     hull_weight: Weight::new(10.0, Point3::new(2.5, 0.0, 0.10)),
//! };
//! let hull = Hull::build(&definition, HullConfig::default())?;
//!
//! let input = ResistanceInput {
//!     loading: LoadingCondition::new().with_item("Paddler", 80.0, Point3::new(2.5, 0.0, 0.25)),
//!     speeds_mps: vec![1.0, 2.0],
//!     ..ResistanceInput::default()
//! };
//! let result = calculate(&hull, &input)?;
//! assert!(result.points[1].total_resistance_n > result.points[0].total_resistance_n);
//! # Ok::<(), hydro_core::HydroError>(())
//! ```

use serde::{Deserialize, Serialize};

use super::hull_parameters;
use super::hydrostatics::{solve_upright, HydrostaticsInput};
use crate::config::{SolverSettings, TrimMode};
use crate::errors::{require_finite, HydroError, HydroResult};
use crate::geometry::{Hull, LoadingCondition};

/// Kinematic viscosity of water at 15 °C, m²/s
pub const KINEMATIC_VISCOSITY: f64 = 1.19e-6;

/// Roughness allowance ΔCf typical of gelcoat or thermoformed hulls
pub const DEFAULT_ROUGHNESS_ALLOWANCE: f64 = 0.0004;

/// Share of paddler power that ends up moving the hull
pub const DEFAULT_PROPULSION_EFFICIENCY: f64 = 0.60;

/// Froude number taken as hull speed
pub const HULL_SPEED_FROUDE: f64 = 0.40;

/// Reference prismatic coefficient of the residuary curve
const REFERENCE_PRISMATIC: f64 = 0.55;

fn default_speeds() -> Vec<f64> {
    (1..=8).map(|i| i as f64 * 0.5).collect()
}

fn default_viscosity() -> f64 {
    KINEMATIC_VISCOSITY
}

fn default_roughness() -> f64 {
    DEFAULT_ROUGHNESS_ALLOWANCE
}

fn default_efficiency() -> f64 {
    DEFAULT_PROPULSION_EFFICIENCY
}

/// Input for a resistance estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "loading": { "items": [{ "name": "Paddler", "mass": 80.0, "cg": [2.5, 0.0, 0.25] }] },
///   "speeds_mps": [1.0, 1.5, 2.0],
///   "distance_m": 10000.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceInput {
    #[serde(default)]
    pub loading: LoadingCondition,
    #[serde(default)]
    pub trim: TrimMode,
    #[serde(default)]
    pub solver: SolverSettings,
    /// Boat speeds, m/s
    #[serde(default = "default_speeds")]
    pub speeds_mps: Vec<f64>,
    /// m²/s
    #[serde(default = "default_viscosity")]
    pub kinematic_viscosity: f64,
    #[serde(default = "default_roughness")]
    pub roughness_allowance: f64,
    /// Paddle efficiency η in (0, 1]
    #[serde(default = "default_efficiency")]
    pub propulsion_efficiency: f64,
    /// Report the paddler's energy over this distance, m
    #[serde(default)]
    pub distance_m: Option<f64>,
}

impl Default for ResistanceInput {
    fn default() -> Self {
        ResistanceInput {
            loading: LoadingCondition::default(),
            trim: TrimMode::default(),
            solver: SolverSettings::default(),
            speeds_mps: default_speeds(),
            kinematic_viscosity: KINEMATIC_VISCOSITY,
            roughness_allowance: DEFAULT_ROUGHNESS_ALLOWANCE,
            propulsion_efficiency: DEFAULT_PROPULSION_EFFICIENCY,
            distance_m: None,
        }
    }
}

impl ResistanceInput {
    pub fn validate(&self) -> HydroResult<()> {
        self.loading.validate()?;
        self.trim.validate()?;
        self.solver.validate()?;
        for &v in &self.speeds_mps {
            require_finite("speeds_mps", v)?;
            if v < 0.0 {
                return Err(HydroError::invalid_input("speeds_mps", v.to_string(), "Speeds cannot be negative"));
            }
        }
        require_finite("kinematic_viscosity", self.kinematic_viscosity)?;
        if self.kinematic_viscosity <= 0.0 {
            return Err(HydroError::invalid_input(
                "kinematic_viscosity",
                self.kinematic_viscosity.to_string(),
                "Kinematic viscosity must be positive",
            ));
        }
        require_finite("roughness_allowance", self.roughness_allowance)?;
        if self.roughness_allowance < 0.0 {
            return Err(HydroError::invalid_input(
                "roughness_allowance",
                self.roughness_allowance.to_string(),
                "Roughness allowance cannot be negative",
            ));
        }
        require_finite("propulsion_efficiency", self.propulsion_efficiency)?;
        if self.propulsion_efficiency <= 0.0 || self.propulsion_efficiency > 1.0 {
            return Err(HydroError::invalid_input(
                "propulsion_efficiency",
                self.propulsion_efficiency.to_string(),
                "Propulsion efficiency must be within (0, 1]",
            ));
        }
        if let Some(d) = self.distance_m {
            require_finite("distance_m", d)?;
            if d <= 0.0 {
                return Err(HydroError::invalid_input("distance_m", d.to_string(), "Distance must be positive"));
            }
        }
        Ok(())
    }
}

/// Drag and power at one speed. Forces in N, power in W, energy in J.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistancePoint {
    pub speed_mps: f64,
    pub froude_number: f64,
    pub reynolds_number: f64,
    pub friction_coefficient: f64,
    pub residuary_coefficient: f64,
    pub frictional_resistance_n: f64,
    pub residuary_resistance_n: f64,
    pub total_resistance_n: f64,
    pub effective_power_w: f64,
    pub paddler_power_w: f64,
    /// Paddler energy over `distance_m`, when requested
    pub energy_j: Option<f64>,
}

/// Resistance curve of the loaded hull.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceResult {
    pub waterline_length_m: f64,
    pub wetted_surface_m2: f64,
    pub displacement_kg: f64,
    pub prismatic_coefficient: f64,
    pub hull_speed_mps: f64,
    /// In the order the speeds were requested
    pub points: Vec<ResistancePoint>,
}

/// Hull figures and water properties the estimate runs on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResistanceHull {
    pub waterline_length: f64,
    pub wetted_surface: f64,
    /// None leaves the residuary curve unscaled
    pub prismatic_coefficient: Option<f64>,
    pub water_density: f64,
    pub gravity: f64,
}

/// Re = V · Lwl / ν
pub fn reynolds_number(speed: f64, waterline_length: f64, kinematic_viscosity: f64) -> f64 {
    speed * waterline_length / kinematic_viscosity
}

/// Fn = V / √(g · Lwl)
pub fn froude_number(speed: f64, waterline_length: f64, gravity: f64) -> f64 {
    speed / (gravity * waterline_length).sqrt()
}

/// Speed at Fn = 0.40, m/s
pub fn hull_speed(waterline_length: f64, gravity: f64) -> f64 {
    HULL_SPEED_FROUDE * (gravity * waterline_length).sqrt()
}

/// ITTC-57 friction line plus roughness allowance
pub fn ittc_friction_coefficient(reynolds_number: f64, roughness_allowance: f64) -> f64 {
    let log_re = reynolds_number.log10();
    0.075 / (log_re - 2.0).powi(2) + roughness_allowance
}

/// Empirical residuary coefficient, optionally scaled by the prismatic coefficient
pub fn residuary_coefficient(froude_number: f64, prismatic_coefficient: Option<f64>) -> f64 {
    let fr = froude_number.max(0.0);
    let base = if fr < 0.30 {
        0.0001 * fr.powi(2)
    } else if fr < HULL_SPEED_FROUDE {
        0.00009 + (fr - 0.30) / 0.10 * 0.0007
    } else {
        let excess = fr - HULL_SPEED_FROUDE;
        0.00079 + 0.003 * excess.powi(2) + 0.01 * excess.powi(3)
    };
    let factor = prismatic_coefficient.map_or(1.0, |cp| 1.0 + 0.5 * (cp - REFERENCE_PRISMATIC));
    (base * factor).max(0.0)
}

/// Paddler work to cover `distance` against a constant `resistance`, J
pub fn energy_for_distance(resistance: f64, distance: f64, propulsion_efficiency: f64) -> f64 {
    resistance * distance / propulsion_efficiency
}

/// Drag and power of `hull` at one speed.
pub fn resistance_at(hull: &ResistanceHull, speed: f64, input: &ResistanceInput) -> ResistancePoint {
    let reynolds = reynolds_number(speed, hull.waterline_length, input.kinematic_viscosity);
    let froude = froude_number(speed, hull.waterline_length, hull.gravity);
    let energy = |resistance: f64| {
        input
            .distance_m
            .map(|d| energy_for_distance(resistance, d, input.propulsion_efficiency))
    };

    if speed == 0.0 {
        return ResistancePoint {
            speed_mps: speed,
            froude_number: froude,
            reynolds_number: reynolds,
            friction_coefficient: 0.0,
            residuary_coefficient: 0.0,
            frictional_resistance_n: 0.0,
            residuary_resistance_n: 0.0,
            total_resistance_n: 0.0,
            effective_power_w: 0.0,
            paddler_power_w: 0.0,
            energy_j: energy(0.0),
        };
    }

    let cf = ittc_friction_coefficient(reynolds, input.roughness_allowance);
    let cr = residuary_coefficient(froude, hull.prismatic_coefficient);
    let dynamic_pressure_area = 0.5 * hull.water_density * speed.powi(2) * hull.wetted_surface;
    let rf = dynamic_pressure_area * cf;
    let rr = dynamic_pressure_area * cr;
    let total = rf + rr;
    let effective_power = total * speed;

    ResistancePoint {
        speed_mps: speed,
        froude_number: froude,
        reynolds_number: reynolds,
        friction_coefficient: cf,
        residuary_coefficient: cr,
        frictional_resistance_n: rf,
        residuary_resistance_n: rr,
        total_resistance_n: total,
        effective_power_w: effective_power,
        paddler_power_w: effective_power / input.propulsion_efficiency,
        energy_j: energy(total),
    }
}

/// Resistance curve of a loaded hull at its upright equilibrium.
pub fn calculate(hull: &Hull, input: &ResistanceInput) -> HydroResult<ResistanceResult> {
    input.validate()?;
    let upright = HydrostaticsInput {
        loading: input.loading.clone(),
        trim: input.trim,
        solver: input.solver.clone(),
    };
    let state = solve_upright(hull, &upright)?;
    let parameters = hull_parameters::calculate(hull, &state);
    if parameters.waterline_length <= 0.0 || parameters.wetted_surface <= 0.0 {
        return Err(HydroError::invalid_input(
            "loading",
            format!("{:.3} kg", state.total_mass),
            "Hull has no wetted length at this loading",
        ));
    }

    let resistance_hull = ResistanceHull {
        waterline_length: parameters.waterline_length,
        wetted_surface: parameters.wetted_surface,
        prismatic_coefficient: Some(parameters.prismatic_coefficient).filter(|cp| *cp > 0.0),
        water_density: hull.water_density(),
        gravity: hull.gravity(),
    };
    log::debug!(
        "resistance of '{}': Lwl {:.3} m, S {:.3} m², Cp {:.3}, {} speeds",
        hull.name(),
        resistance_hull.waterline_length,
        resistance_hull.wetted_surface,
        parameters.prismatic_coefficient,
        input.speeds_mps.len()
    );

    Ok(ResistanceResult {
        waterline_length_m: resistance_hull.waterline_length,
        wetted_surface_m2: resistance_hull.wetted_surface,
        displacement_kg: state.displacement_mass,
        prismatic_coefficient: parameters.prismatic_coefficient,
        hull_speed_mps: hull_speed(resistance_hull.waterline_length, resistance_hull.gravity),
        points: input
            .speeds_mps
            .iter()
            .map(|&v| resistance_at(&resistance_hull, v, input))
            .collect(),
    })
}

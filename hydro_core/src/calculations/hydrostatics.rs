//! # Hydrostatics Calculation
//!
//! Upright floating condition of a loaded hull: displacement, centers of
//! buoyancy and gravity, waterline, trim and initial stability (BM, GM).
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::calculations::hydrostatics::{calculate, HydrostaticsInput};
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
//! let input = HydrostaticsInput {
//!     loading: LoadingCondition::new().with_item("Paddler", 80.0, Point3::new(2.5, 0.0, 0.25)),
//!     ..HydrostaticsInput::default()
//! };
//! let result = calculate(&hull, &input)?;
//! assert!((result.displacement_kg - 90.0).abs() < 1e-3);
//! # Ok::<(), hydro_core::HydroError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{SolverSettings, TrimMode};
use crate::errors::{require_finite, HydroResult};
use crate::geometry::{Hull, LoadingCondition, Point3};
use crate::hydrostatics::{Attitude, EquilibriumSolver, EquilibriumState, HullIntegrator};

/// Input for an upright hydrostatics calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "loading": { "items": [{ "name": "Paddler", "mass": 80.0, "cg": [2.5, 0.0, 0.25] }] },
///   "trim": { "type": "SolveEachAngle" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HydrostaticsInput {
    /// Items carried in addition to the hull shell
    #[serde(default)]
    pub loading: LoadingCondition,
    #[serde(default)]
    pub trim: TrimMode,
    #[serde(default)]
    pub solver: SolverSettings,
}

impl HydrostaticsInput {
    pub fn validate(&self) -> HydroResult<()> {
        self.loading.validate()?;
        self.trim.validate()?;
        self.solver.validate()
    }
}

/// Upright hydrostatic properties. Centers are in the hull frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrostaticsResult {
    pub volume_m3: f64,
    pub displacement_kg: f64,
    pub total_mass_kg: f64,
    pub lcb_m: f64,
    pub tcb_m: f64,
    pub vcb_m: f64,
    pub lcg_m: f64,
    pub tcg_m: f64,
    pub vcg_m: f64,
    /// World waterline height
    pub waterline_z_m: f64,
    /// Waterline above the lowest point of the hull
    pub draft_m: f64,
    pub trim_deg: f64,
    pub waterplane_area_m2: f64,
    /// Transverse second moment of the waterplane, m⁴
    pub waterplane_inertia_m4: f64,
    /// Transverse metacentric radius BM = I_T / V
    pub bm_m: f64,
    /// Metacentric height GM = VCB + BM - VCG
    pub gm_m: f64,
    pub wetted_surface_m2: f64,
    pub iterations: usize,
    pub trim_iterations: usize,
    pub mass_residual_kg: f64,
    pub moment_residual_kgm: f64,
}

impl HydrostaticsResult {
    /// Initially stable when GM is positive
    pub fn is_initially_stable(&self) -> bool {
        self.gm_m > 0.0
    }
}

/// Solve the upright equilibrium for an input.
pub fn solve_upright(hull: &Hull, input: &HydrostaticsInput) -> HydroResult<EquilibriumState> {
    input.validate()?;
    let weight = hull.total_weight(&input.loading)?;
    EquilibriumSolver::new(hull, input.solver.clone()).solve(&weight, 0.0, input.trim)
}

/// Height of the waterline above the lowest hull point at the state's attitude
pub(crate) fn draft(hull: &Hull, state: &EquilibriumState) -> f64 {
    let (lowest, _) = HullIntegrator::new(hull, state.attitude).vertical_extent();
    (state.waterline_z - lowest).max(0.0)
}

/// Hydrostatics derived from an already solved equilibrium.
pub fn from_state(hull: &Hull, state: &EquilibriumState) -> HydrostaticsResult {
    let submerged = &state.submerged;
    let cb = submerged.center_of_buoyancy_hull.unwrap_or(state.center_of_buoyancy);
    let cg = state.center_of_gravity_hull;
    let bm = if submerged.volume > 0.0 {
        submerged.waterplane_inertia / submerged.volume
    } else {
        0.0
    };

    HydrostaticsResult {
        volume_m3: submerged.volume,
        displacement_kg: state.displacement_mass,
        total_mass_kg: state.total_mass,
        lcb_m: cb.x,
        tcb_m: cb.y,
        vcb_m: cb.z,
        lcg_m: cg.x,
        tcg_m: cg.y,
        vcg_m: cg.z,
        waterline_z_m: state.waterline_z,
        draft_m: draft(hull, state),
        trim_deg: state.trim_deg(),
        waterplane_area_m2: submerged.waterplane_area,
        waterplane_inertia_m4: submerged.waterplane_inertia,
        bm_m: bm,
        gm_m: cb.z + bm - cg.z,
        wetted_surface_m2: submerged.wetted_surface,
        iterations: state.iterations,
        trim_iterations: state.trim_iterations,
        mass_residual_kg: state.mass_residual,
        moment_residual_kgm: state.moment_residual,
    }
}

/// Calculate upright hydrostatics for a loaded hull.
pub fn calculate(hull: &Hull, input: &HydrostaticsInput) -> HydroResult<HydrostaticsResult> {
    let state = solve_upright(hull, input)?;
    Ok(from_state(hull, &state))
}

/// One row of a displacement table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplacementPoint {
    pub waterline_z_m: f64,
    pub volume_m3: f64,
    pub displacement_kg: f64,
    /// Hull frame; None when dry
    pub center_of_buoyancy: Option<Point3>,
    pub waterplane_area_m2: f64,
}

/// Upright volume, displacement and CB at each waterline height.
pub fn displacement_curve(hull: &Hull, waterlines: &[f64]) -> HydroResult<Vec<DisplacementPoint>> {
    for &z in waterlines {
        require_finite("waterlines", z)?;
    }
    let integrator = HullIntegrator::new(hull, Attitude::UPRIGHT);
    let rho = hull.water_density();
    Ok(waterlines
        .iter()
        .map(|&z| {
            let submerged = integrator.submerged(z);
            DisplacementPoint {
                waterline_z_m: z,
                volume_m3: submerged.volume,
                displacement_kg: submerged.volume * rho,
                center_of_buoyancy: submerged.center_of_buoyancy_hull,
                waterplane_area_m2: submerged.waterplane_area,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::hull::tests::{simple_v, simple_v_millimeters};
    use approx::assert_abs_diff_eq;

    fn paddler_input() -> HydrostaticsInput {
        HydrostaticsInput {
            loading: LoadingCondition::new().with_item("Paddler", 80.0, Point3::new(2.5, 0.0, 0.25)),
            ..HydrostaticsInput::default()
        }
    }

    #[test]
    fn test_loaded_hydrostatics() {
        let hull = simple_v();
        let result = calculate(&hull, &paddler_input()).unwrap();

        assert_abs_diff_eq!(result.total_mass_kg, 90.0, epsilon = 1e-12);
        assert!((result.displacement_kg - 90.0).abs() <= 1e-4);
        assert!(result.waterline_z_m > 0.0 && result.waterline_z_m < 0.28);
        assert_abs_diff_eq!(result.draft_m, result.waterline_z_m, epsilon = 1e-12);
        assert_abs_diff_eq!(result.lcb_m, 2.5, epsilon = 1e-6);
        assert_abs_diff_eq!(result.tcb_m, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.vcg_m, 21.0 / 90.0, epsilon = 1e-12);
        // Triangular sections: VCB = 5/7 of the draft
        assert!((result.vcb_m - result.waterline_z_m * 5.0 / 7.0).abs() < 3e-3);
    }

    #[test]
    fn test_metacentric_height() {
        let hull = simple_v();
        let result = calculate(&hull, &paddler_input()).unwrap();
        assert!(result.bm_m > 0.1 && result.bm_m < 0.16, "BM {}", result.bm_m);
        assert!(result.gm_m > 0.02 && result.gm_m < 0.06, "GM {}", result.gm_m);
        assert!(result.is_initially_stable());
        assert_abs_diff_eq!(result.gm_m, result.vcb_m + result.bm_m - result.vcg_m, epsilon = 1e-12);
    }

    #[test]
    fn test_millimetre_frame_loading() {
        let metric = calculate(&simple_v(), &paddler_input()).unwrap();
        let input = HydrostaticsInput {
            loading: LoadingCondition::new().with_item("Paddler", 80.0, Point3::new(2500.0, 0.0, 250.0)),
            ..HydrostaticsInput::default()
        };
        let result = calculate(&simple_v_millimeters(), &input).unwrap();

        assert_abs_diff_eq!(result.lcg_m, 2.5, epsilon = 1e-9);
        assert_abs_diff_eq!(result.vcg_m, 21.0 / 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.waterline_z_m, metric.waterline_z_m, epsilon = 1e-6);
        assert_abs_diff_eq!(result.gm_m, metric.gm_m, epsilon = 1e-6);
    }

    #[test]
    fn test_hull_only_floats_higher() {
        let hull = simple_v();
        let light = calculate(&hull, &HydrostaticsInput::default()).unwrap();
        let loaded = calculate(&hull, &paddler_input()).unwrap();
        assert!(light.waterline_z_m < loaded.waterline_z_m);
        assert!((light.displacement_kg - 10.0).abs() <= 1e-4);
    }

    #[test]
    fn test_displacement_curve_is_monotone() {
        let hull = simple_v();
        let waterlines: Vec<f64> = (0..=6).map(|i| i as f64 * 0.05).collect();
        let table = displacement_curve(&hull, &waterlines).unwrap();
        assert_eq!(table.len(), 7);
        assert_eq!(table[0].volume_m3, 0.0);
        assert!(table[0].center_of_buoyancy.is_none());
        assert!(table.windows(2).all(|w| w[1].displacement_kg >= w[0].displacement_kg));

        assert!(displacement_curve(&hull, &[0.1, f64::NAN]).is_err());
    }

    #[test]
    fn test_input_json_defaults() {
        let input: HydrostaticsInput = serde_json::from_str(r#"{"trim": {"type": "SolveEachAngle"}}"#).unwrap();
        assert_eq!(input.trim, TrimMode::SolveEachAngle);
        assert!(input.loading.items.is_empty());
        assert_eq!(input.solver, SolverSettings::default());
    }
}

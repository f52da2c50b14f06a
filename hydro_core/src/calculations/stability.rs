//! # Stability Curve
//!
//! Transverse stability of a loaded hull over a heel sweep.
//!
//! At every heel angle φ the hull is rotated rigidly about its rotation
//! origin, re-floated at the total weight, and the righting arm GZ is taken
//! as the horizontal distance between the verticals through CB and CG.
//! GZ is positive when the couple returns the hull toward upright.
//!
//! ## Derived quantities
//!
//! - **Maximum GZ** and its angle: the sample with the largest GZ
//! - **Angle of vanishing stability**: linear interpolation between the last
//!   positive sample and the first non-positive sample after the maximum;
//!   absent when GZ stays positive through the sweep
//! - **Dynamic stability**: ∫ GZ dφ from 0 to the vanishing angle (or the end
//!   of the sweep), φ in radians
//!
//! A heel angle whose equilibrium fails is recorded in
//! [`StabilityCurve::failed`] and left out of the samples. The sweep only
//! fails when every angle fails.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::calculations::stability::{calculate, HeelSweep, StabilityInput};
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
//! let input = StabilityInput {
//!     loading: LoadingCondition::new().with_item("Paddler", 80.0, Point3::new(2.5, 0.0, 0.25)),
//!     sweep: HeelSweep::new(30.0, 10.0),
//!     ..StabilityInput::default()
//! };
//! let curve = calculate(&hull, &input)?;
//! assert_eq!(curve.angles(), vec![0.0, 10.0, 20.0, 30.0]);
//! # Ok::<(), hydro_core::HydroError>(())
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::{SolverSettings, TrimMode};
use crate::errors::{require_finite, HydroError, HydroResult};
use crate::geometry::{Hull, LoadingCondition, Point3};
use crate::hydrostatics::integration::integrate;
use crate::hydrostatics::{EquilibriumSolver, EquilibriumState};
use crate::units::{Degrees, Radians};

/// Angles closer than this (degrees) count as the same angle
const ANGLE_TOLERANCE_DEG: f64 = 1e-9;

/// Largest number of heel angles one sweep may request
pub const MAX_SWEEP_ANGLES: usize = 10_000;

/// Heel angles from 0° to `max_angle_deg` in steps of `step_deg`, both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeelSweep {
    pub max_angle_deg: f64,
    pub step_deg: f64,
}

impl Default for HeelSweep {
    fn default() -> Self {
        HeelSweep {
            max_angle_deg: 90.0,
            step_deg: 5.0,
        }
    }
}

impl HeelSweep {
    pub fn new(max_angle_deg: f64, step_deg: f64) -> Self {
        HeelSweep {
            max_angle_deg,
            step_deg,
        }
    }

    pub fn validate(&self) -> HydroResult<()> {
        require_finite("sweep.max_angle_deg", self.max_angle_deg)?;
        require_finite("sweep.step_deg", self.step_deg)?;
        if self.max_angle_deg < 0.0 || self.max_angle_deg > 180.0 {
            return Err(HydroError::invalid_input(
                "sweep.max_angle_deg",
                self.max_angle_deg.to_string(),
                "Maximum heel must be within [0, 180] degrees",
            ));
        }
        if self.step_deg <= 0.0 {
            return Err(HydroError::invalid_input(
                "sweep.step_deg",
                self.step_deg.to_string(),
                "Heel step must be positive",
            ));
        }
        if self.max_angle_deg / self.step_deg >= MAX_SWEEP_ANGLES as f64 {
            return Err(HydroError::invalid_input(
                "sweep.step_deg",
                self.step_deg.to_string(),
                format!("Heel step gives more than {MAX_SWEEP_ANGLES} angles"),
            ));
        }
        Ok(())
    }

    /// Sweep angles in degrees; the maximum is appended when the step does not land on it.
    pub fn angles(&self) -> Vec<f64> {
        let steps = (self.max_angle_deg / self.step_deg + ANGLE_TOLERANCE_DEG).floor() as usize;
        let mut angles: Vec<f64> = (0..=steps).map(|i| i as f64 * self.step_deg).collect();
        if let Some(last) = angles.last_mut() {
            if (*last - self.max_angle_deg).abs() <= ANGLE_TOLERANCE_DEG {
                *last = self.max_angle_deg;
            } else if *last < self.max_angle_deg {
                angles.push(self.max_angle_deg);
            }
        }
        angles
    }
}

/// Input for a stability sweep.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StabilityInput {
    #[serde(default)]
    pub loading: LoadingCondition,
    #[serde(default)]
    pub sweep: HeelSweep,
    #[serde(default)]
    pub trim: TrimMode,
    #[serde(default)]
    pub solver: SolverSettings,
    /// Drop samples past the first non-positive GZ after the maximum
    #[serde(default)]
    pub stop_at_vanishing: bool,
}

impl StabilityInput {
    pub fn validate(&self) -> HydroResult<()> {
        self.loading.validate()?;
        self.sweep.validate()?;
        self.trim.validate()?;
        self.solver.validate()
    }
}

/// One heel angle of the curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilitySample {
    pub heel_deg: f64,
    /// Righting arm, m
    pub gz_m: f64,
    pub righting_moment_kgm: f64,
    pub righting_moment_nm: f64,
    pub waterline_z_m: f64,
    pub trim_deg: f64,
    pub displacement_kg: f64,
    /// World frame
    pub center_of_buoyancy: Point3,
    /// World frame
    pub center_of_gravity: Point3,
}

impl StabilitySample {
    fn from_state(state: &EquilibriumState, gravity: f64) -> Self {
        let gz = state.righting_arm();
        StabilitySample {
            heel_deg: state.heel_deg(),
            gz_m: gz,
            righting_moment_kgm: state.total_mass * gz,
            righting_moment_nm: state.total_mass * gravity * gz,
            waterline_z_m: state.waterline_z,
            trim_deg: state.trim_deg(),
            displacement_kg: state.displacement_mass,
            center_of_buoyancy: state.center_of_buoyancy,
            center_of_gravity: state.center_of_gravity,
        }
    }
}

/// A heel angle whose equilibrium could not be found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedAngle {
    pub heel_deg: f64,
    pub error: HydroError,
}

/// GZ curve and its derived measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityCurve {
    /// Ordered by increasing heel
    pub samples: Vec<StabilitySample>,
    pub failed: Vec<FailedAngle>,
    pub total_mass_kg: f64,
    pub max_gz_m: f64,
    pub max_gz_angle_deg: f64,
    pub max_righting_moment_nm: f64,
    pub max_moment_angle_deg: f64,
    pub vanishing_angle_deg: Option<f64>,
    /// m·rad
    pub dynamic_stability_mrad: f64,
}

impl StabilityCurve {
    pub fn angles(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.heel_deg).collect()
    }

    /// True when no heel angle failed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn sample_at(&self, heel_deg: f64) -> Option<&StabilitySample> {
        self.samples
            .iter()
            .find(|s| (s.heel_deg - heel_deg).abs() <= ANGLE_TOLERANCE_DEG)
    }
}

/// Compute the stability curve of a loaded hull.
pub fn calculate(hull: &Hull, input: &StabilityInput) -> HydroResult<StabilityCurve> {
    calculate_with_cancel(hull, input, &AtomicBool::new(false))
}

/// [`calculate`] with a cancellation flag checked between heel angles.
pub fn calculate_with_cancel(hull: &Hull, input: &StabilityInput, cancel: &AtomicBool) -> HydroResult<StabilityCurve> {
    input.validate()?;
    let weight = hull.total_weight(&input.loading)?;
    let solver = EquilibriumSolver::new(hull, input.solver.clone());

    let trim = solver.resolve_trim(&weight, input.trim)?;

    let angles = input.sweep.angles();
    log::debug!(
        "stability sweep of '{}': {} angles to {:.1}°, {:.2} kg, {}",
        hull.name(),
        angles.len(),
        input.sweep.max_angle_deg,
        weight.mass,
        input.trim.display_name()
    );

    let gravity = hull.gravity();
    let solve_angle = |heel: f64| {
        solver
            .solve(&weight, heel, trim)
            .map(|state| StabilitySample::from_state(&state, gravity))
    };
    let outcomes = evaluate(&angles, &solve_angle, cancel)?;
    assemble(outcomes, weight.mass, input.stop_at_vanishing)
}

type Outcome = (f64, HydroResult<StabilitySample>);

fn evaluate<F>(angles: &[f64], solve_angle: &F, cancel: &AtomicBool) -> HydroResult<Vec<Outcome>>
where
    F: Fn(f64) -> HydroResult<StabilitySample> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        evaluate_parallel(angles, solve_angle, cancel)
    }
    #[cfg(not(feature = "parallel"))]
    {
        evaluate_serial(angles, solve_angle, cancel)
    }
}

#[cfg_attr(feature = "parallel", allow(dead_code))]
fn evaluate_serial<F>(angles: &[f64], solve_angle: &F, cancel: &AtomicBool) -> HydroResult<Vec<Outcome>>
where
    F: Fn(f64) -> HydroResult<StabilitySample>,
{
    let mut outcomes = Vec::with_capacity(angles.len());
    for (completed, &heel) in angles.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            return Err(HydroError::Cancelled {
                completed,
                requested: angles.len(),
            });
        }
        outcomes.push((heel, solve_angle(heel)));
    }
    Ok(outcomes)
}

#[cfg(feature = "parallel")]
fn evaluate_parallel<F>(angles: &[f64], solve_angle: &F, cancel: &AtomicBool) -> HydroResult<Vec<Outcome>>
where
    F: Fn(f64) -> HydroResult<StabilitySample> + Sync,
{
    use rayon::prelude::*;

    let results: Vec<Option<Outcome>> = angles
        .par_iter()
        .map(|&heel| {
            if cancel.load(Ordering::Relaxed) {
                None
            } else {
                Some((heel, solve_angle(heel)))
            }
        })
        .collect();

    let requested = results.len();
    let mut outcomes: Vec<Outcome> = results.into_iter().flatten().collect();
    if outcomes.len() < requested {
        return Err(HydroError::Cancelled {
            completed: outcomes.len(),
            requested,
        });
    }
    outcomes.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(outcomes)
}

fn assemble(outcomes: Vec<Outcome>, total_mass: f64, stop_at_vanishing: bool) -> HydroResult<StabilityCurve> {
    let mut samples = Vec::with_capacity(outcomes.len());
    let mut failed = Vec::new();
    for (heel, outcome) in outcomes {
        match outcome {
            Ok(sample) => samples.push(sample),
            Err(error) => {
                log::warn!("no equilibrium at heel {:.1}°: {}", heel, error);
                failed.push(FailedAngle { heel_deg: heel, error });
            }
        }
    }
    if samples.is_empty() {
        return Err(failed
            .into_iter()
            .next()
            .map(|f| f.error)
            .unwrap_or_else(|| HydroError::internal("Heel sweep produced no angles")));
    }

    let max_index = samples
        .iter()
        .enumerate()
        .fold(0, |best, (i, s)| if s.gz_m > samples[best].gz_m { i } else { best });
    let max = &samples[max_index];
    let (max_gz_m, max_gz_angle_deg) = (max.gz_m, max.heel_deg);
    let moment_index = samples.iter().enumerate().fold(0, |best, (i, s)| {
        if s.righting_moment_nm > samples[best].righting_moment_nm {
            i
        } else {
            best
        }
    });
    let (max_righting_moment_nm, max_moment_angle_deg) =
        (samples[moment_index].righting_moment_nm, samples[moment_index].heel_deg);

    // First non-positive sample after the maximum
    let vanishing_index = samples
        .iter()
        .enumerate()
        .skip(max_index + 1)
        .find(|(_, s)| s.gz_m <= 0.0)
        .map(|(i, _)| i);
    let vanishing_angle_deg = vanishing_index.map(|j| {
        let (prev, next) = (&samples[j - 1], &samples[j]);
        if prev.gz_m <= 0.0 {
            prev.heel_deg
        } else {
            prev.heel_deg + (next.heel_deg - prev.heel_deg) * prev.gz_m / (prev.gz_m - next.gz_m)
        }
    });

    let radians = |deg: f64| Radians::from(Degrees(deg)).0;
    let dynamic_stability_mrad = match (vanishing_index, vanishing_angle_deg) {
        (Some(j), Some(vanishing)) => {
            let head = &samples[..j];
            let xs: Vec<f64> = head.iter().map(|s| radians(s.heel_deg)).collect();
            let ys: Vec<f64> = head.iter().map(|s| s.gz_m).collect();
            let last = &head[head.len() - 1];
            let tail = 0.5 * (radians(vanishing) - radians(last.heel_deg)) * last.gz_m.max(0.0);
            integrate(&xs, &ys).0 + tail
        }
        _ => {
            let xs: Vec<f64> = samples.iter().map(|s| radians(s.heel_deg)).collect();
            let ys: Vec<f64> = samples.iter().map(|s| s.gz_m).collect();
            integrate(&xs, &ys).0
        }
    };

    if stop_at_vanishing {
        if let Some(j) = vanishing_index {
            samples.truncate(j + 1);
        }
    }

    Ok(StabilityCurve {
        samples,
        failed,
        total_mass_kg: total_mass,
        max_gz_m,
        max_gz_angle_deg,
        max_righting_moment_nm,
        max_moment_angle_deg,
        vanishing_angle_deg,
        dynamic_stability_mrad,
    })
}

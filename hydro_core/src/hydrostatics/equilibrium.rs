//! # Equilibrium Solver
//!
//! Finds the waterline (and optionally the trim) at which the hull floats a
//! given weight.
//!
//! ## Method
//!
//! Displaced volume is non-decreasing in the waterline height, so the mass
//! balance `V(z)·ρ - m` is bracketed by the hull's vertical extent at the
//! requested attitude. The bracket is narrowed by secant steps, falling back to
//! bisection whenever a step fails to halve it. Trim is found the same way on
//! the moment balance `m·(LCB - LCG)` over ±`max_trim_deg`, re-solving the
//! waterline at every trial trim.
//!
//! Non-convergence is returned as [`HydroError::Convergence`] carrying the
//! attitude, iteration count, residual and bracket.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use super::volume::{Attitude, HullIntegrator, SubmergedVolume};
use crate::config::{SolverSettings, TrimMode};
use crate::errors::{HydroError, HydroResult};
use crate::geometry::{Hull, Point3, Weight};

/// Bracket width in degrees below which the trim search stops narrowing
const TRIM_TOLERANCE_DEG: f64 = 1e-9;

// ============================================================================
// Bracketed root search
// ============================================================================

/// Converged root of a bracketed search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootSearch {
    pub root: f64,
    pub residual: f64,
    pub iterations: usize,
}

/// Why a bracketed search stopped without a root.
#[derive(Debug, Clone, PartialEq)]
pub enum RootError<E> {
    /// The function itself failed
    Evaluation(E),
    /// Both ends of the bracket have the same sign
    NoBracket { f_lo: f64, f_hi: f64 },
    /// Iteration limit or bracket width exhausted
    Exhausted {
        best: f64,
        residual: f64,
        iterations: usize,
        lo: f64,
        hi: f64,
    },
}

/// Find `x` in `[lo, hi]` with `|f(x)| <= f_tol`.
///
/// `f(lo)` and `f(hi)` must differ in sign. Each step takes the secant
/// (regula falsi) point of the current bracket and switches to bisection for
/// the next step if the bracket did not shrink by at least half.
pub fn find_root<F, E>(
    mut f: F,
    lo: f64,
    hi: f64,
    f_tol: f64,
    x_tol: f64,
    max_iterations: usize,
) -> Result<RootSearch, RootError<E>>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let f_lo = f(lo).map_err(RootError::Evaluation)?;
    if f_lo.abs() <= f_tol {
        return Ok(RootSearch {
            root: lo,
            residual: f_lo,
            iterations: 0,
        });
    }
    let f_hi = f(hi).map_err(RootError::Evaluation)?;
    if f_hi.abs() <= f_tol {
        return Ok(RootSearch {
            root: hi,
            residual: f_hi,
            iterations: 0,
        });
    }
    if f_lo.signum() == f_hi.signum() || f_lo.is_nan() || f_hi.is_nan() {
        return Err(RootError::NoBracket { f_lo, f_hi });
    }

    // (neg, f_neg) keeps the negative end, (pos, f_pos) the positive end
    let (mut neg, mut f_neg, mut pos, mut f_pos) = if f_lo < 0.0 {
        (lo, f_lo, hi, f_hi)
    } else {
        (hi, f_hi, lo, f_lo)
    };
    let mut bisect = false;
    let best = |neg: f64, f_neg: f64, pos: f64, f_pos: f64| {
        if f_neg.abs() <= f_pos.abs() {
            (neg, f_neg)
        } else {
            (pos, f_pos)
        }
    };

    for iteration in 1..=max_iterations {
        let width = (pos - neg).abs();
        let (a, b) = (neg.min(pos), neg.max(pos));
        let secant = neg - f_neg * (pos - neg) / (f_pos - f_neg);
        let x = if bisect || !secant.is_finite() || secant <= a || secant >= b {
            0.5 * (neg + pos)
        } else {
            secant
        };

        let fx = f(x).map_err(RootError::Evaluation)?;
        log::trace!("root search iteration {iteration}: x = {x:.9}, f = {fx:.3e}, bracket width {width:.3e}");
        if fx.abs() <= f_tol {
            return Ok(RootSearch {
                root: x,
                residual: fx,
                iterations: iteration,
            });
        }
        if fx < 0.0 {
            neg = x;
            f_neg = fx;
        } else {
            pos = x;
            f_pos = fx;
        }

        let new_width = (pos - neg).abs();
        bisect = new_width > 0.5 * width;
        if new_width <= x_tol {
            let (best, residual) = best(neg, f_neg, pos, f_pos);
            return Err(RootError::Exhausted {
                best,
                residual,
                iterations: iteration,
                lo: neg.min(pos),
                hi: neg.max(pos),
            });
        }
    }

    let (best_x, residual) = best(neg, f_neg, pos, f_pos);
    Err(RootError::Exhausted {
        best: best_x,
        residual,
        iterations: max_iterations,
        lo: neg.min(pos),
        hi: neg.max(pos),
    })
}

// ============================================================================
// Equilibrium
// ============================================================================

/// A floating equilibrium of the hull.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumState {
    /// World waterline height, m
    pub waterline_z: f64,
    pub attitude: Attitude,
    pub total_mass: f64,
    /// Displaced volume × water density, kg
    pub displacement_mass: f64,
    /// World frame
    pub center_of_gravity: Point3,
    pub center_of_gravity_hull: Point3,
    /// World frame
    pub center_of_buoyancy: Point3,
    pub submerged: SubmergedVolume,
    /// Waterline iterations of the final solve
    pub iterations: usize,
    /// Outer trim iterations, 0 when trim was held
    pub trim_iterations: usize,
    /// Displacement - total mass, kg
    pub mass_residual: f64,
    /// Total mass × (LCB - LCG) in the world frame, kg·m
    pub moment_residual: f64,
}

impl EquilibriumState {
    pub fn heel_deg(&self) -> f64 {
        self.attitude.heel_deg
    }

    pub fn trim_deg(&self) -> f64 {
        self.attitude.trim_deg
    }

    pub fn volume(&self) -> f64 {
        self.submerged.volume
    }

    /// Righting arm GZ in m, positive when the couple opposes the heel.
    ///
    /// Horizontal distance between the verticals through CB and CG in the
    /// world frame. With positive heel lowering +y, a CB further to +y than
    /// the CG lifts the immersed side back up.
    pub fn righting_arm(&self) -> f64 {
        self.center_of_buoyancy.y - self.center_of_gravity.y
    }
}

fn describe(attitude: Attitude, mass: f64) -> String {
    format!(
        "heel {:.1}°, trim {:.2}°, mass {:.2} kg",
        attitude.heel_deg, attitude.trim_deg, mass
    )
}

/// Solves waterline and trim for one hull and solver configuration.
#[derive(Debug, Clone)]
pub struct EquilibriumSolver<'a> {
    hull: &'a Hull,
    settings: SolverSettings,
}

impl<'a> EquilibriumSolver<'a> {
    pub fn new(hull: &'a Hull, settings: SolverSettings) -> Self {
        EquilibriumSolver { hull, settings }
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Waterline at a fixed attitude such that displacement equals `weight.mass`.
    ///
    /// `weight` is the composed weight in the hull frame.
    pub fn solve_waterline(&self, weight: &Weight, attitude: Attitude) -> HydroResult<EquilibriumState> {
        self.settings.validate()?;
        weight.validate("weight")?;
        let condition = describe(attitude, weight.mass);

        let integrator = HullIntegrator::new(self.hull, attitude);
        let (lo, hi) = integrator.vertical_extent();
        if weight.mass <= 0.0 {
            return Err(HydroError::convergence(
                condition,
                "Total mass must be positive for a floating waterline",
                0,
                -weight.mass,
                (lo, hi),
            ));
        }

        let rho = self.hull.water_density();
        let tolerance = self.settings.mass_tolerance_kg;
        let max_displacement = integrator.volume(hi) * rho;
        if max_displacement + tolerance < weight.mass {
            return Err(HydroError::convergence(
                condition,
                format!(
                    "Total mass exceeds the maximum displacement of {:.3} kg",
                    max_displacement
                ),
                0,
                max_displacement - weight.mass,
                (lo, hi),
            ));
        }

        let search = find_root(
            |z| Ok::<f64, Infallible>(integrator.volume(z) * rho - weight.mass),
            lo,
            hi,
            tolerance,
            self.settings.waterline_tolerance_m,
            self.settings.max_iterations,
        )
        .map_err(|err| match err {
            RootError::Evaluation(never) => match never {},
            RootError::NoBracket { f_lo, f_hi } => HydroError::convergence(
                condition.clone(),
                format!("Waterline not bracketed (residuals {:.3e} kg, {:.3e} kg)", f_lo, f_hi),
                0,
                f_lo.abs().min(f_hi.abs()),
                (lo, hi),
            ),
            RootError::Exhausted {
                residual,
                iterations,
                lo,
                hi,
                ..
            } => HydroError::convergence(
                condition.clone(),
                "Waterline search did not reach the mass tolerance",
                iterations,
                residual,
                (lo, hi),
            ),
        })?;

        let submerged = integrator.submerged(search.root);
        let center_of_buoyancy = submerged
            .center_of_buoyancy
            .ok_or_else(|| HydroError::internal(format!("Dry hull at converged waterline ({condition})")))?;

        let origin = self.hull.rotation_origin();
        let center_of_gravity = weight.cg.to_world(&origin, attitude.heel(), attitude.trim());
        let displacement_mass = submerged.volume * rho;

        log::debug!(
            "equilibrium at {}: waterline {:.6} m after {} iterations (residual {:.2e} kg)",
            condition,
            search.root,
            search.iterations,
            displacement_mass - weight.mass
        );

        Ok(EquilibriumState {
            waterline_z: search.root,
            attitude,
            total_mass: weight.mass,
            displacement_mass,
            center_of_gravity,
            center_of_gravity_hull: weight.cg,
            center_of_buoyancy,
            submerged,
            iterations: search.iterations,
            trim_iterations: 0,
            mass_residual: displacement_mass - weight.mass,
            moment_residual: weight.mass * (center_of_buoyancy.x - center_of_gravity.x),
        })
    }

    /// Waterline and trim at a fixed heel such that LCB lies under LCG.
    pub fn solve_with_trim(&self, weight: &Weight, heel_deg: f64) -> HydroResult<EquilibriumState> {
        self.settings.validate()?;
        let limit = self.settings.max_trim_deg;
        let condition = format!("heel {:.1}°, mass {:.2} kg, trim free", heel_deg, weight.mass);

        let search = find_root(
            |trim| {
                self.solve_waterline(weight, Attitude::new(heel_deg, trim))
                    .map(|state| state.moment_residual)
            },
            -limit,
            limit,
            self.settings.moment_tolerance_kgm,
            TRIM_TOLERANCE_DEG,
            self.settings.max_iterations,
        )
        .map_err(|err| match err {
            RootError::Evaluation(e) => e,
            RootError::NoBracket { f_lo, f_hi } => HydroError::convergence(
                condition.clone(),
                format!(
                    "Trim lies outside ±{limit}° (moment residuals {:.3e}, {:.3e} kg·m)",
                    f_lo, f_hi
                ),
                0,
                f_lo.abs().min(f_hi.abs()),
                (-limit, limit),
            ),
            RootError::Exhausted {
                residual,
                iterations,
                lo,
                hi,
                ..
            } => HydroError::convergence(
                condition.clone(),
                "Trim search did not reach the moment tolerance",
                iterations,
                residual,
                (lo, hi),
            ),
        })?;

        let mut state = self.solve_waterline(weight, Attitude::new(heel_deg, search.root))?;
        state.trim_iterations = search.iterations;
        log::debug!(
            "trim equilibrium at {}: trim {:.4}° after {} iterations",
            condition,
            search.root,
            search.iterations
        );
        Ok(state)
    }

    /// Replace [`TrimMode::HoldUpright`] by the fixed upright trim of `weight`.
    ///
    /// Other modes are returned unchanged.
    pub fn resolve_trim(&self, weight: &Weight, mode: TrimMode) -> HydroResult<TrimMode> {
        mode.validate()?;
        match mode {
            TrimMode::HoldUpright => {
                let upright = self.solve_with_trim(weight, 0.0)?;
                Ok(TrimMode::Fixed {
                    angle_deg: upright.trim_deg(),
                })
            }
            other => Ok(other),
        }
    }

    /// Equilibrium at `heel_deg` with trim handled per `mode`.
    ///
    /// [`TrimMode::HoldUpright`] runs the upright trim search on every call;
    /// callers solving several angles for one weight should pass the mode
    /// through [`resolve_trim`](Self::resolve_trim) once beforehand.
    pub fn solve(&self, weight: &Weight, heel_deg: f64, mode: TrimMode) -> HydroResult<EquilibriumState> {
        mode.validate()?;
        match mode {
            TrimMode::Fixed { angle_deg } => self.solve_waterline(weight, Attitude::new(heel_deg, angle_deg)),
            TrimMode::SolveEachAngle => self.solve_with_trim(weight, heel_deg),
            TrimMode::HoldUpright => {
                let upright = self.solve_with_trim(weight, 0.0)?;
                if heel_deg == 0.0 {
                    return Ok(upright);
                }
                self.solve_waterline(weight, Attitude::new(heel_deg, upright.trim_deg()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::hull::tests::simple_v;
    use crate::geometry::LoadingCondition;
    use approx::assert_abs_diff_eq;

    fn loaded_weight(hull: &Hull, paddler_x: f64) -> Weight {
        let loading = LoadingCondition::new().with_item("Paddler", 80.0, Point3::new(paddler_x, 0.0, 0.25));
        hull.total_weight(&loading).unwrap()
    }

    #[test]
    fn test_find_root_sqrt_two() {
        let search = find_root(|x| Ok::<f64, ()>(x * x - 2.0), 0.0, 2.0, 1e-12, 1e-15, 100).unwrap();
        assert_abs_diff_eq!(search.root, 2f64.sqrt(), epsilon = 1e-10);
        assert!(search.iterations > 0);
    }

    #[test]
    fn test_find_root_decreasing_function() {
        let search = find_root(|x| Ok::<f64, ()>(1.0 - x), -3.0, 5.0, 1e-12, 1e-15, 100).unwrap();
        assert_abs_diff_eq!(search.root, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_find_root_errors() {
        let no_bracket = find_root(|x| Ok::<f64, ()>(x * x + 1.0), -1.0, 1.0, 1e-9, 1e-12, 50);
        assert!(matches!(no_bracket, Err(RootError::NoBracket { .. })));

        let failing = find_root(|_| Err::<f64, &str>("boom"), 0.0, 1.0, 1e-9, 1e-12, 50);
        assert_eq!(failing, Err(RootError::Evaluation("boom")));

        // Step function: the bracket collapses without meeting the tolerance
        let step = find_root(|x| Ok::<f64, ()>(if x < 0.3 { -1.0 } else { 1.0 }), 0.0, 1.0, 1e-9, 1e-9, 200);
        match step {
            Err(RootError::Exhausted { lo, hi, .. }) => assert!(lo <= 0.3 && hi >= 0.3),
            other => panic!("expected exhausted search, got {:?}", other),
        }
    }

    #[test]
    fn test_loaded_simple_hull_floats() {
        let hull = simple_v();
        let weight = loaded_weight(&hull, 2.5);
        let solver = EquilibriumSolver::new(&hull, SolverSettings::default());
        let state = solver.solve_waterline(&weight, Attitude::UPRIGHT).unwrap();

        assert!(state.waterline_z > 0.0 && state.waterline_z < 0.28);
        let volume = HullIntegrator::new(&hull, Attitude::UPRIGHT).volume(state.waterline_z);
        assert!((volume * 1000.0 - 90.0).abs() <= 1e-4);
        assert!(state.mass_residual.abs() <= 1e-4);
        assert_abs_diff_eq!(state.center_of_buoyancy.x, 2.5, epsilon = 1e-6);
        assert_abs_diff_eq!(state.righting_arm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_overload_and_zero_mass_fail() {
        let hull = simple_v();
        let solver = EquilibriumSolver::new(&hull, SolverSettings::default());

        let heavy = Weight::new(300.0, Point3::new(2.5, 0.0, 0.2));
        let err = solver.solve_waterline(&heavy, Attitude::UPRIGHT).unwrap_err();
        assert!(err.is_convergence_failure());

        let empty = Weight::new(0.0, Point3::new(2.5, 0.0, 0.2));
        let err = solver.solve_waterline(&empty, Attitude::UPRIGHT).unwrap_err();
        assert_eq!(err.error_code(), "CONVERGENCE_ERROR");
    }

    #[test]
    fn test_symmetric_loading_needs_no_trim() {
        let hull = simple_v();
        let weight = loaded_weight(&hull, 2.5);
        let solver = EquilibriumSolver::new(&hull, SolverSettings::default());
        let state = solver.solve_with_trim(&weight, 0.0).unwrap();
        assert!(state.trim_deg().abs() < 0.01);
        assert!(state.moment_residual.abs() <= 1e-3);
    }

    #[test]
    fn test_aft_paddler_trims_by_the_stern() {
        let hull = simple_v();
        let weight = loaded_weight(&hull, 2.2);
        let solver = EquilibriumSolver::new(&hull, SolverSettings::default());
        let state = solver.solve(&weight, 0.0, TrimMode::SolveEachAngle).unwrap();
        assert!(state.trim_deg() < 0.0);
        assert!(state.moment_residual.abs() <= 1e-3);
        assert!(state.mass_residual.abs() <= 1e-4);
        assert!(state.trim_iterations > 0);
        assert_abs_diff_eq!(state.center_of_buoyancy.x, state.center_of_gravity.x, epsilon = 1e-4);
    }

    #[test]
    fn test_fixed_trim_mode_holds_angle() {
        let hull = simple_v();
        let weight = loaded_weight(&hull, 2.2);
        let solver = EquilibriumSolver::new(&hull, SolverSettings::default());
        let state = solver.solve(&weight, 10.0, TrimMode::Fixed { angle_deg: 0.5 }).unwrap();
        assert_eq!(state.attitude, Attitude::new(10.0, 0.5));
        assert!(state.mass_residual.abs() <= 1e-4);
    }

    #[test]
    fn test_resolve_trim_fixes_upright_trim() {
        let hull = simple_v();
        let weight = loaded_weight(&hull, 2.2);
        let solver = EquilibriumSolver::new(&hull, SolverSettings::default());

        let resolved = solver.resolve_trim(&weight, TrimMode::HoldUpright).unwrap();
        let upright = solver.solve_with_trim(&weight, 0.0).unwrap();
        assert_eq!(
            resolved,
            TrimMode::Fixed {
                angle_deg: upright.trim_deg()
            }
        );

        let held = solver.solve(&weight, 15.0, TrimMode::HoldUpright).unwrap();
        let fixed = solver.solve(&weight, 15.0, resolved).unwrap();
        assert_eq!(held.attitude, fixed.attitude);
        assert_eq!(held.waterline_z, fixed.waterline_z);

        let other = TrimMode::Fixed { angle_deg: 1.0 };
        assert_eq!(solver.resolve_trim(&weight, other).unwrap(), other);
    }
}

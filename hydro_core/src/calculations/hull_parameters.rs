//! # Hull Form Parameters
//!
//! Principal dimensions and form coefficients at an equilibrium:
//!
//! | Coefficient | Definition |
//! |---|---|
//! | Block `Cb` | V / (Lwl · Bwl · T) |
//! | Prismatic `Cp` | V / (Amax · Lwl) |
//! | Midship `Cm` | Amax / (Bwl · T) |
//! | Waterplane `Cwp` | Awp / (Lwl · Bwl) |
//!
//! A coefficient whose denominator vanishes is reported as 0.

use serde::{Deserialize, Serialize};

use super::hydrostatics::draft;
use crate::geometry::Hull;
use crate::hydrostatics::EquilibriumState;

/// Dimensions in m, areas in m², volume in m³.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HullParameters {
    pub length_overall: f64,
    pub beam: f64,
    pub depth: f64,
    pub waterline_length: f64,
    pub waterline_beam: f64,
    pub draft: f64,
    pub volume: f64,
    pub waterplane_area: f64,
    pub max_section_area: f64,
    pub wetted_surface: f64,
    pub block_coefficient: f64,
    pub prismatic_coefficient: f64,
    pub midship_coefficient: f64,
    pub waterplane_coefficient: f64,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > f64::EPSILON {
        numerator / denominator
    } else {
        0.0
    }
}

/// Form parameters of `hull` floating at `state`.
pub fn calculate(hull: &Hull, state: &EquilibriumState) -> HullParameters {
    let submerged = &state.submerged;
    let lwl = submerged.waterline_length;
    let bwl = submerged.max_waterline_breadth;
    let t = draft(hull, state);
    let volume = submerged.volume;
    let amax = submerged.max_section_area;
    let awp = submerged.waterplane_area;

    HullParameters {
        length_overall: hull.length(),
        beam: hull.beam(),
        depth: hull.depth(),
        waterline_length: lwl,
        waterline_beam: bwl,
        draft: t,
        volume,
        waterplane_area: awp,
        max_section_area: amax,
        wetted_surface: submerged.wetted_surface,
        block_coefficient: ratio(volume, lwl * bwl * t),
        prismatic_coefficient: ratio(volume, amax * lwl),
        midship_coefficient: ratio(amax, bwl * t),
        waterplane_coefficient: ratio(awp, lwl * bwl),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::hydrostatics::{solve_upright, HydrostaticsInput};
    use crate::geometry::hull::tests::simple_v;
    use crate::geometry::{LoadingCondition, Point3};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_simple_v_coefficients() {
        let hull = simple_v();
        let input = HydrostaticsInput {
            loading: LoadingCondition::new().with_item("Paddler", 80.0, Point3::new(2.5, 0.0, 0.25)),
            ..HydrostaticsInput::default()
        };
        let state = solve_upright(&hull, &input).unwrap();
        let params = calculate(&hull, &state);

        assert_abs_diff_eq!(params.length_overall, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(params.beam, 0.6, epsilon = 1e-12);
        // Triangular midship section
        assert_abs_diff_eq!(params.midship_coefficient, 0.5, epsilon = 1e-6);
        for c in [
            params.block_coefficient,
            params.prismatic_coefficient,
            params.waterplane_coefficient,
        ] {
            assert!(c > 0.0 && c < 1.0, "coefficient {c}");
        }
        assert!(params.waterline_length < params.length_overall);
        assert!(params.draft < params.depth);
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(ratio(1.0, 0.0), 0.0);
        assert_eq!(ratio(0.3, 0.6), 0.5);
    }
}

//! # Hull Integrator
//!
//! Submerged volume and center of buoyancy of a hull at a given attitude and
//! world waterline height.
//!
//! Heel is applied to every station profile up front (rotation about the
//! longitudinal axis keeps a profile on its station). Trim about the
//! transverse axis through the rotation origin O is folded into the clipping
//! height, which is exact:
//!
//! ```text
//! world z = O.z - (x - O.x)·sin θ + (z' - O.z)·cos θ ≤ z_wl
//!   ⇔  z' ≤ O.z + ((z_wl - O.z) + (x - O.x)·sin θ) / cos θ
//! ```
//!
//! Station quantities are integrated along x in the heeled frame; the
//! centroid is then rotated by the trim to give world coordinates, and
//! un-heeled to give hull-frame coordinates.

use serde::{Deserialize, Serialize};

use super::integration::{integrate, IntegrationRule};
use super::section::{submerged_properties, SectionProperties};
use crate::geometry::{Hull, Point3, Profile};
use crate::units::{Degrees, Radians};

/// Volumes below this (m³) are treated as dry
const DRY_VOLUME: f64 = 1e-15;

/// Heel and trim of the hull, in degrees.
///
/// Positive heel lowers the starboard (+y) side, positive trim lowers the +x end.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Attitude {
    pub heel_deg: f64,
    pub trim_deg: f64,
}

impl Attitude {
    pub const UPRIGHT: Attitude = Attitude {
        heel_deg: 0.0,
        trim_deg: 0.0,
    };

    pub fn new(heel_deg: f64, trim_deg: f64) -> Self {
        Attitude { heel_deg, trim_deg }
    }

    pub fn heel(&self) -> Radians {
        Degrees(self.heel_deg).into()
    }

    pub fn trim(&self) -> Radians {
        Degrees(self.trim_deg).into()
    }
}

/// Integrated submerged properties at one waterline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmergedVolume {
    pub waterline_z: f64,
    pub attitude: Attitude,
    /// m³
    pub volume: f64,
    /// World frame; None when dry
    pub center_of_buoyancy: Option<Point3>,
    /// Hull frame; None when dry
    pub center_of_buoyancy_hull: Option<Point3>,
    /// First and last stations with submerged area
    pub wetted_extent: Option<(f64, f64)>,
    pub waterline_length: f64,
    pub max_waterline_breadth: f64,
    pub max_section_area: f64,
    pub waterplane_area: f64,
    /// Girth-integrated wetted surface, m²
    pub wetted_surface: f64,
    /// Transverse second moment of the waterplane about the centerline, m⁴
    pub waterplane_inertia: f64,
    pub rule: IntegrationRule,
}

/// Integrates a hull at a fixed attitude for any waterline height.
#[derive(Debug, Clone)]
pub struct HullIntegrator<'a> {
    hull: &'a Hull,
    attitude: Attitude,
    origin: Point3,
    heeled: Vec<Profile>,
}

impl<'a> HullIntegrator<'a> {
    pub fn new(hull: &'a Hull, attitude: Attitude) -> Self {
        let origin = hull.rotation_origin();
        let heel = attitude.heel();
        let heeled = hull.profiles().iter().map(|p| p.heeled(&origin, heel)).collect();
        HullIntegrator {
            hull,
            attitude,
            origin,
            heeled,
        }
    }

    pub fn attitude(&self) -> Attitude {
        self.attitude
    }

    /// Lowest and highest world z of the rotated hull
    pub fn vertical_extent(&self) -> (f64, f64) {
        let trim = self.attitude.trim();
        self.heeled
            .iter()
            .flat_map(|p| p.points().iter())
            .map(|p| p.trimmed(&self.origin, trim).z)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), z| (lo.min(z), hi.max(z)))
    }

    /// Clipping height in the heeled frame at `station` for a world waterline
    fn clip_height(&self, station: f64, waterline_z: f64) -> f64 {
        let (sin, cos) = self.attitude.trim().sin_cos();
        self.origin.z + ((waterline_z - self.origin.z) + (station - self.origin.x) * sin) / cos
    }

    fn sections(&self, waterline_z: f64) -> Vec<SectionProperties> {
        self.heeled
            .iter()
            .map(|p| submerged_properties(p, self.clip_height(p.station(), waterline_z)))
            .collect()
    }

    /// Submerged volume only
    pub fn volume(&self, waterline_z: f64) -> f64 {
        let areas: Vec<f64> = self.sections(waterline_z).iter().map(|s| s.area).collect();
        integrate(self.hull.stations(), &areas).0
    }

    /// Full set of submerged properties at `waterline_z` (world frame).
    pub fn submerged(&self, waterline_z: f64) -> SubmergedVolume {
        let xs = self.hull.stations();
        let sections = self.sections(waterline_z);
        let areas = column(&sections, |s| s.area);
        let (volume, rule) = integrate(xs, &areas);
        let x_moments: Vec<f64> = xs.iter().zip(&areas).map(|(x, a)| x * a).collect();
        let mx = integrate(xs, &x_moments).0;
        let my = integrate(xs, &column(&sections, |s| s.moment_y)).0;
        let mz = integrate(xs, &column(&sections, |s| s.moment_z)).0;

        let heel = self.attitude.heel();
        let trim = self.attitude.trim();
        let (center_of_buoyancy, center_of_buoyancy_hull) = if volume > DRY_VOLUME {
            let heeled_frame = Point3::new(mx / volume, my / volume, mz / volume);
            (
                Some(heeled_frame.trimmed(&self.origin, trim)),
                Some(heeled_frame.heeled(&self.origin, Radians(-heel.0))),
            )
        } else {
            (None, None)
        };

        let wet: Vec<f64> = xs
            .iter()
            .zip(&areas)
            .filter(|(_, a)| **a > 0.0)
            .map(|(x, _)| *x)
            .collect();
        let wetted_extent = wet.first().zip(wet.last()).map(|(a, b)| (*a, *b));

        let cos_trim = trim.0.cos();
        SubmergedVolume {
            waterline_z,
            attitude: self.attitude,
            volume,
            center_of_buoyancy,
            center_of_buoyancy_hull,
            wetted_extent,
            waterline_length: wetted_extent.map(|(a, b)| b - a).unwrap_or(0.0),
            max_waterline_breadth: sections.iter().map(|s| s.waterline_breadth).fold(0.0, f64::max),
            max_section_area: areas.iter().copied().fold(0.0, f64::max),
            waterplane_area: integrate(xs, &column(&sections, |s| s.waterline_breadth)).0 / cos_trim,
            wetted_surface: integrate(xs, &column(&sections, |s| s.wetted_perimeter)).0,
            waterplane_inertia: integrate(xs, &column(&sections, |s| s.waterline_inertia)).0 / cos_trim,
            rule,
        }
    }
}

fn column(sections: &[SectionProperties], f: impl Fn(&SectionProperties) -> f64) -> Vec<f64> {
    sections.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::hull::tests::simple_v;
    use approx::assert_abs_diff_eq;

    /// Closed form for the two-curve V hull: sections are similar triangles
    /// with half-breadth (0.3 / 0.28)·h, keel at 0.3·u², u = (x - 2.5) / 2.5.
    fn analytic_volume(waterline_z: f64) -> f64 {
        let k = 0.30 / 0.28;
        let u0 = (waterline_z / 0.30).sqrt();
        k * 2.5 * (16.0 / 15.0) * waterline_z * waterline_z * u0
    }

    #[test]
    fn test_volume_matches_closed_form() {
        let hull = simple_v();
        let integrator = HullIntegrator::new(&hull, Attitude::UPRIGHT);
        for wl in [0.1, 0.2, 0.25] {
            let v = integrator.volume(wl);
            let exact = analytic_volume(wl);
            assert!((v - exact).abs() / exact < 0.01, "wl {wl}: {v} vs {exact}");
        }
    }

    #[test]
    fn test_dry_and_full() {
        let hull = simple_v();
        let integrator = HullIntegrator::new(&hull, Attitude::UPRIGHT);
        let dry = integrator.submerged(-0.05);
        assert_eq!(dry.volume, 0.0);
        assert!(dry.center_of_buoyancy.is_none());
        assert!(dry.wetted_extent.is_none());

        // Fully immersed: 0.084·2.5·16/15 = 0.224 m³
        let full = integrator.submerged(1.0);
        assert!((full.volume - 0.224).abs() < 0.003);
    }

    #[test]
    fn test_upright_center_of_buoyancy() {
        let hull = simple_v();
        let integrator = HullIntegrator::new(&hull, Attitude::UPRIGHT);
        let s = integrator.submerged(0.2);
        let cb = s.center_of_buoyancy.unwrap();
        assert_abs_diff_eq!(cb.x, 2.5, epsilon = 1e-9);
        assert_abs_diff_eq!(cb.y, 0.0, epsilon = 1e-12);
        // VCB = wl·(1 - 0.857/3) for this hull
        assert!((cb.z - 0.2 * (1.0 - 6.0 / 7.0 / 3.0)).abs() < 0.003);
        assert_eq!(s.center_of_buoyancy_hull, s.center_of_buoyancy);
        assert_eq!(s.rule, IntegrationRule::Simpson);
    }

    #[test]
    fn test_heel_preserves_full_volume() {
        let hull = simple_v();
        let upright = HullIntegrator::new(&hull, Attitude::UPRIGHT).volume(10.0);
        let heeled = HullIntegrator::new(&hull, Attitude::new(40.0, 0.0)).volume(10.0);
        assert_abs_diff_eq!(upright, heeled, epsilon = 1e-12);
    }

    #[test]
    fn test_trim_moves_buoyancy_toward_low_end() {
        let hull = simple_v();
        let level = HullIntegrator::new(&hull, Attitude::UPRIGHT).submerged(0.2);
        let trimmed = HullIntegrator::new(&hull, Attitude::new(0.0, 1.0)).submerged(0.2);
        let hull_frame = trimmed.center_of_buoyancy_hull.unwrap();
        assert!(hull_frame.x > level.center_of_buoyancy.unwrap().x);
    }

    #[test]
    fn test_heeled_extent_is_lower() {
        let hull = simple_v();
        let (lo0, _) = HullIntegrator::new(&hull, Attitude::UPRIGHT).vertical_extent();
        // Past ~75° the starboard gunwale drops below the keel
        let (lo80, _) = HullIntegrator::new(&hull, Attitude::new(80.0, 0.0)).vertical_extent();
        assert!(lo80 < lo0);
        assert_abs_diff_eq!(lo0, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_waterplane_quantities() {
        let hull = simple_v();
        let s = HullIntegrator::new(&hull, Attitude::UPRIGHT).submerged(0.2);
        assert!(s.waterplane_area > 0.0);
        assert!(s.wetted_surface > s.waterplane_area);
        assert!(s.waterline_length > 3.0 && s.waterline_length < 5.0);
        assert_abs_diff_eq!(s.max_waterline_breadth, 2.0 * 0.30 / 0.28 * 0.2, epsilon = 1e-3);
    }
}

//! # Cross-Section Integrator
//!
//! Submerged properties of one profile polygon below a horizontal waterline.
//!
//! ## Notation
//!
//! - `A` = Submerged area
//! - `Qy` = First moment of area about the centerline, ∫ y dA
//! - `Qz` = First moment of area about z = 0, ∫ z dA
//! - `P` = Wetted perimeter (hull edges below the waterline)
//! - `b` = Waterline breadth, `It` = its second moment about y = 0
//!
//! ## Method
//!
//! The polygon is clipped to the half-plane z ≤ z_wl (straddling edges are cut
//! at the waterline, the cut is closed along the waterline) and the clipped
//! polygon is integrated with the shoelace formulas. With the waterline above
//! the whole profile the clip is the identity, below it the clip is empty, and
//! in between every quantity varies continuously with z_wl.
//!
//! ```text
//!        ●───────────────●        deck (closing edge)
//!         ╲             ╱
//!   ~~~~~~~●~~~~~~~~~~~●~~~~~~~   z_wl
//!           ╲  A, Qy,  ╱
//!            ╲  Qz    ╱  P = submerged hull edges only
//!             ╲______╱
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::Profile;

/// Submerged properties of one station.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionProperties {
    pub waterline_z: f64,
    pub area: f64,
    /// ∫ y dA
    pub moment_y: f64,
    /// ∫ z dA
    pub moment_z: f64,
    pub wetted_perimeter: f64,
    pub waterline_breadth: f64,
    /// ∫ y² dy over the waterline, about the centerline
    pub waterline_inertia: f64,
}

impl SectionProperties {
    /// First moment of area about the waterline, ∫ (z - z_wl) dA (never positive)
    pub fn moment_about_waterline(&self) -> f64 {
        self.moment_z - self.area * self.waterline_z
    }

    /// Centroid (y, z) of the submerged area, None when dry
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.area > 0.0 {
            Some((self.moment_y / self.area, self.moment_z / self.area))
        } else {
            None
        }
    }
}

/// Area and first moments of a closed polygon (shoelace)
///
/// # Formula
/// ```text
/// c_i = y_i·z_(i+1) - y_(i+1)·z_i
/// A   = ½ Σ c_i
/// Qy  = ⅙ Σ (y_i + y_(i+1))·c_i
/// Qz  = ⅙ Σ (z_i + z_(i+1))·c_i
/// ```
///
/// Results are normalized to a positive area whatever the winding.
///
/// # Example
/// ```rust
/// use hydro_core::hydrostatics::section::polygon_area_moments;
///
/// // Unit square with its corner at (1, 2)
/// let (a, qy, qz) = polygon_area_moments(&[(1.0, 2.0), (2.0, 2.0), (2.0, 3.0), (1.0, 3.0)]);
/// assert!((a - 1.0).abs() < 1e-12);
/// assert!((qy - 1.5).abs() < 1e-12);
/// assert!((qz - 2.5).abs() < 1e-12);
/// ```
pub fn polygon_area_moments(points: &[(f64, f64)]) -> (f64, f64, f64) {
    let n = points.len();
    if n < 3 {
        return (0.0, 0.0, 0.0);
    }
    let (mut twice_area, mut qy6, mut qz6) = (0.0, 0.0, 0.0);
    for i in 0..n {
        let (y0, z0) = points[i];
        let (y1, z1) = points[(i + 1) % n];
        let cross = y0 * z1 - y1 * z0;
        twice_area += cross;
        qy6 += (y0 + y1) * cross;
        qz6 += (z0 + z1) * cross;
    }
    let sign = if twice_area < 0.0 { -1.0 } else { 1.0 };
    (sign * twice_area / 2.0, sign * qy6 / 6.0, sign * qz6 / 6.0)
}

/// Clip a closed polygon to z ≤ `waterline_z` (Sutherland–Hodgman, one plane)
pub fn clip_below(points: &[(f64, f64)], waterline_z: f64) -> Vec<(f64, f64)> {
    let n = points.len();
    let mut clipped = Vec::with_capacity(n + 2);
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let a_in = a.1 <= waterline_z;
        let b_in = b.1 <= waterline_z;
        if a_in != b_in {
            clipped.push(waterline_crossing(a, b, waterline_z));
        }
        if b_in {
            clipped.push(b);
        }
    }
    clipped
}

#[inline]
fn waterline_crossing(a: (f64, f64), b: (f64, f64), waterline_z: f64) -> (f64, f64) {
    // a.1 != b.1 because exactly one end is submerged
    let t = (waterline_z - a.1) / (b.1 - a.1);
    (a.0 + t * (b.0 - a.0), waterline_z)
}

/// Length of the polygon's edges lying below the waterline
fn wetted_perimeter(points: &[(f64, f64)], waterline_z: f64) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    let mut perimeter = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let length = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
        let (lo, hi) = if a.1 <= b.1 { (a.1, b.1) } else { (b.1, a.1) };
        if hi <= waterline_z {
            perimeter += length;
        } else if lo < waterline_z {
            perimeter += length * (waterline_z - lo) / (hi - lo);
        }
    }
    perimeter
}

/// Breadth and transverse second moment of the waterline cut
fn waterline_cut(points: &[(f64, f64)], waterline_z: f64) -> (f64, f64) {
    let n = points.len();
    let mut crossings: Vec<f64> = Vec::new();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        if (a.1 <= waterline_z) != (b.1 <= waterline_z) {
            crossings.push(waterline_crossing(a, b, waterline_z).0);
        }
    }
    crossings.sort_by(f64::total_cmp);
    crossings.chunks_exact(2).fold((0.0, 0.0), |(breadth, inertia), pair| {
        let (y0, y1) = (pair[0], pair[1]);
        (breadth + (y1 - y0), inertia + (y1.powi(3) - y0.powi(3)) / 3.0)
    })
}

/// Submerged properties of `profile` below `waterline_z`.
///
/// # Example
/// ```rust
/// use hydro_core::geometry::{Point3, Profile};
/// use hydro_core::hydrostatics::section::submerged_properties;
///
/// // 0.6 m wide, 0.3 m deep box section
/// let profile = Profile::new(1.0, vec![
///     Point3::new(1.0, -0.3, 0.3),
///     Point3::new(1.0, -0.3, 0.0),
///     Point3::new(1.0, 0.3, 0.0),
///     Point3::new(1.0, 0.3, 0.3),
/// ])?;
/// let s = submerged_properties(&profile, 0.1);
/// assert!((s.area - 0.06).abs() < 1e-12);
/// assert!((s.wetted_perimeter - 0.8).abs() < 1e-12);
/// assert!((s.waterline_breadth - 0.6).abs() < 1e-12);
/// # Ok::<(), hydro_core::HydroError>(())
/// ```
pub fn submerged_properties(profile: &Profile, waterline_z: f64) -> SectionProperties {
    let points = profile.yz();
    let (area, moment_y, moment_z) = polygon_area_moments(&clip_below(&points, waterline_z));
    let (waterline_breadth, waterline_inertia) = waterline_cut(&points, waterline_z);
    SectionProperties {
        waterline_z,
        area,
        moment_y,
        moment_z,
        wetted_perimeter: wetted_perimeter(&points, waterline_z),
        waterline_breadth,
        waterline_inertia,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;
    use approx::assert_abs_diff_eq;

    /// Triangle: keel at the origin, gunwales at (±0.3, 0.28)
    fn v_section() -> Profile {
        Profile::new(
            2.5,
            vec![
                Point3::new(2.5, -0.30, 0.28),
                Point3::new(2.5, 0.0, 0.0),
                Point3::new(2.5, 0.30, 0.28),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_full_submersion_matches_shoelace() {
        let profile = v_section();
        let (a, qy, qz) = polygon_area_moments(&profile.yz());
        let s = submerged_properties(&profile, 1.0);
        assert_abs_diff_eq!(s.area, a, epsilon = 1e-15);
        assert_abs_diff_eq!(s.area, 0.084, epsilon = 1e-12);
        assert_abs_diff_eq!(s.moment_y, qy, epsilon = 1e-15);
        assert_abs_diff_eq!(s.moment_z, qz, epsilon = 1e-15);
        // Centroid of the triangle is 2/3 of the way up
        let (cy, cz) = s.centroid().unwrap();
        assert_abs_diff_eq!(cy, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cz, 0.28 * 2.0 / 3.0, epsilon = 1e-12);
        // All three edges wetted once fully submerged
        assert_abs_diff_eq!(s.wetted_perimeter, 0.6 + 2.0 * (0.09f64 + 0.0784).sqrt(), epsilon = 1e-12);
        assert_eq!(s.waterline_breadth, 0.0);
    }

    #[test]
    fn test_dry_section_is_zero() {
        let s = submerged_properties(&v_section(), -0.01);
        assert_eq!(s.area, 0.0);
        assert_eq!(s.moment_y, 0.0);
        assert_eq!(s.wetted_perimeter, 0.0);
        assert!(s.centroid().is_none());
        assert_eq!(submerged_properties(&v_section(), 0.0).area, 0.0);
    }

    #[test]
    fn test_partial_submersion_of_v() {
        // Similar triangle: area scales with (h / 0.28)²
        let h = 0.14;
        let s = submerged_properties(&v_section(), h);
        assert_abs_diff_eq!(s.area, 0.084 * 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(s.centroid().unwrap().1, h * 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.waterline_breadth, 0.30, epsilon = 1e-12);
        assert_abs_diff_eq!(s.moment_about_waterline(), -s.area * h / 3.0, epsilon = 1e-12);
        // Breadth b = 0.3 centred on y = 0: It = b³/12
        assert_abs_diff_eq!(s.waterline_inertia, 0.3f64.powi(3) / 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_continuous_through_vertex() {
        let profile = Profile::new(
            0.0,
            vec![
                Point3::new(0.0, -0.3, 0.3),
                Point3::new(0.0, -0.2, 0.1),
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.2, 0.1),
                Point3::new(0.0, 0.3, 0.3),
            ],
        )
        .unwrap();
        let below = submerged_properties(&profile, 0.1 - 1e-9);
        let at = submerged_properties(&profile, 0.1);
        let above = submerged_properties(&profile, 0.1 + 1e-9);
        assert!((at.area - below.area).abs() < 1e-8);
        assert!((above.area - at.area).abs() < 1e-8);
        assert!((above.wetted_perimeter - below.wetted_perimeter).abs() < 1e-7);
    }

    #[test]
    fn test_heeled_section_moves_centroid_to_low_side() {
        let heeled = v_section().heeled(&Point3::new(2.5, 0.0, 0.0), crate::units::Degrees(20.0).into());
        let s = submerged_properties(&heeled, 0.1);
        assert!(s.centroid().unwrap().0 > 0.0);
    }

    #[test]
    fn test_winding_does_not_matter() {
        let ccw = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert_eq!(polygon_area_moments(&ccw), polygon_area_moments(&cw));
    }
}

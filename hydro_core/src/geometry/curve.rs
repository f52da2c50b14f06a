//! # Curve Interpolator
//!
//! A [`Curve`] is one named longitudinal feature of the hull (keel, chine,
//! gunwale...) given by control points with strictly increasing x. The fitted
//! curve passes through every control point; y and z are interpolated as
//! functions of x with [`Spline1D`].
//!
//! ## Behaviour
//!
//! - Evaluation outside `[x_min, x_max]` is a [`HydroError::Domain`] unless
//!   extrapolation is explicitly requested.
//! - A single-point curve is an apex: it evaluates to its point everywhere.
//! - Arc-length resampling walks the 3D path, keeps both endpoints exactly and
//!   returns points with non-decreasing x.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::geometry::{Curve, Point3, SplineKind};
//!
//! let keel = Curve::new(
//!     "keel",
//!     vec![Point3::new(0.0, 0.0, 0.30), Point3::new(2.5, 0.0, 0.0), Point3::new(5.0, 0.0, 0.30)],
//!     SplineKind::Monotone,
//! )?;
//! assert_eq!(keel.evaluate(2.5)?.z, 0.0);
//! assert!(keel.evaluate(6.0).is_err());
//! # Ok::<(), hydro_core::HydroError>(())
//! ```

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::point::Point3;
use super::spline::{Spline1D, SplineKind};
use crate::errors::{HydroError, HydroResult};

/// Chord samples per control interval when measuring arc length
const ARC_SAMPLES_PER_SEGMENT: usize = 32;

/// Slack allowed on the x-range before evaluation is a domain error
const DOMAIN_TOLERANCE: f64 = 1e-9;

/// Serializable curve as it appears in a hull definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveDefinition {
    pub name: String,
    pub points: Vec<Point3>,
    #[serde(default)]
    pub kind: SplineKind,
}

impl CurveDefinition {
    pub fn new(name: impl Into<String>, points: Vec<Point3>) -> Self {
        CurveDefinition {
            name: name.into(),
            points,
            kind: SplineKind::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct CurveFit {
    y: Spline1D,
    z: Spline1D,
}

/// A validated longitudinal curve with a lazily fitted interpolant.
#[derive(Debug, Clone)]
pub struct Curve {
    name: String,
    points: Vec<Point3>,
    kind: SplineKind,
    fit: OnceCell<CurveFit>,
}

impl Curve {
    /// Validate control points and build a curve.
    ///
    /// Requires at least one point, finite coordinates and strictly increasing x.
    pub fn new(name: impl Into<String>, points: Vec<Point3>, kind: SplineKind) -> HydroResult<Self> {
        let name = name.into();
        if points.is_empty() {
            return Err(HydroError::invalid_input(
                format!("curves.{name}.points"),
                "[]",
                "A curve needs at least one control point",
            ));
        }
        if let Some(p) = points.iter().find(|p| !p.is_finite()) {
            return Err(HydroError::invalid_input(
                format!("curves.{name}.points"),
                format!("{:?}", p),
                "Control point coordinates must be finite",
            ));
        }
        if let Some(w) = points.windows(2).find(|w| w[1].x <= w[0].x) {
            return Err(HydroError::invalid_input(
                format!("curves.{name}.points"),
                format!("x = {} then x = {}", w[0].x, w[1].x),
                "Control point x values must be strictly increasing",
            ));
        }
        Ok(Curve {
            name,
            points,
            kind,
            fit: OnceCell::new(),
        })
    }

    pub fn from_definition(definition: &CurveDefinition) -> HydroResult<Self> {
        Curve::new(definition.name.clone(), definition.points.clone(), definition.kind)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn kind(&self) -> SplineKind {
        self.kind
    }

    /// A single-point curve closing the bow or stern
    pub fn is_apex(&self) -> bool {
        self.points.len() == 1
    }

    /// Every control point lies on y = 0
    pub fn is_centerline(&self) -> bool {
        self.points.iter().all(Point3::on_centerline)
    }

    pub fn x_range(&self) -> (f64, f64) {
        // Non-empty by construction
        let first = self.points[0].x;
        let last = self.points[self.points.len() - 1].x;
        (first, last)
    }

    /// True if `x` lies inside the control-point range
    pub fn covers(&self, x: f64) -> bool {
        let (lo, hi) = self.x_range();
        x >= lo - DOMAIN_TOLERANCE && x <= hi + DOMAIN_TOLERANCE
    }

    /// The first control point lies on the centerline
    pub fn closes_at_start(&self) -> bool {
        self.points[0].on_centerline()
    }

    /// The last control point lies on the centerline
    pub fn closes_at_end(&self) -> bool {
        self.points[self.points.len() - 1].on_centerline()
    }

    fn fit(&self) -> &CurveFit {
        self.fit.get_or_init(|| {
            let xs: Vec<f64> = self.points.iter().map(|p| p.x).collect();
            let ys: Vec<f64> = self.points.iter().map(|p| p.y).collect();
            let zs: Vec<f64> = self.points.iter().map(|p| p.z).collect();
            CurveFit {
                y: Spline1D::new(xs.clone(), ys, self.kind),
                z: Spline1D::new(xs, zs, self.kind),
            }
        })
    }

    /// Evaluate the curve at station `x`.
    pub fn evaluate(&self, x: f64) -> HydroResult<Point3> {
        if self.is_apex() {
            return Ok(self.points[0]);
        }
        if !self.covers(x) {
            let (lo, hi) = self.x_range();
            return Err(HydroError::domain(&self.name, x, lo, hi));
        }
        let (lo, hi) = self.x_range();
        Ok(self.evaluate_extrapolated(x.clamp(lo, hi)))
    }

    /// Evaluate at `x`, extending the end cubics beyond the control points.
    pub fn evaluate_extrapolated(&self, x: f64) -> Point3 {
        if self.is_apex() {
            return self.points[0];
        }
        let fit = self.fit();
        Point3::new(x, fit.y.evaluate(x), fit.z.evaluate(x))
    }

    /// `n` points equally spaced in x (n ≥ 2)
    pub fn sample(&self, n: usize) -> HydroResult<Vec<Point3>> {
        require_sample_count(&self.name, n)?;
        if self.is_apex() {
            return Ok(vec![self.points[0]; n]);
        }
        let (lo, hi) = self.x_range();
        let step = (hi - lo) / (n - 1) as f64;
        Ok((0..n)
            .map(|i| self.evaluate_extrapolated(if i == n - 1 { hi } else { lo + step * i as f64 }))
            .collect())
    }

    /// Cumulative chord-length table along the fitted path: (x, arc length)
    fn arc_table(&self) -> Vec<(f64, f64)> {
        let mut table = Vec::with_capacity((self.points.len() - 1) * ARC_SAMPLES_PER_SEGMENT + 1);
        let mut prev = self.points[0];
        let mut length = 0.0;
        table.push((prev.x, 0.0));
        for w in self.points.windows(2) {
            for k in 1..=ARC_SAMPLES_PER_SEGMENT {
                let x = w[0].x + (w[1].x - w[0].x) * k as f64 / ARC_SAMPLES_PER_SEGMENT as f64;
                let p = self.evaluate_extrapolated(x);
                length += prev.distance_to(&p);
                table.push((x, length));
                prev = p;
            }
        }
        table
    }

    /// 3D arc length of the fitted curve
    pub fn length(&self) -> f64 {
        if self.is_apex() {
            return 0.0;
        }
        self.arc_table().last().map(|&(_, s)| s).unwrap_or(0.0)
    }

    /// Resample into `n` points at uniform arc length.
    pub fn resample_arc_length(&self, n: usize) -> HydroResult<Vec<Point3>> {
        require_sample_count(&self.name, n)?;
        if self.is_apex() {
            return Ok(vec![self.points[0]; n]);
        }
        let table = self.arc_table();
        let total = table[table.len() - 1].1;
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if total <= f64::EPSILON {
            return Ok(vec![first; n]);
        }

        let mut out = Vec::with_capacity(n);
        out.push(first);
        let mut j = 0;
        for k in 1..n - 1 {
            let target = total * k as f64 / (n - 1) as f64;
            while j + 1 < table.len() - 1 && table[j + 1].1 < target {
                j += 1;
            }
            let (x0, s0) = table[j];
            let (x1, s1) = table[j + 1];
            let t = if s1 > s0 { (target - s0) / (s1 - s0) } else { 0.0 };
            out.push(self.evaluate_extrapolated(x0 + t * (x1 - x0)));
        }
        out.push(last);
        Ok(out)
    }

    /// Control points reflected across the centerline
    pub fn mirrored_points(&self) -> Vec<Point3> {
        self.points.iter().map(Point3::mirrored).collect()
    }
}

fn require_sample_count(name: &str, n: usize) -> HydroResult<()> {
    if n < 2 {
        return Err(HydroError::invalid_input(
            format!("curves.{name}.samples"),
            n.to_string(),
            "At least 2 samples are required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn gunwale() -> Curve {
        Curve::new(
            "gunwale",
            vec![
                Point3::new(0.0, 0.0, 0.30),
                Point3::new(1.0, 0.18, 0.28),
                Point3::new(2.0, 0.30, 0.28),
                Point3::new(3.0, 0.30, 0.28),
                Point3::new(4.0, 0.14, 0.28),
                Point3::new(5.0, 0.0, 0.30),
            ],
            SplineKind::Monotone,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_non_increasing_x() {
        let err = Curve::new(
            "bad",
            vec![Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 0.1, 0.0)],
            SplineKind::Monotone,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_rejects_empty_and_non_finite() {
        assert!(Curve::new("empty", vec![], SplineKind::Monotone).is_err());
        assert!(Curve::new("nan", vec![Point3::new(f64::NAN, 0.0, 0.0)], SplineKind::Monotone).is_err());
    }

    #[test]
    fn test_evaluate_hits_control_points() {
        let curve = gunwale();
        for p in curve.points() {
            let q = curve.evaluate(p.x).unwrap();
            assert_abs_diff_eq!(q.y, p.y, epsilon = 1e-12);
            assert_abs_diff_eq!(q.z, p.z, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_domain_error_outside_range() {
        let curve = gunwale();
        match curve.evaluate(5.5) {
            Err(HydroError::Domain { curve, x_max, .. }) => {
                assert_eq!(curve, "gunwale");
                assert_eq!(x_max, 5.0);
            }
            other => panic!("expected domain error, got {:?}", other),
        }
        // Explicit extrapolation is allowed
        let p = curve.evaluate_extrapolated(5.5);
        assert_eq!(p.x, 5.5);
    }

    #[test]
    fn test_apex_evaluates_everywhere() {
        let apex = Curve::new("bow", vec![Point3::new(5.1, 0.0, 0.32)], SplineKind::Monotone).unwrap();
        assert!(apex.is_apex());
        assert_eq!(apex.evaluate(-10.0).unwrap(), Point3::new(5.1, 0.0, 0.32));
        assert_eq!(apex.length(), 0.0);
    }

    #[test]
    fn test_resample_keeps_endpoints_and_is_monotone() {
        let curve = gunwale();
        let pts = curve.resample_arc_length(25).unwrap();
        assert_eq!(pts.len(), 25);
        assert_eq!(pts[0], curve.points()[0]);
        assert_eq!(pts[24], curve.points()[5]);
        assert!(pts.windows(2).all(|w| w[1].x >= w[0].x));
    }

    #[test]
    fn test_resample_is_uniform_in_arc_length() {
        let curve = gunwale();
        let pts = curve.resample_arc_length(11).unwrap();
        let gaps: Vec<f64> = pts.windows(2).map(|w| w[0].distance_to(&w[1])).collect();
        let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
        for gap in gaps {
            assert!((gap - mean).abs() < 0.01 * mean);
        }
    }

    #[test]
    fn test_length_of_straight_line() {
        let line = Curve::new(
            "line",
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 4.0, 0.0)],
            SplineKind::Natural,
        )
        .unwrap();
        assert_abs_diff_eq!(line.length(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sample_requires_two_points() {
        assert!(gunwale().sample(1).is_err());
        assert_eq!(gunwale().sample(6).unwrap().len(), 6);
    }

    #[test]
    fn test_centerline_closure() {
        let curve = gunwale();
        assert!(curve.closes_at_start());
        assert!(curve.closes_at_end());
        assert!(!curve.is_centerline());
    }
}

//! # Piecewise Cubic Splines
//!
//! One-dimensional interpolants `y(x)` over strictly increasing knots. Both
//! kinds are stored in cubic Hermite form (value and slope at each knot), so
//! evaluation is the same for either.
//!
//! ## Kinds
//!
//! - [`SplineKind::Monotone`]: shape-preserving (Fritsch–Carlson) slopes. C¹,
//!   never overshoots the data between knots. Hull curves default to this so a
//!   flat keel run stays flat.
//! - [`SplineKind::Natural`]: natural cubic spline (zero curvature at the ends).
//!   C², may overshoot.
//!
//! ```text
//!   y
//!   │      ●─────●            ● knots
//!   │    ╱         ╲
//!   │  ●             ●        Monotone: no bulge between
//!   │                           equal neighbouring knots
//!   └──────────────────── x
//! ```

use serde::{Deserialize, Serialize};

/// Interpolation scheme for a spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SplineKind {
    #[default]
    Monotone,
    Natural,
}

/// Cubic Hermite spline through `(xs[i], ys[i])`.
///
/// Knots must be strictly increasing; callers validate that before building.
#[derive(Debug, Clone, PartialEq)]
pub struct Spline1D {
    xs: Vec<f64>,
    ys: Vec<f64>,
    slopes: Vec<f64>,
}

impl Spline1D {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, kind: SplineKind) -> Self {
        debug_assert_eq!(xs.len(), ys.len());
        debug_assert!(xs.windows(2).all(|w| w[1] > w[0]));
        let slopes = match kind {
            SplineKind::Monotone => monotone_slopes(&xs, &ys),
            SplineKind::Natural => natural_slopes(&xs, &ys),
        };
        Spline1D { xs, ys, slopes }
    }

    pub fn x_min(&self) -> f64 {
        self.xs.first().copied().unwrap_or(0.0)
    }

    pub fn x_max(&self) -> f64 {
        self.xs.last().copied().unwrap_or(0.0)
    }

    /// Evaluate at `x`. Outside the knot range the end cubic is extended.
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        match n {
            0 => 0.0,
            1 => self.ys[0],
            _ => {
                // Segment i spans [xs[i], xs[i+1]]
                let i = self.xs.partition_point(|&k| k <= x).clamp(1, n - 1) - 1;
                let h = self.xs[i + 1] - self.xs[i];
                let t = (x - self.xs[i]) / h;
                hermite(t, h, self.ys[i], self.ys[i + 1], self.slopes[i], self.slopes[i + 1])
            }
        }
    }
}

/// Cubic Hermite basis on a segment of width `h` at local parameter `t`.
#[inline]
fn hermite(t: f64, h: f64, y0: f64, y1: f64, d0: f64, d1: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    h00 * y0 + h10 * h * d0 + h01 * y1 + h11 * h * d1
}

/// Secant slopes between consecutive knots
fn secants(xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<f64> = ys
        .windows(2)
        .zip(&h)
        .map(|(w, &hk)| (w[1] - w[0]) / hk)
        .collect();
    (h, delta)
}

/// Fritsch–Carlson slopes with the three-point end conditions.
fn monotone_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    if n < 2 {
        return vec![0.0; n];
    }
    let (h, delta) = secants(xs, ys);
    if n == 2 {
        return vec![delta[0], delta[0]];
    }

    let mut d = vec![0.0; n];
    for k in 1..n - 1 {
        let (d_prev, d_next) = (delta[k - 1], delta[k]);
        if d_prev * d_next > 0.0 {
            // Weighted harmonic mean
            let w1 = 2.0 * h[k] + h[k - 1];
            let w2 = h[k] + 2.0 * h[k - 1];
            d[k] = (w1 + w2) / (w1 / d_prev + w2 / d_next);
        }
    }
    d[0] = end_slope(h[0], h[1], delta[0], delta[1]);
    d[n - 1] = end_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    d
}

fn end_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if d.signum() != m0.signum() || m0 == 0.0 {
        0.0
    } else if m0.signum() != m1.signum() && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}

/// Slopes of the natural cubic spline, from its knot curvatures.
fn natural_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    if n < 2 {
        return vec![0.0; n];
    }
    let (h, delta) = secants(xs, ys);
    if n == 2 {
        return vec![delta[0], delta[0]];
    }

    // Tridiagonal system for interior curvatures M[1..n-1]; M[0] = M[n-1] = 0
    let m = n - 2;
    let mut diag = vec![0.0; m];
    let mut rhs = vec![0.0; m];
    for i in 0..m {
        diag[i] = 2.0 * (h[i] + h[i + 1]);
        rhs[i] = 6.0 * (delta[i + 1] - delta[i]);
    }
    // Thomas algorithm; off-diagonals are h[i+1]
    for i in 1..m {
        let w = h[i] / diag[i - 1];
        diag[i] -= w * h[i];
        rhs[i] -= w * rhs[i - 1];
    }
    let mut curvature = vec![0.0; n];
    for i in (0..m).rev() {
        let upper = if i + 1 < m { h[i + 1] * curvature[i + 2] } else { 0.0 };
        curvature[i + 1] = (rhs[i] - upper) / diag[i];
    }

    let mut d = vec![0.0; n];
    for i in 0..n - 1 {
        d[i] = delta[i] - h[i] * (2.0 * curvature[i] + curvature[i + 1]) / 6.0;
    }
    d[n - 1] = delta[n - 2] + h[n - 2] * (curvature[n - 2] + 2.0 * curvature[n - 1]) / 6.0;
    d
}

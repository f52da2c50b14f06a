//! # Longitudinal Quadrature
//!
//! Composite rules for integrating sampled station quantities along x.
//!
//! - Uniform spacing, even number of intervals: composite Simpson's rule
//! - Uniform spacing, odd number of intervals: Simpson on all but the last
//!   interval, trapezoid on the last
//! - Irregular spacing or fewer than 3 samples: composite trapezoid
//!
//! # Example
//! ```rust
//! use hydro_core::hydrostatics::integration::{integrate, IntegrationRule};
//!
//! let xs: Vec<f64> = (0..=10).map(|i| i as f64 * 0.1).collect();
//! let ys: Vec<f64> = xs.iter().map(|x| x * x).collect();
//! let (value, rule) = integrate(&xs, &ys);
//! assert_eq!(rule, IntegrationRule::Simpson);
//! assert!((value - 1.0 / 3.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

/// Relative tolerance on station spacing to count as uniform
const UNIFORM_SPACING_TOLERANCE: f64 = 1e-9;

/// Which composite rule produced an integral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrationRule {
    Simpson,
    /// Simpson with a trapezoidal final interval
    SimpsonTrapezoid,
    Trapezoid,
}

/// True if consecutive samples are equally spaced
pub fn is_uniform(xs: &[f64]) -> bool {
    if xs.len() < 3 {
        return true;
    }
    let h = (xs[xs.len() - 1] - xs[0]) / (xs.len() - 1) as f64;
    xs.windows(2)
        .all(|w| ((w[1] - w[0]) - h).abs() <= UNIFORM_SPACING_TOLERANCE * h.abs().max(1.0))
}

/// Composite trapezoidal rule
pub fn trapezoid(xs: &[f64], ys: &[f64]) -> f64 {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| 0.5 * (x[1] - x[0]) * (y[0] + y[1]))
        .sum()
}

/// Composite Simpson's rule over uniformly spaced samples with an even
/// number of intervals.
fn simpson_even(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len() - 1;
    let h = (xs[n] - xs[0]) / n as f64;
    let interior: f64 = ys[1..n]
        .iter()
        .enumerate()
        .map(|(i, y)| if i % 2 == 0 { 4.0 * y } else { 2.0 * y })
        .sum();
    h / 3.0 * (ys[0] + interior + ys[n])
}

/// Integrate `ys` over `xs` with the best composite rule the spacing allows.
pub fn integrate(xs: &[f64], ys: &[f64]) -> (f64, IntegrationRule) {
    let n = xs.len().min(ys.len());
    let (xs, ys) = (&xs[..n], &ys[..n]);
    if n < 3 || !is_uniform(xs) {
        return (trapezoid(xs, ys), IntegrationRule::Trapezoid);
    }
    if (n - 1) % 2 == 0 {
        (simpson_even(xs, ys), IntegrationRule::Simpson)
    } else {
        let head = simpson_even(&xs[..n - 1], &ys[..n - 1]);
        let tail = trapezoid(&xs[n - 2..], &ys[n - 2..]);
        (head + tail, IntegrationRule::SimpsonTrapezoid)
    }
}

//! # Hull Geometry
//!
//! From sparse control points to closed cross-sections:
//!
//! ```text
//! CurveDefinition ──> Curve (spline fit) ──> ProfileBuilder ──> Profile per station
//!                                                 │
//!                              Hull (curves + stations + profiles + shell weight)
//! ```
//!
//! - [`point`] - 3D points and the heel/trim rotations
//! - [`spline`] - 1D cubic Hermite interpolants
//! - [`curve`] - Named longitudinal curves, evaluation and arc-length resampling
//! - [`profile`] - Mirroring and deck-to-keel profile assembly
//! - [`hull`] - The built hull, summary and mesh export
//! - [`weight`] - Point masses and loading conditions

pub mod curve;
pub mod hull;
pub mod point;
pub mod profile;
pub mod spline;
pub mod weight;

pub use curve::{Curve, CurveDefinition};
pub use hull::{Bounds, CurvePointCloud, Hull, HullDefinition, HullMesh, HullSummary};
pub use point::Point3;
pub use profile::{Profile, ProfileBuilder};
pub use spline::{Spline1D, SplineKind};
pub use weight::{LoadingCondition, MassItem, MassShare, Weight};

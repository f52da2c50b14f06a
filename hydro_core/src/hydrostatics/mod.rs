//! # Hydrostatics
//!
//! Submerged geometry of a built [`Hull`](crate::geometry::Hull):
//!
//! - [`section`] - clipping one profile at a waterline (area, moments, girth)
//! - [`integration`] - Simpson/trapezoid quadrature along the stations
//! - [`volume`] - volume and center of buoyancy at any attitude and waterline
//! - [`equilibrium`] - waterline and trim that float a given weight

pub mod equilibrium;
pub mod integration;
pub mod section;
pub mod volume;

pub use equilibrium::{find_root, EquilibriumSolver, EquilibriumState, RootError, RootSearch};
pub use integration::IntegrationRule;
pub use section::SectionProperties;
pub use volume::{Attitude, HullIntegrator, SubmergedVolume};

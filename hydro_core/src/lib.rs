//! # hydro_core - Small-Craft Hydrostatics Engine
//!
//! `hydro_core` computes the floating condition and transverse stability of a
//! kayak-like hull described by a handful of longitudinal curves. All inputs
//! and outputs are JSON-serializable, so the engine can sit behind any front
//! end or API.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: A [`Hull`](geometry::Hull) is built once and read-only;
//!   every analysis is a pure function of the hull and its input
//! - **JSON-First**: All inputs and results implement Serialize
//! - **Rich Errors**: Structured [`HydroError`] values, including solver
//!   non-convergence with its bracket and residual
//! - **Explicit Frames**: Origin, units and modelled side are configuration,
//!   never assumptions
//!
//! ## Quick Start
//!
//! ```rust
//! use hydro_core::calculations::stability::{self, HeelSweep, StabilityInput};
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
//!     sweep: HeelSweep::new(60.0, 5.0),
//!     ..StabilityInput::default()
//! };
//! let curve = stability::calculate(&hull, &input)?;
//! assert!(curve.max_gz_m > 0.0);
//!
//! // Serialize for storage or transmission
//! let json = serde_json::to_string_pretty(&curve)?;
//! # let _ = json;
//! # Ok::<(), hydro_core::HydroError>(())
//! ```
//!
//! ## Modules
//!
//! - [`geometry`] - Points, curves, profiles, hulls and weights
//! - [`hydrostatics`] - Section clipping, volume integration, equilibrium
//! - [`calculations`] - Hydrostatics, form parameters, stability and resistance analyses
//! - [`report`] - Combined analysis report
//! - [`config`] - Hull frame, station plan and solver settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//!
//! ## Features
//!
//! - `parallel` - evaluate heel angles of a stability sweep on the rayon
//!   thread pool

pub mod calculations;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod hydrostatics;
pub mod report;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{HydroError, HydroResult};
pub use geometry::{Hull, HullDefinition, Point3, Weight};

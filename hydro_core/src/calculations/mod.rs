//! # Analyses
//!
//! Each analysis follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` / `*Curve` - Results (JSON-serializable)
//! - `calculate(hull, input) -> HydroResult<..>` - Pure calculation function
//!
//! ## Available Analyses
//!
//! - [`hydrostatics`] - Upright displacement, centers, BM and GM
//! - [`hull_parameters`] - Principal dimensions and form coefficients
//! - [`stability`] - GZ curve over a heel sweep
//! - [`resistance`] - Calm-water drag and paddling power over a speed range
//!
//! [`AnalysisRequest`] wraps them in one tagged enum so requests can be
//! queued or transmitted as JSON.

pub mod hull_parameters;
pub mod hydrostatics;
pub mod resistance;
pub mod stability;

use serde::{Deserialize, Serialize};

use crate::errors::HydroResult;
use crate::geometry::{Hull, HullMesh};

pub use hull_parameters::HullParameters;
pub use hydrostatics::{DisplacementPoint, HydrostaticsInput, HydrostaticsResult};
pub use resistance::{ResistanceInput, ResistancePoint, ResistanceResult};
pub use stability::{HeelSweep, StabilityCurve, StabilityInput, StabilitySample};

fn default_mesh_samples() -> usize {
    50
}

/// Enum wrapper for every analysis of a built hull.
///
/// ```json
/// { "type": "Stability", "sweep": { "max_angle_deg": 60.0, "step_deg": 5.0 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnalysisRequest {
    /// Upright hydrostatics
    Hydrostatics(HydrostaticsInput),
    /// Heel sweep
    Stability(StabilityInput),
    /// Form coefficients at the upright equilibrium
    Parameters(HydrostaticsInput),
    /// Drag and power over a speed range
    Resistance(ResistanceInput),
    /// Main profiles and curve point clouds
    Mesh {
        #[serde(default = "default_mesh_samples")]
        samples_per_curve: usize,
    },
}

/// Result of an [`AnalysisRequest`], tagged the same way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum AnalysisOutcome {
    Hydrostatics(HydrostaticsResult),
    Stability(StabilityCurve),
    Parameters(HullParameters),
    Resistance(ResistanceResult),
    Mesh(HullMesh),
}

impl AnalysisRequest {
    /// Get the analysis type as a string
    pub fn analysis_type(&self) -> &'static str {
        match self {
            AnalysisRequest::Hydrostatics(_) => "Hydrostatics",
            AnalysisRequest::Stability(_) => "Stability",
            AnalysisRequest::Parameters(_) => "Parameters",
            AnalysisRequest::Resistance(_) => "Resistance",
            AnalysisRequest::Mesh { .. } => "Mesh",
        }
    }

    /// Run the analysis against a built hull.
    pub fn run(&self, hull: &Hull) -> HydroResult<AnalysisOutcome> {
        log::debug!("running {} analysis on '{}'", self.analysis_type(), hull.name());
        Ok(match self {
            AnalysisRequest::Hydrostatics(input) => AnalysisOutcome::Hydrostatics(hydrostatics::calculate(hull, input)?),
            AnalysisRequest::Stability(input) => AnalysisOutcome::Stability(stability::calculate(hull, input)?),
            AnalysisRequest::Parameters(input) => {
                let state = hydrostatics::solve_upright(hull, input)?;
                AnalysisOutcome::Parameters(hull_parameters::calculate(hull, &state))
            }
            AnalysisRequest::Resistance(input) => AnalysisOutcome::Resistance(resistance::calculate(hull, input)?),
            AnalysisRequest::Mesh { samples_per_curve } => AnalysisOutcome::Mesh(hull.mesh(*samples_per_curve)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::hull::tests::simple_v;

    #[test]
    fn test_request_json_tags() {
        let request: AnalysisRequest =
            serde_json::from_str(r#"{"type": "Stability", "sweep": {"max_angle_deg": 30.0, "step_deg": 10.0}}"#)
                .unwrap();
        assert_eq!(request.analysis_type(), "Stability");
        match &request {
            AnalysisRequest::Stability(input) => assert_eq!(input.sweep.angles(), vec![0.0, 10.0, 20.0, 30.0]),
            other => panic!("unexpected request {:?}", other),
        }

        let mesh: AnalysisRequest = serde_json::from_str(r#"{"type": "Mesh"}"#).unwrap();
        assert_eq!(mesh, AnalysisRequest::Mesh { samples_per_curve: 50 });
    }

    #[test]
    fn test_run_dispatches() {
        let hull = simple_v();
        let outcome = AnalysisRequest::Hydrostatics(HydrostaticsInput::default()).run(&hull).unwrap();
        match outcome {
            AnalysisOutcome::Hydrostatics(result) => assert!((result.displacement_kg - 10.0).abs() <= 1e-4),
            other => panic!("unexpected outcome {:?}", other),
        }

        let outcome = AnalysisRequest::Mesh { samples_per_curve: 10 }.run(&hull).unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["type"], "Mesh");
        assert_eq!(json["curves"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_resistance_request() {
        let hull = simple_v();
        let request: AnalysisRequest =
            serde_json::from_str(r#"{"type": "Resistance", "speeds_mps": [1.0, 2.0], "distance_m": 1000.0}"#).unwrap();
        assert_eq!(request.analysis_type(), "Resistance");
        match request.run(&hull).unwrap() {
            AnalysisOutcome::Resistance(result) => {
                assert_eq!(result.points.len(), 2);
                assert!(result.points[1].total_resistance_n > result.points[0].total_resistance_n);
                assert!(result.points.iter().all(|p| p.energy_j.is_some()));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_invalid_request_is_rejected() {
        let hull = simple_v();
        let request = AnalysisRequest::Stability(StabilityInput {
            sweep: HeelSweep::new(60.0, -1.0),
            ..StabilityInput::default()
        });
        let err = request.run(&hull).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}

//! # Analysis Report
//!
//! One serializable bundle of everything known about a loaded hull: summary,
//! mass breakdown, upright hydrostatics, form coefficients and optionally the
//! stability curve and mesh.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::calculations::hydrostatics::{self, HydrostaticsInput, HydrostaticsResult};
use crate::calculations::stability::{self, StabilityCurve, StabilityInput};
use crate::calculations::{hull_parameters, HullParameters};
use crate::errors::HydroResult;
use crate::geometry::{Hull, HullMesh, HullSummary, MassShare};

/// Schema version of [`AnalysisReport`]
pub const REPORT_VERSION: &str = "1.0";

/// What to include in a report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportOptions {
    /// Loading, sweep, trim and solver settings shared by every section
    pub analysis: StabilityInput,
    pub include_stability: bool,
    /// Point count per curve when the mesh is included
    pub mesh_samples: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub schema_version: String,
    pub hull_name: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub hull: HullSummary,
    pub mass_summary: Vec<MassShare>,
    pub hydrostatics: HydrostaticsResult,
    pub parameters: HullParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stability: Option<StabilityCurve>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh: Option<HullMesh>,
}

impl AnalysisReport {
    pub fn generate(hull: &Hull, options: &ReportOptions) -> HydroResult<Self> {
        let analysis = &options.analysis;
        let upright = HydrostaticsInput {
            loading: analysis.loading.clone(),
            trim: analysis.trim,
            solver: analysis.solver.clone(),
        };
        let state = hydrostatics::solve_upright(hull, &upright)?;

        let stability = if options.include_stability {
            Some(stability::calculate(hull, analysis)?)
        } else {
            None
        };
        let mesh = options.mesh_samples.map(|n| hull.mesh(n)).transpose()?;

        Ok(AnalysisReport {
            metadata: ReportMetadata {
                schema_version: REPORT_VERSION.to_string(),
                hull_name: hull.name().to_string(),
                generated_at: Utc::now(),
            },
            hull: hull.summary(),
            mass_summary: analysis.loading.mass_summary(&hull.shell_weight())?,
            hydrostatics: hydrostatics::from_state(hull, &state),
            parameters: hull_parameters::calculate(hull, &state),
            stability,
            mesh,
        })
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> HydroResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::HeelSweep;
    use crate::geometry::hull::tests::simple_v;
    use crate::geometry::{LoadingCondition, Point3};

    #[test]
    fn test_report_sections() {
        let hull = simple_v();
        let options = ReportOptions {
            analysis: StabilityInput {
                loading: LoadingCondition::new().with_item("Paddler", 80.0, Point3::new(2.5, 0.0, 0.25)),
                sweep: HeelSweep::new(20.0, 10.0),
                ..StabilityInput::default()
            },
            include_stability: true,
            mesh_samples: None,
        };
        let report = AnalysisReport::generate(&hull, &options).unwrap();
        assert_eq!(report.metadata.schema_version, REPORT_VERSION);
        assert_eq!(report.metadata.hull_name, "Simple V");
        assert_eq!(report.mass_summary.len(), 2);
        assert_eq!(report.stability.as_ref().map(|c| c.samples.len()), Some(3));
        assert!(report.mesh.is_none());

        let json = report.to_json().unwrap();
        assert!(json.contains("\"generated_at\""));
        assert!(json.contains("\"gm_m\""));
        assert!(!json.contains("\"mesh\""));
    }

    #[test]
    fn test_report_with_mesh_only() {
        let hull = simple_v();
        let options = ReportOptions {
            mesh_samples: Some(12),
            ..ReportOptions::default()
        };
        let report = AnalysisReport::generate(&hull, &options).unwrap();
        assert!(report.stability.is_none());
        assert_eq!(report.mesh.map(|m| m.curves.len()), Some(3));
        assert!((report.hydrostatics.displacement_kg - 10.0).abs() <= 1e-4);
    }
}

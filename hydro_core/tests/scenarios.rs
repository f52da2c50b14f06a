//! End-to-end scenarios through the public API.

use hydro_core::calculations::resistance::{self, ResistanceInput};
use hydro_core::calculations::stability::{self, HeelSweep, StabilityInput};
use hydro_core::calculations::{hydrostatics, AnalysisOutcome, AnalysisRequest, HydrostaticsInput};
use hydro_core::config::HullConfig;
use hydro_core::geometry::{CurveDefinition, Hull, HullDefinition, LoadingCondition, Point3, Weight};
use hydro_core::hydrostatics::{Attitude, HullIntegrator};

fn curve(name: &str, points: &[[f64; 3]]) -> CurveDefinition {
    CurveDefinition::new(name, points.iter().map(|&p| Point3::from(p)).collect())
}

fn simple_v() -> Hull {
    let definition = HullDefinition {
        name: "Simple V".to_string(),
        description: None,
        curves: vec![
            curve("keel", &[[0.0, 0.0, 0.30], [2.5, 0.0, 0.0], [5.0, 0.0, 0.30]]),
            curve("gunwale", &[[0.0, 0.0, 0.30], [2.5, 0.30, 0.28], [5.0, 0.0, 0.30]]),
        ],
        hull_weight: Weight::new(10.0, Point3::new(2.5, 0.0, 0.10)),
    };
    Hull::build(&definition, HullConfig::default()).unwrap()
}

fn kayak_001() -> Hull {
    let definition = HullDefinition {
        name: "Kayak 001".to_string(),
        description: None,
        curves: vec![
            curve(
                "starboard gunnel",
                &[
                    [0.00, 0.00, 0.30],
                    [1.00, 0.18, 0.28],
                    [2.00, 0.30, 0.28],
                    [3.00, 0.30, 0.28],
                    [4.00, 0.14, 0.28],
                    [5.00, 0.00, 0.30],
                ],
            ),
            curve(
                "starboard chine",
                &[
                    [0.20, 0.00, 0.16],
                    [1.00, 0.12, 0.12],
                    [2.00, 0.22, 0.11],
                    [3.00, 0.22, 0.11],
                    [4.00, 0.10, 0.12],
                    [4.70, 0.00, 0.16],
                ],
            ),
            curve(
                "keel",
                &[
                    [0.00, 0.00, 0.30],
                    [0.20, 0.00, 0.16],
                    [0.50, 0.00, 0.00],
                    [4.20, 0.00, 0.00],
                    [4.70, 0.00, 0.16],
                    [5.00, 0.00, 0.30],
                ],
            ),
        ],
        hull_weight: Weight::new(10.0, Point3::new(2.5, 0.0, 0.12)),
    };
    Hull::build(&definition, HullConfig::default()).unwrap()
}

fn paddler() -> LoadingCondition {
    LoadingCondition::new().with_item("Paddler", 80.0, Point3::new(2.5, 0.0, 0.25))
}

#[test]
fn simple_v_floats_paddler() {
    let hull = simple_v();
    let input = HydrostaticsInput {
        loading: paddler(),
        ..HydrostaticsInput::default()
    };
    let result = hydrostatics::calculate(&hull, &input).unwrap();
    assert!(result.waterline_z_m > 0.0 && result.waterline_z_m < 0.28);

    let volume = HullIntegrator::new(&hull, Attitude::UPRIGHT).volume(result.waterline_z_m);
    assert!((volume * 1000.0 - 90.0).abs() <= 1e-4);
}

#[test]
fn simple_v_stability_sweep() {
    let hull = simple_v();
    let input = StabilityInput {
        loading: paddler(),
        sweep: HeelSweep::new(60.0, 5.0),
        ..StabilityInput::default()
    };
    let curve = stability::calculate(&hull, &input).unwrap();

    assert_eq!(curve.samples.len(), 13);
    assert!(curve.samples[0].gz_m.abs() < 1e-9);
    assert!(curve
        .samples
        .iter()
        .filter(|s| s.heel_deg > 0.0 && s.heel_deg <= 20.0)
        .all(|s| s.gz_m > 0.0));
    assert!(curve.max_gz_angle_deg > 0.0 && curve.max_gz_angle_deg < 60.0);
}

#[test]
fn kayak_001_full_analysis() {
    let hull = kayak_001();
    assert_eq!(hull.main_profiles().unwrap().len(), 10);

    let input = StabilityInput {
        loading: paddler(),
        sweep: HeelSweep::new(90.0, 5.0),
        ..StabilityInput::default()
    };
    let curve = stability::calculate(&hull, &input).unwrap();
    assert!(curve.is_complete());
    assert!(curve.samples[1..=11].iter().all(|s| s.gz_m > 0.0));
    assert!(curve.max_gz_angle_deg >= 35.0 && curve.max_gz_angle_deg <= 45.0);

    let vanishing = curve.vanishing_angle_deg.unwrap();
    assert!(vanishing > 60.0 && vanishing < 65.0, "vanishing at {vanishing}");
    assert!(curve.dynamic_stability_mrad > 0.0);
}

#[test]
fn analysis_request_from_json() {
    let hull = kayak_001();
    let request: AnalysisRequest = serde_json::from_str(
        r#"{
            "type": "Hydrostatics",
            "loading": { "items": [{ "name": "Paddler", "mass": 80.0, "cg": [2.5, 0.0, 0.25] }] }
        }"#,
    )
    .unwrap();
    match request.run(&hull).unwrap() {
        AnalysisOutcome::Hydrostatics(result) => {
            assert!((result.displacement_kg - 90.0).abs() <= 1e-4);
            assert!(result.gm_m > 0.0);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn kayak_001_paddling_resistance() {
    let hull = kayak_001();
    let input = ResistanceInput {
        loading: paddler(),
        speeds_mps: vec![1.0, 1.5, 2.0, 2.5, 3.0],
        distance_m: Some(10_000.0),
        ..ResistanceInput::default()
    };
    let result = resistance::calculate(&hull, &input).unwrap();

    assert!(result.waterline_length_m > 3.0 && result.waterline_length_m <= hull.length());
    assert!(result.hull_speed_mps > 2.0 && result.hull_speed_mps < 3.5);
    assert!(result.points.windows(2).all(|w| w[1].total_resistance_n > w[0].total_resistance_n));

    let cruise = &result.points[2];
    assert!(cruise.total_resistance_n > 2.0 && cruise.total_resistance_n < 60.0, "{:?}", cruise);
    // Friction dominates below hull speed
    assert!(cruise.frictional_resistance_n > cruise.residuary_resistance_n);
}

//! # Kayakish CLI
//!
//! Terminal front end for the hydrostatics engine.
//!
//! ```text
//! hydro_cli [hull.json]
//! ```
//!
//! Without an argument the built-in "Kayak 001" sample hull is analysed.
//! A hull file holds `{ "hull": HullDefinition, "config": HullConfig }`, the
//! config being optional. Set `RUST_LOG=debug` to follow the solver.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use hydro_core::calculations::resistance::{self, ResistanceInput, ResistanceResult};
use hydro_core::calculations::{HeelSweep, StabilityCurve, StabilityInput};
use hydro_core::config::HullConfig;
use hydro_core::geometry::{CurveDefinition, Hull, HullDefinition, LoadingCondition, Point3, Weight};
use hydro_core::report::{AnalysisReport, ReportOptions};
use hydro_core::{HydroError, HydroResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Hull file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HullDocument {
    hull: HullDefinition,
    #[serde(default)]
    config: HullConfig,
}

static SAMPLE: Lazy<HullDocument> = Lazy::new(|| {
    let curve = |name: &str, points: &[[f64; 3]]| {
        CurveDefinition::new(name, points.iter().map(|&p| Point3::from(p)).collect())
    };
    HullDocument {
        hull: HullDefinition {
            name: "Kayak 001".to_string(),
            description: Some("Built-in sample hull".to_string()),
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
        },
        config: HullConfig::default(),
    }
});

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn load_document(path: &str) -> HydroResult<HullDocument> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| HydroError::invalid_input("path", path, format!("Cannot read hull file: {e}")))?;
    Ok(serde_json::from_str(&text)?)
}

fn main() -> ExitCode {
    env_logger::init();

    println!("Kayakish - Hull Hydrostatics & Stability");
    println!("========================================");
    println!();

    let document = match std::env::args().nth(1) {
        Some(path) => match load_document(&path) {
            Ok(doc) => doc,
            Err(e) => return report_error(&e),
        },
        None => {
            println!("No hull file given, using the built-in sample.");
            SAMPLE.clone()
        }
    };

    let hull = match Hull::build(&document.hull, document.config) {
        Ok(hull) => hull,
        Err(e) => return report_error(&e),
    };
    let bounds = hull.bounds();
    println!(
        "Hull '{}': {:.2} m x {:.2} m x {:.2} m, {} stations",
        hull.name(),
        hull.length(),
        hull.beam(),
        hull.depth(),
        hull.stations().len()
    );
    println!();

    // CG prompts are in the hull file's length unit
    let unit = hull.config().frame.length_unit.code();
    let scale = hull.length_scale();
    let mid = 0.5 * (bounds.min_x + bounds.max_x) / scale;
    let seat = 0.25 / scale;
    let mass = prompt_f64("Paddler mass (kg) [80.0]: ", 80.0);
    let cg_x = prompt_f64(&format!("Paddler CG x ({unit}) [{mid:.2}]: "), mid);
    let cg_z = prompt_f64(&format!("Paddler CG z ({unit}) [{seat:.2}]: "), seat);
    let max_heel = prompt_f64("Maximum heel (deg) [90.0]: ", 90.0);
    let step = prompt_f64("Heel step (deg) [5.0]: ", 5.0);
    let distance_km = prompt_f64("Trip distance for energy (km) [10.0]: ", 10.0);

    let loading = LoadingCondition::new().with_item("Paddler", mass, Point3::new(cg_x, 0.0, cg_z));
    let resistance_input = ResistanceInput {
        loading: loading.clone(),
        distance_m: Some(distance_km * 1000.0),
        ..ResistanceInput::default()
    };
    let options = ReportOptions {
        analysis: StabilityInput {
            loading,
            sweep: HeelSweep::new(max_heel, step),
            ..StabilityInput::default()
        },
        include_stability: true,
        mesh_samples: None,
    };

    println!();
    println!("Solving...");
    println!();

    match AnalysisReport::generate(&hull, &options) {
        Ok(report) => {
            print_report(&report);
            match resistance::calculate(&hull, &resistance_input) {
                Ok(result) => print_resistance(&result),
                Err(e) => return report_error(&e),
            }
            println!();
            println!("JSON Output:");
            match report.to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => return report_error(&e),
            }
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

fn print_report(report: &AnalysisReport) {
    let h = &report.hydrostatics;
    let p = &report.parameters;
    println!("═══════════════════════════════════════");
    println!("  HYDROSTATICS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Loading:");
    for share in &report.mass_summary {
        println!("  {:<12} {:>7.2} kg ({:>5.1}%)", share.name, share.mass, share.fraction * 100.0);
    }
    println!();
    println!("Equilibrium:");
    println!("  Displacement: {:.2} kg ({:.4} m³)", h.displacement_kg, h.volume_m3);
    println!("  Waterline:    {:.4} m (draft {:.4} m)", h.waterline_z_m, h.draft_m);
    println!("  Trim:         {:.2}°", h.trim_deg);
    println!("  CB:           ({:.3}, {:.3}, {:.3}) m", h.lcb_m, h.tcb_m, h.vcb_m);
    println!("  CG:           ({:.3}, {:.3}, {:.3}) m", h.lcg_m, h.tcg_m, h.vcg_m);
    println!("  BM / GM:      {:.3} / {:.3} m {}", h.bm_m, h.gm_m, status_icon(h.is_initially_stable()));
    println!();
    println!("Form:");
    println!("  Lwl x Bwl:    {:.3} x {:.3} m", p.waterline_length, p.waterline_beam);
    println!("  Wetted area:  {:.3} m²", p.wetted_surface);
    println!(
        "  Cb {:.3}  Cp {:.3}  Cm {:.3}  Cwp {:.3}",
        p.block_coefficient, p.prismatic_coefficient, p.midship_coefficient, p.waterplane_coefficient
    );

    if let Some(curve) = &report.stability {
        print_stability(curve);
    }
}

fn print_stability(curve: &StabilityCurve) {
    println!();
    println!("═══════════════════════════════════════");
    println!("  STABILITY");
    println!("═══════════════════════════════════════");
    println!();
    println!("  Heel     GZ (m)    RM (N·m)   Trim");
    for s in &curve.samples {
        println!(
            "  {:>5.1}°  {:>8.4}  {:>9.2}  {:>5.2}°",
            s.heel_deg, s.gz_m, s.righting_moment_nm, s.trim_deg
        );
    }
    for f in &curve.failed {
        println!("  {:>5.1}°  no equilibrium: {}", f.heel_deg, f.error);
    }
    println!();
    println!("  Max GZ:            {:.4} m at {:.1}°", curve.max_gz_m, curve.max_gz_angle_deg);
    match curve.vanishing_angle_deg {
        Some(angle) => println!("  Vanishing angle:   {:.1}°", angle),
        None => println!("  Vanishing angle:   beyond sweep"),
    }
    println!("  Dynamic stability: {:.4} m·rad", curve.dynamic_stability_mrad);
}

fn print_resistance(result: &ResistanceResult) {
    println!();
    println!("═══════════════════════════════════════");
    println!("  RESISTANCE");
    println!("═══════════════════════════════════════");
    println!();
    println!("  Hull speed: {:.2} m/s ({:.1} km/h)", result.hull_speed_mps, result.hull_speed_mps * 3.6);
    println!();
    println!("  Speed      Fn     Drag (N)  Paddler (W)  Energy (kJ)");
    for p in &result.points {
        let energy = p.energy_j.map_or_else(|| "-".to_string(), |e| format!("{:.0}", e / 1000.0));
        println!(
            "  {:>4.1} m/s  {:>5.3}  {:>8.2}  {:>11.1}  {:>11}",
            p.speed_mps, p.froude_number, p.total_resistance_n, p.paddler_power_w, energy
        );
    }
}

fn report_error(e: &HydroError) -> ExitCode {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
    ExitCode::FAILURE
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[UNSTABLE]"
    }
}

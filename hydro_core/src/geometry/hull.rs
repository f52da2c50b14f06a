//! # Hull
//!
//! A [`Hull`] is built once from a [`HullDefinition`] and a [`HullConfig`] and
//! is read-only afterwards: curves are converted to meters, validated, and a
//! profile is assembled at every integration station.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::config::HullConfig;
//! use hydro_core::geometry::{CurveDefinition, Hull, HullDefinition, Point3, Weight};
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
//!
//! let hull = Hull::build(&definition, HullConfig::default())?;
//! assert_eq!(hull.length(), 5.0);
//! assert_eq!(hull.stations().len(), 61);
//! # Ok::<(), hydro_core::HydroError>(())
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::curve::{Curve, CurveDefinition};
use super::point::Point3;
use super::profile::{Profile, ProfileBuilder, STATION_TOLERANCE};
use super::weight::{LoadingCondition, MassItem, Weight};
use crate::config::{CoordinateOrigin, HullConfig, ProfileOrdering, ShellCg, StationPlan};
use crate::errors::{HydroError, HydroResult};
use crate::hydrostatics::integration::integrate;
use crate::hydrostatics::section::polygon_area_moments;

/// Hull as supplied by a caller, in the frame's length unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HullDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub curves: Vec<CurveDefinition>,
    /// Shell weight excluding paddler and gear
    pub hull_weight: Weight,
}

impl HullDefinition {
    fn x_extent(&self) -> Option<(f64, f64)> {
        self.curves
            .iter()
            .flat_map(|c| c.points.iter().map(|p| p.x))
            .fold(None, |acc, x| match acc {
                None => Some((x, x)),
                Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
            })
    }

    /// Re-express every x coordinate in another origin convention.
    ///
    /// The stern-most point becomes x = 0 for [`CoordinateOrigin::Stern`],
    /// the bow-most for [`CoordinateOrigin::Bow`], and the middle of the
    /// extent for [`CoordinateOrigin::Midship`].
    pub fn convert_origin(&self, from: CoordinateOrigin, to: CoordinateOrigin) -> HydroResult<HullDefinition> {
        let (lo, hi) = self
            .x_extent()
            .ok_or_else(|| HydroError::invalid_input("curves", "[]", "Hull has no control points"))?;
        let length = hi - lo;
        // Distance from the stern end toward the bow
        let from_stern = |x: f64| match from {
            CoordinateOrigin::Bow => hi - x,
            CoordinateOrigin::Stern | CoordinateOrigin::Midship => x - lo,
        };
        let convert = |x: f64| {
            let s = from_stern(x);
            match to {
                CoordinateOrigin::Stern => s,
                CoordinateOrigin::Bow => length - s,
                CoordinateOrigin::Midship => s - length / 2.0,
            }
        };
        let flips = (from == CoordinateOrigin::Bow) != (to == CoordinateOrigin::Bow);

        let mut converted = self.clone();
        for curve in &mut converted.curves {
            for p in &mut curve.points {
                p.x = convert(p.x);
            }
            if flips {
                curve.points.reverse();
            }
        }
        converted.hull_weight.cg.x = convert(self.hull_weight.cg.x);
        Ok(converted)
    }
}

/// Axis-aligned extent of the hull, both sides included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Bounds {
    fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Bounds> {
        points.into_iter().fold(None, |acc, p| {
            let b = acc.unwrap_or(Bounds {
                min_x: p.x,
                max_x: p.x,
                min_y: p.y,
                max_y: p.y,
                min_z: p.z,
                max_z: p.z,
            });
            Some(Bounds {
                min_x: b.min_x.min(p.x),
                max_x: b.max_x.max(p.x),
                min_y: b.min_y.min(p.y),
                max_y: b.max_y.max(p.y),
                min_z: b.min_z.min(p.z),
                max_z: b.max_z.max(p.z),
            })
        })
    }
}

/// Headline figures of a built hull.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HullSummary {
    pub name: String,
    pub description: Option<String>,
    pub length: f64,
    pub beam: f64,
    pub depth: f64,
    pub bounds: Bounds,
    pub bow_station: f64,
    pub stern_station: f64,
    pub curve_count: usize,
    pub station_count: usize,
    pub hull_weight: Weight,
}

/// Sampled points of one curve (or its mirror image) for external rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurvePointCloud {
    pub name: String,
    pub mirrored: bool,
    pub points: Vec<Point3>,
}

/// Coordinates-only mesh: main profiles plus mirrored curve point clouds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HullMesh {
    pub profiles: Vec<Profile>,
    pub curves: Vec<CurvePointCloud>,
}

/// A validated hull with profiles at every integration station.
#[derive(Debug, Clone)]
pub struct Hull {
    name: String,
    description: Option<String>,
    config: HullConfig,
    curves: Vec<Curve>,
    shell: Weight,
    rotation_origin: Point3,
    bounds: Bounds,
    stations: Vec<f64>,
    profiles: Vec<Profile>,
}

impl Hull {
    /// Validate a definition and build the hull in meters.
    pub fn build(definition: &HullDefinition, config: HullConfig) -> HydroResult<Self> {
        config.validate()?;
        definition.hull_weight.validate("hull_weight")?;
        if definition.curves.len() < 2 {
            return Err(HydroError::invalid_input(
                "curves",
                definition.curves.len().to_string(),
                "At least 2 curves are required to close a profile",
            ));
        }

        let mut names = HashSet::new();
        for c in &definition.curves {
            if !names.insert(c.name.as_str()) {
                return Err(HydroError::invalid_input("curves.name", &c.name, "Curve names must be unique"));
            }
        }
        if let ProfileOrdering::Explicit { levels } = &config.ordering {
            if let Some(missing) = definition.curves.iter().find(|c| !levels.contains(&c.name)) {
                return Err(HydroError::invalid_input(
                    "ordering.levels",
                    &missing.name,
                    "Every curve must be listed in the explicit level order",
                ));
            }
        }

        let unit = config.frame.length_unit;
        let scale = unit.to_meters(1.0);
        let side = config.frame.source_side;
        let mut curves = Vec::with_capacity(definition.curves.len());
        for c in &definition.curves {
            if let Some(p) = c.points.iter().find(|p| !side.contains(p.y, 1e-9)) {
                return Err(HydroError::invalid_input(
                    format!("curves.{}.points", c.name),
                    format!("{:?}", p),
                    format!("Point lies off the modelled {:?} side", side),
                ));
            }
            let points = c.points.iter().map(|p| p.scaled(scale)).collect();
            curves.push(Curve::new(c.name.clone(), points, c.kind)?);
        }

        let control_points: Vec<Point3> = curves
            .iter()
            .flat_map(|c| c.points().iter().flat_map(|p| [*p, p.mirrored()]))
            .collect();
        let bounds = Bounds::from_points(&control_points)
            .ok_or_else(|| HydroError::invalid_input("curves", "[]", "Hull has no control points"))?;

        let builder = ProfileBuilder::new(&curves, &config.ordering);
        let stations = match &config.stations {
            StationPlan::Uniform { count } => {
                let step = (bounds.max_x - bounds.min_x) / (*count - 1) as f64;
                (0..*count)
                    .map(|i| if i == count - 1 { bounds.max_x } else { bounds.min_x + step * i as f64 })
                    .collect()
            }
            StationPlan::Explicit { stations } => explicit_stations(stations, scale)?,
            StationPlan::ControlPoints => builder.main_stations(),
        };
        if stations.len() < 2 || bounds.max_x - bounds.min_x <= STATION_TOLERANCE {
            return Err(HydroError::invalid_input(
                "stations",
                stations.len().to_string(),
                "Hull needs a positive length and at least 2 distinct stations",
            ));
        }

        let profiles = stations
            .iter()
            .map(|&x| builder.build(x))
            .collect::<HydroResult<Vec<_>>>()?;

        let shell_cg = match config.shell_cg {
            ShellCg::Given => definition.hull_weight.cg.scaled(scale),
            ShellCg::Volumetric => volumetric_centroid(&stations, &profiles)?,
        };

        log::debug!(
            "built hull '{}': {} curves, {} stations over [{:.3}, {:.3}] m",
            definition.name,
            curves.len(),
            stations.len(),
            bounds.min_x,
            bounds.max_x
        );

        Ok(Hull {
            name: definition.name.clone(),
            description: definition.description.clone(),
            rotation_origin: config.frame.rotation_origin.scaled(scale),
            shell: Weight::new(definition.hull_weight.mass, shell_cg),
            config,
            curves,
            bounds,
            stations,
            profiles,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &HullConfig {
        &self.config
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn stations(&self) -> &[f64] {
        &self.stations
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Hull shell weight in meters/kilograms
    pub fn shell_weight(&self) -> Weight {
        self.shell
    }

    /// Meters per unit of the definition's length unit
    pub fn length_scale(&self) -> f64 {
        self.config.frame.length_unit.to_meters(1.0)
    }

    /// Loading items converted from the definition's length unit to meters
    pub fn loading_in_meters(&self, loading: &LoadingCondition) -> LoadingCondition {
        let scale = self.length_scale();
        LoadingCondition {
            items: loading
                .items
                .iter()
                .map(|item| MassItem {
                    name: item.name.clone(),
                    mass: item.mass,
                    cg: item.cg.scaled(scale),
                })
                .collect(),
        }
    }

    /// Hull shell plus every loading item, in meters.
    ///
    /// Item CGs are read in the same length unit as the curves.
    pub fn total_weight(&self, loading: &LoadingCondition) -> HydroResult<Weight> {
        self.loading_in_meters(loading).total_with(&self.shell)
    }

    /// Centroid of the whole closed hull volume, in meters
    pub fn geometric_centroid(&self) -> HydroResult<Point3> {
        volumetric_centroid(&self.stations, &self.profiles)
    }

    /// Pivot of heel and trim rotations, in meters
    pub fn rotation_origin(&self) -> Point3 {
        self.rotation_origin
    }

    pub fn water_density(&self) -> f64 {
        self.config.water_density
    }

    pub fn gravity(&self) -> f64 {
        self.config.gravity
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn length(&self) -> f64 {
        self.bounds.max_x - self.bounds.min_x
    }

    pub fn beam(&self) -> f64 {
        self.bounds.max_y - self.bounds.min_y
    }

    pub fn depth(&self) -> f64 {
        self.bounds.max_z - self.bounds.min_z
    }

    pub fn bow_station(&self) -> f64 {
        if self.config.frame.origin.bow_is_max_x() {
            self.bounds.max_x
        } else {
            self.bounds.min_x
        }
    }

    pub fn stern_station(&self) -> f64 {
        if self.config.frame.origin.bow_is_max_x() {
            self.bounds.min_x
        } else {
            self.bounds.max_x
        }
    }

    fn builder(&self) -> ProfileBuilder<'_> {
        ProfileBuilder::new(&self.curves, &self.config.ordering)
    }

    /// Profile at an arbitrary station (meters)
    pub fn profile_at(&self, station: f64) -> HydroResult<Profile> {
        self.builder().build(station)
    }

    /// Profiles at every distinct control-point station
    pub fn main_profiles(&self) -> HydroResult<Vec<Profile>> {
        self.builder().main_profiles()
    }

    pub fn summary(&self) -> HullSummary {
        HullSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            length: self.length(),
            beam: self.beam(),
            depth: self.depth(),
            bounds: self.bounds,
            bow_station: self.bow_station(),
            stern_station: self.stern_station(),
            curve_count: self.curves.len(),
            station_count: self.stations.len(),
            hull_weight: self.shell,
        }
    }

    /// Main profiles and arc-length point clouds of every curve and its mirror.
    pub fn mesh(&self, samples_per_curve: usize) -> HydroResult<HullMesh> {
        let mut clouds = Vec::with_capacity(self.curves.len() * 2);
        for curve in &self.curves {
            let points = curve.resample_arc_length(samples_per_curve)?;
            if !curve.is_centerline() {
                clouds.push(CurvePointCloud {
                    name: curve.name().to_string(),
                    mirrored: true,
                    points: points.iter().map(Point3::mirrored).collect(),
                });
            }
            clouds.push(CurvePointCloud {
                name: curve.name().to_string(),
                mirrored: false,
                points,
            });
        }
        Ok(HullMesh {
            profiles: self.main_profiles()?,
            curves: clouds,
        })
    }
}

/// Centroid of the volume enclosed by the full station profiles
fn volumetric_centroid(stations: &[f64], profiles: &[Profile]) -> HydroResult<Point3> {
    let sections: Vec<(f64, f64, f64)> = profiles.iter().map(|p| polygon_area_moments(&p.yz())).collect();
    let areas: Vec<f64> = sections.iter().map(|s| s.0).collect();
    let (volume, _) = integrate(stations, &areas);
    if volume <= 0.0 {
        return Err(HydroError::geometry(
            stations.first().copied().unwrap_or(0.0),
            "hull encloses no volume, so it has no centroid",
        ));
    }
    let x_moments: Vec<f64> = stations.iter().zip(&areas).map(|(x, a)| x * a).collect();
    let y_moments: Vec<f64> = sections.iter().map(|s| s.1).collect();
    let z_moments: Vec<f64> = sections.iter().map(|s| s.2).collect();
    let (mx, _) = integrate(stations, &x_moments);
    let (my, _) = integrate(stations, &y_moments);
    let (mz, _) = integrate(stations, &z_moments);
    Ok(Point3::new(mx / volume, my / volume, mz / volume))
}

fn explicit_stations(stations: &[f64], scale: f64) -> HydroResult<Vec<f64>> {
    let mut sorted = Vec::with_capacity(stations.len());
    for &x in stations {
        if !x.is_finite() {
            return Err(HydroError::invalid_input("stations", x.to_string(), "Stations must be finite"));
        }
        sorted.push(x * scale);
    }
    sorted.sort_by(f64::total_cmp);
    if let Some(w) = sorted.windows(2).find(|w| w[1] - w[0] <= STATION_TOLERANCE) {
        return Err(HydroError::invalid_input(
            "stations",
            w[0].to_string(),
            "Duplicate station",
        ));
    }
    Ok(sorted)
}

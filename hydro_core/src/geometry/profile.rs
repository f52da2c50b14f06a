//! # Symmetry & Profile Builder
//!
//! Assembles the closed transverse cross-section ("profile") of the hull at a
//! station by evaluating every curve there, mirroring off-centerline points and
//! walking the resulting points in a fixed order:
//!
//! ```text
//!   port deck ─┐                         ┌─ starboard deck
//!               ╲  (mirrored points)    ╱   (source points)
//!     port chine ●                     ● starboard chine
//!                 ╲                   ╱
//!                  ╲_______●_______╱
//!                         keel (centerline, appears once)
//! ```
//!
//! The deck → keel order on the modelled side comes from the configured
//! [`ProfileOrdering`], never from the order curves were supplied in.

use serde::Serialize;

use super::curve::Curve;
use super::point::Point3;
use crate::config::ProfileOrdering;
use crate::errors::{HydroError, HydroResult};
use crate::units::Radians;

/// Two stations closer than this are the same station
pub const STATION_TOLERANCE: f64 = 1e-9;

/// Points closer than this are merged while assembling a polygon
const MERGE_TOLERANCE: f64 = 1e-12;

/// A closed polygon in the plane x = `station`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    station: f64,
    points: Vec<Point3>,
}

impl Profile {
    /// Build a profile, checking every point lies on the station plane.
    pub fn new(station: f64, points: Vec<Point3>) -> HydroResult<Self> {
        if let Some(p) = points.iter().find(|p| (p.x - station).abs() > 1e-6) {
            return Err(HydroError::geometry(
                station,
                format!("profile point {:?} does not lie on the station plane", p),
            ));
        }
        Ok(Profile { station, points })
    }

    pub fn station(&self) -> f64 {
        self.station
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// (min z, max z), or None for an empty profile
    pub fn z_range(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |acc, p| match acc {
            None => Some((p.z, p.z)),
            Some((lo, hi)) => Some((lo.min(p.z), hi.max(p.z))),
        })
    }

    pub fn max_half_breadth(&self) -> f64 {
        self.points.iter().map(|p| p.y.abs()).fold(0.0, f64::max)
    }

    /// The profile rotated about the longitudinal axis; it stays on its station.
    pub fn heeled(&self, origin: &Point3, angle: Radians) -> Profile {
        Profile {
            station: self.station,
            points: self.points.iter().map(|p| p.heeled(origin, angle)).collect(),
        }
    }

    /// Transverse (y, z) coordinates of the polygon
    pub fn yz(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.y, p.z)).collect()
    }

    /// True if no two non-adjacent edges properly cross.
    pub fn is_simple(&self) -> bool {
        let pts = self.yz();
        let n = pts.len();
        if n < 4 {
            return true;
        }
        for i in 0..n {
            let a = (pts[i], pts[(i + 1) % n]);
            for j in i + 2..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                let b = (pts[j], pts[(j + 1) % n]);
                if segments_cross(a, b) {
                    return false;
                }
            }
        }
        true
    }
}

fn orientation(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

/// Proper crossing of two segments (touching endpoints do not count)
fn segments_cross(s: ((f64, f64), (f64, f64)), t: ((f64, f64), (f64, f64))) -> bool {
    const EPS: f64 = 1e-14;
    let d1 = orientation(t.0, t.1, s.0);
    let d2 = orientation(t.0, t.1, s.1);
    let d3 = orientation(s.0, s.1, t.0);
    let d4 = orientation(s.0, s.1, t.1);
    ((d1 > EPS && d2 < -EPS) || (d1 < -EPS && d2 > EPS)) && ((d3 > EPS && d4 < -EPS) || (d3 < -EPS && d4 > EPS))
}

/// Builds profiles from a fixed set of curves.
#[derive(Debug, Clone, Copy)]
pub struct ProfileBuilder<'a> {
    curves: &'a [Curve],
    ordering: &'a ProfileOrdering,
}

impl<'a> ProfileBuilder<'a> {
    pub fn new(curves: &'a [Curve], ordering: &'a ProfileOrdering) -> Self {
        ProfileBuilder { curves, ordering }
    }

    /// An apex curve closes the hull beyond `station` in the given direction
    fn apex_closes(&self, station: f64, forward: bool) -> bool {
        self.apex_beyond(station, forward).is_some()
    }

    /// Nearest apex point at or beyond `station` in the given direction
    fn apex_beyond(&self, station: f64, forward: bool) -> Option<Point3> {
        self.curves
            .iter()
            .filter(|c| c.is_apex())
            .map(|c| c.points()[0])
            .filter(|p| {
                if forward {
                    p.x >= station - STATION_TOLERANCE
                } else {
                    p.x <= station + STATION_TOLERANCE
                }
            })
            .min_by(|a, b| (a.x - station).abs().total_cmp(&(b.x - station).abs()))
    }

    /// Station range spanned by the curves that are not apexes
    fn body_range(&self) -> Option<(f64, f64)> {
        self.curves
            .iter()
            .filter(|c| !c.is_apex())
            .map(Curve::x_range)
            .fold(None, |acc, (lo, hi)| match acc {
                None => Some((lo, hi)),
                Some((a, b)) => Some((a.min(lo), b.max(hi))),
            })
    }

    /// Point of `curve` on the straight closure from its end toward `apex`.
    fn closure_point(curve: &Curve, forward: bool, apex: Point3, station: f64) -> Point3 {
        let points = curve.points();
        let end = if forward { points[points.len() - 1] } else { points[0] };
        let span = apex.x - end.x;
        let t = if span.abs() > STATION_TOLERANCE {
            ((station - end.x) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        Point3::new(station, end.y + t * (apex.y - end.y), end.z + t * (apex.z - end.z))
    }

    /// Evaluate every curve that reaches `station`, in curve order.
    ///
    /// Between the ends of the curves and an apex lying beyond them, the
    /// curves that end there run straight to the apex.
    fn evaluate_curves(&self, station: f64) -> HydroResult<Vec<(&'a Curve, Point3)>> {
        let body = self.body_range();
        let mut evaluated = Vec::with_capacity(self.curves.len());
        for curve in self.curves {
            if curve.is_apex() {
                let apex = curve.points()[0];
                if (apex.x - station).abs() <= STATION_TOLERANCE {
                    evaluated.push((curve, Point3::new(station, apex.y, apex.z)));
                }
                continue;
            }
            if curve.covers(station) {
                evaluated.push((curve, curve.evaluate(station)?));
                continue;
            }
            let (lo, hi) = curve.x_range();
            let forward = station > hi;
            let end = if forward { hi } else { lo };
            let ends_body = body.map_or(false, |(body_lo, body_hi)| {
                let body_end = if forward { body_hi } else { body_lo };
                (end - body_end).abs() <= STATION_TOLERANCE
            });
            if ends_body {
                if let Some(apex) = self.apex_beyond(station, forward) {
                    evaluated.push((curve, Self::closure_point(curve, forward, apex, station)));
                    continue;
                }
            }
            let closed = if forward {
                curve.closes_at_end() || self.apex_closes(station, true)
            } else {
                curve.closes_at_start() || self.apex_closes(station, false)
            };
            if !closed {
                return Err(HydroError::geometry(
                    station,
                    format!(
                        "curve '{}' is undefined here (range [{lo}, {hi}]) and does not close onto the centerline",
                        curve.name()
                    ),
                ));
            }
        }
        Ok(evaluated)
    }

    /// Sort evaluated points from deck to keel.
    fn order(&self, evaluated: &mut [(&'a Curve, Point3)]) {
        match self.ordering {
            ProfileOrdering::Vertical => evaluated.sort_by(|(ca, a), (cb, b)| {
                b.z.total_cmp(&a.z)
                    .then(b.y.abs().total_cmp(&a.y.abs()))
                    .then_with(|| ca.name().cmp(cb.name()))
            }),
            ProfileOrdering::Explicit { levels } => {
                let rank = |c: &Curve| levels.iter().position(|l| l == c.name()).unwrap_or(usize::MAX);
                evaluated.sort_by(|(ca, _), (cb, _)| rank(ca).cmp(&rank(cb)).then_with(|| ca.name().cmp(cb.name())));
            }
        }
    }

    /// The closed profile at `station`.
    pub fn build(&self, station: f64) -> HydroResult<Profile> {
        let mut evaluated = self.evaluate_curves(station)?;
        if evaluated.len() < 2 {
            return Err(HydroError::geometry(
                station,
                format!(
                    "only {} curve(s) reach this station; at least 2 are needed to close a profile",
                    evaluated.len()
                ),
            ));
        }
        self.order(&mut evaluated);

        // Opposite side deck -> keel, then modelled side keel -> deck
        let mut polygon: Vec<Point3> = Vec::with_capacity(evaluated.len() * 2);
        polygon.extend(
            evaluated
                .iter()
                .filter(|(_, p)| !p.on_centerline())
                .map(|(_, p)| p.mirrored()),
        );
        polygon.extend(evaluated.iter().rev().map(|(_, p)| *p));

        polygon.dedup_by(|a, b| a.distance_to(b) <= MERGE_TOLERANCE);
        while polygon.len() > 1 && polygon[0].distance_to(&polygon[polygon.len() - 1]) <= MERGE_TOLERANCE {
            polygon.pop();
        }

        let profile = Profile::new(station, polygon)?;
        if !profile.is_simple() {
            return Err(HydroError::geometry(station, "assembled profile is self-intersecting"));
        }
        Ok(profile)
    }

    /// Every distinct control-point station, ascending
    pub fn main_stations(&self) -> Vec<f64> {
        let mut stations: Vec<f64> = self
            .curves
            .iter()
            .flat_map(|c| c.points().iter().map(|p| p.x))
            .collect();
        stations.sort_by(f64::total_cmp);
        stations.dedup_by(|a, b| (*a - *b).abs() <= STATION_TOLERANCE);
        stations
    }

    /// Profiles at every main station
    pub fn main_profiles(&self) -> HydroResult<Vec<Profile>> {
        self.main_stations().into_iter().map(|x| self.build(x)).collect()
    }
}

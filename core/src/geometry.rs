//! Geometry primitives: planar polygon area, ray-casting containment and
//! haversine distance.
//!
//! RULE: Everything here is a pure function of its inputs.
//! No I/O, no logging, no allocation beyond the caller's data.

use crate::types::{Meters, SquareMeters};
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by [`haversine_distance`].
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Square degrees → square meters at the survey area's reference latitude.
///
/// A single-latitude approximation applied to every field regardless of where
/// it actually lies. Areas are comparable with each other and with the
/// existing API consumers, not geodesically exact.
pub const AREA_SCALE: f64 = 12_387.1;

const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A closed ring of at least three vertices. The last vertex connects back
/// to the first implicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    vertices: Vec<GeoPoint>,
}

impl Polygon {
    /// Returns `None` when fewer than three vertices are supplied.
    pub fn new(vertices: Vec<GeoPoint>) -> Option<Self> {
        (vertices.len() >= 3).then_some(Self { vertices })
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    pub fn area(&self) -> SquareMeters {
        polygon_area(&self.vertices)
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point_in_polygon(point, &self.vertices)
    }
}

/// Shoelace area of `ring`, scaled by [`AREA_SCALE`].
///
/// Orientation does not matter: the absolute value of the signed sum is used.
pub fn polygon_area(ring: &[GeoPoint]) -> SquareMeters {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.lng * b.lat - b.lng * a.lat;
    }

    sum.abs() / 2.0 * AREA_SCALE
}

/// Crossing-number test: casts a ray from `point` towards increasing
/// longitude and toggles on every edge it crosses.
///
/// Points exactly on an edge may land on either side.
pub fn point_in_polygon(point: GeoPoint, ring: &[GeoPoint]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let pi = ring[i];
        let pj = ring[j];

        // Strict straddle on one side keeps horizontal edges out,
        // so the division below never sees a zero span.
        if (pi.lat > point.lat) != (pj.lat > point.lat) {
            let crossing_lng = (pj.lng - pi.lng) * (point.lat - pi.lat) / (pj.lat - pi.lat) + pi.lng;
            if point.lng < crossing_lng {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// Great-circle distance between two points, in meters.
///
/// Symmetric in its arguments; zero for identical points.
pub fn haversine_distance(from: GeoPoint, to: GeoPoint) -> Meters {
    let lat1 = from.lat * DEG_TO_RAD;
    let lat2 = to.lat * DEG_TO_RAD;
    let delta_lat = (to.lat - from.lat) * DEG_TO_RAD;
    let delta_lng = (to.lng - from.lng) * DEG_TO_RAD;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

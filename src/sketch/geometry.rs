//! Coordinate helpers used by the vertex engine and the shapes.

use crate::constants::{EARTH_RADIUS_METERS, LATITUDE_FACTOR};

use super::types::Position;

/// Center of the bounding box of two positions.
pub fn midpoint(a: Position, b: Position) -> Position {
    Position::new((a.lat + b.lat) / 2.0, (a.lng + b.lng) / 2.0)
}

/// Center of the bounding box of a position list.
pub fn bounds_center(positions: &[Position]) -> Option<Position> {
    let first = positions.first()?;
    let (mut min, mut max) = (*first, *first);
    for p in &positions[1..] {
        min.lat = min.lat.min(p.lat);
        min.lng = min.lng.min(p.lng);
        max.lat = max.lat.max(p.lat);
        max.lng = max.lng.max(p.lng);
    }
    Some(midpoint(min, max))
}

/// Great-circle distance in meters on a spherical earth.
pub fn haversine_distance(a: Position, b: Position) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// Point due east of `center` at roughly `radius` meters.
///
/// Uses the fixed 111300 m-per-degree band approximation, so accuracy drops near the poles.
pub fn radius_point(center: Position, radius: f64) -> Position {
    let d_lng = radius / (LATITUDE_FACTOR * center.lat.to_radians().cos());
    center.offset(0.0, d_lng)
}

/// Difference `to - from` as a lat/lng delta.
pub fn delta(from: Position, to: Position) -> Position {
    Position::new(to.lat - from.lat, to.lng - from.lng)
}

pub fn translate(positions: &mut [Position], delta: Position) {
    for p in positions {
        *p = p.offset(delta.lat, delta.lng);
    }
}

/// Formats a segment length for distance labels.
pub fn format_distance(meters: f64) -> String {
    format!("{meters:.2} m")
}

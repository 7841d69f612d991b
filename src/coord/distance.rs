//! Great-circle distance
//!
//! Haversine formula on a spherical Earth. Inputs are not validated; callers
//! check coordinates at the boundary where they enter the program.

use crate::constants::geo::EARTH_RADIUS_METERS;
use crate::coord::Coordinates;

/// Calculate the distance between two points in meters (Haversine formula)
///
/// # Arguments
/// * `p1` - First point
/// * `p2` - Second point
///
/// # Returns
/// Distance in meters, exactly 0.0 when both points are identical
pub fn haversine_distance(p1: Coordinates, p2: Coordinates) -> f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let delta_lat = (p2.lat - p1.lat).to_radians();
    let delta_lng = (p2.lng - p1.lng).to_radians();

    // Rounding can push `a` just past 1 for near-antipodal points
    let a = ((delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Format a distance for display, rounded to whole meters
pub fn format_meters(distance: f64) -> String {
    format!("{:.0} m", distance)
}

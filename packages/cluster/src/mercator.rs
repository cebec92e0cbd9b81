//! Web Mercator projection between WGS84 degrees and normalized world
//! coordinates in `[0, 1]²` (x east, y south).
//!
//! The aggregation radius is expressed in screen pixels; working in
//! world coordinates lets a single index serve every zoom level, with
//! the radius rescaled per zoom.

use std::f64::consts::PI;

/// Longitude in degrees to world x.
pub(crate) fn lng_to_x(lng: f64) -> f64 {
    lng / 360.0 + 0.5
}

/// Latitude in degrees to world y, clamped at the projection poles.
pub(crate) fn lat_to_y(lat: f64) -> f64 {
    let sin = (lat * PI / 180.0).sin();
    let y = 0.25f64.mul_add(-(((1.0 + sin) / (1.0 - sin)).ln() / PI), 0.5);
    y.clamp(0.0, 1.0)
}

/// World x back to longitude in degrees.
pub(crate) fn x_to_lng(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

/// World y back to latitude in degrees.
pub(crate) fn y_to_lat(y: f64) -> f64 {
    let y2 = y.mul_add(-360.0, 180.0) * PI / 180.0;
    360.0 * y2.exp().atan() / PI - 90.0
}

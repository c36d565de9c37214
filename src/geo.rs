//! Spherical distance math for the nearby-jobs matcher.
//!
//! The indexed path runs inside Postgres (earthdistance); this module is the
//! fallback for legacy rows without indexed coordinates, plus the input
//! validation both paths share.

use crate::errors::AppError;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// Great-circle (haversine) distance in meters between two lat/lon points.
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Degree-space search window around a point.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Bounding box wide enough to contain every point within `max_distance_m`
/// of (`lat`, `lon`). The longitude delta is widened by 1/cos(lat) because
/// meridians converge toward the poles; the cosine is clamped so the box
/// stays finite near them.
pub fn bounding_box(lat: f64, lon: f64, max_distance_m: f64) -> BoundingBox {
    let deg_delta = max_distance_m / METERS_PER_DEGREE;
    let lon_delta = (deg_delta / lat.to_radians().cos().max(1e-4)).abs();

    BoundingBox {
        min_lat: lat - deg_delta,
        max_lat: lat + deg_delta,
        min_lon: lon - lon_delta,
        max_lon: lon + lon_delta,
    }
}

/// Reject coordinates before any distance math sees them. NaN and infinity
/// never reach a query; a (0, 0) pair is the legacy "never set" default.
pub fn validate_vendor_location(lat: f64, lon: f64) -> Result<(), AppError> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(AppError::InvalidInput(
            "Invalid vendor coordinates".to_string(),
        ));
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::InvalidInput(
            "Coordinates out of range".to_string(),
        ));
    }
    if lat == 0.0 && lon == 0.0 {
        return Err(AppError::InvalidInput(
            "Vendor location not set. Please update your profile with valid latitude & longitude."
                .to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_longitude_at_equator() {
        // Reference value: 1° of arc on a 6371 km sphere ≈ 111195 m.
        let d = haversine_distance_m(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111_195.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = haversine_distance_m(19.076, 72.8777, 18.5204, 73.8567);
        let b = haversine_distance_m(18.5204, 73.8567, 19.076, 72.8777);
        assert!((a - b).abs() < 1e-6);
        // Mumbai–Pune is roughly 120 km as the crow flies.
        assert!((100_000.0..150_000.0).contains(&a), "got {a}");
    }

    #[test]
    fn zero_distance_for_identical_points() {
        assert_eq!(haversine_distance_m(12.97, 77.59, 12.97, 77.59), 0.0);
    }

    #[test]
    fn radius_boundary_is_exclusive_above_and_inclusive_below() {
        let max = 20_000.0;
        // Walk ~20 km due north from the equator: 1 m of latitude is
        // 1/111195 of a degree.
        let just_inside = (max - 1.0) / METERS_PER_DEGREE;
        let just_outside = (max + 1.0) / METERS_PER_DEGREE;

        let d_in = haversine_distance_m(0.0, 0.0, just_inside, 0.0);
        let d_out = haversine_distance_m(0.0, 0.0, just_outside, 0.0);

        assert!(d_in <= max, "inside point measured {d_in}");
        assert!(d_out > max, "outside point measured {d_out}");
    }

    #[test]
    fn bounding_box_widens_longitude_at_high_latitude() {
        let equator = bounding_box(0.0, 0.0, 20_000.0);
        let oslo = bounding_box(60.0, 10.0, 20_000.0);

        let eq_lon_span = equator.max_lon - equator.min_lon;
        let oslo_lon_span = oslo.max_lon - oslo.min_lon;

        // cos(60°) = 0.5, so the span should roughly double.
        assert!(oslo_lon_span > eq_lon_span * 1.9);
        // Latitude span is independent of latitude.
        assert!(((oslo.max_lat - oslo.min_lat) - (equator.max_lat - equator.min_lat)).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_contains_radius() {
        let b = bounding_box(19.076, 72.8777, 20_000.0);
        // A point 19.9 km due east must fall inside the box.
        let lon_per_m = 1.0 / (METERS_PER_DEGREE * (19.076_f64).to_radians().cos());
        let east = 72.8777 + 19_900.0 * lon_per_m;
        assert!(east < b.max_lon);
    }

    #[test]
    fn unset_and_malformed_locations_are_rejected() {
        assert!(validate_vendor_location(0.0, 0.0).is_err());
        assert!(validate_vendor_location(f64::NAN, 72.0).is_err());
        assert!(validate_vendor_location(19.0, f64::INFINITY).is_err());
        assert!(validate_vendor_location(91.0, 0.0).is_err());
        assert!(validate_vendor_location(0.0, 181.0).is_err());
        assert!(validate_vendor_location(19.076, 72.8777).is_ok());
    }
}

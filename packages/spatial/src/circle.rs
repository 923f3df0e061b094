//! Geodesic circle approximation.
//!
//! Vertices are placed with the spherical destination formula at evenly
//! spaced bearings, the same construction web map libraries use for
//! radius search circles.

use geo::{Coord, LineString, Polygon};
use selectie_geography_models::LatLng;

use crate::GeometryError;

/// Mean earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.008_8;

/// Number of vertices used for search circles.
pub const DEFAULT_STEPS: usize = 64;

/// Point reached by travelling `distance_km` from `origin` along
/// `bearing_deg` (clockwise from north) on a sphere.
#[must_use]
pub fn destination(origin: LatLng, bearing_deg: f64, distance_km: f64) -> LatLng {
    let lat1 = origin.lat.to_radians();
    let lng1 = origin.lng.to_radians();
    let bearing = bearing_deg.to_radians();
    let angular = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    LatLng::new(lat2.to_degrees(), lng2.to_degrees())
}

/// Great-circle distance between two points in kilometres.
#[must_use]
pub fn haversine_km(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Builds a closed polygon approximating a circle of `radius_km` around
/// `center`.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidRadius`] if the radius is not a
/// strictly positive finite number, and
/// [`GeometryError::InvalidCenter`] if the center is not finite.
pub fn geodesic_circle(
    center: LatLng,
    radius_km: f64,
    steps: usize,
) -> Result<Polygon<f64>, GeometryError> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(GeometryError::InvalidRadius { radius_km });
    }
    if !center.lat.is_finite() || !center.lng.is_finite() {
        return Err(GeometryError::InvalidCenter {
            lat: center.lat,
            lng: center.lng,
        });
    }

    let steps = steps.max(3);
    #[allow(clippy::cast_precision_loss)]
    let step_deg = -360.0 / steps as f64;

    let mut coords: Vec<Coord<f64>> = (0..steps)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let vertex = destination(center, i as f64 * step_deg, radius_km);
            Coord {
                x: vertex.lng,
                y: vertex.lat,
            }
        })
        .collect();
    coords.push(coords[0]);

    Ok(Polygon::new(LineString::from(coords), vec![]))
}

#[cfg(test)]
mod tests {
    use geo::{BoundingRect, Contains};

    use super::*;

    #[test]
    fn destination_north_moves_latitude_only() {
        let origin = LatLng::new(50.0, 4.0);
        let north = destination(origin, 0.0, 111.195);
        assert!((north.lat - 51.0).abs() < 1e-3);
        assert!((north.lng - 4.0).abs() < 1e-9);
    }

    #[test]
    fn circle_vertices_lie_on_radius() {
        let center = LatLng::new(50.85, 4.35);
        let circle = geodesic_circle(center, 25.0, DEFAULT_STEPS).unwrap();

        assert_eq!(circle.exterior().0.len(), DEFAULT_STEPS + 1);
        for coord in circle.exterior().coords() {
            let d = haversine_km(center, LatLng::new(coord.y, coord.x));
            assert!((d - 25.0).abs() < 1e-6, "vertex at {d} km");
        }
        assert!(circle.contains(&center.to_point()));
    }

    #[test]
    fn larger_radius_has_larger_extent() {
        let center = LatLng::new(50.5, 4.5);
        let small = geodesic_circle(center, 5.0, DEFAULT_STEPS)
            .unwrap()
            .bounding_rect()
            .unwrap();
        let large = geodesic_circle(center, 100.0, DEFAULT_STEPS)
            .unwrap()
            .bounding_rect()
            .unwrap();
        assert!(large.width() > small.width());
        assert!(large.height() > small.height());
    }

    #[test]
    fn rejects_non_positive_radius() {
        let center = LatLng::new(50.5, 4.5);
        assert!(matches!(
            geodesic_circle(center, 0.0, DEFAULT_STEPS),
            Err(GeometryError::InvalidRadius { .. })
        ));
        assert!(geodesic_circle(center, -5.0, DEFAULT_STEPS).is_err());
        assert!(geodesic_circle(center, f64::NAN, DEFAULT_STEPS).is_err());
        assert!(geodesic_circle(LatLng::new(f64::NAN, 4.5), 5.0, DEFAULT_STEPS).is_err());
    }
}

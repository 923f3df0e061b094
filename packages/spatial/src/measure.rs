//! Area and centroid of region geometry.

use geo::{Centroid, ChamberlainDuquetteArea};
use selectie_geography_models::{LatLng, Region};

use crate::GeometryError;

const SQ_METERS_PER_SQ_KM: f64 = 1_000_000.0;

/// Area of a region on the sphere, in square kilometres.
#[must_use]
pub fn area_km2(region: &Region) -> f64 {
    region.geometry.chamberlain_duquette_unsigned_area() / SQ_METERS_PER_SQ_KM
}

/// Planar centroid of a region.
///
/// # Errors
///
/// Returns [`GeometryError::EmptyGeometry`] if the geometry has no area
/// to take a centroid of.
pub fn centroid(region: &Region) -> Result<LatLng, GeometryError> {
    region
        .geometry
        .centroid()
        .map(LatLng::from)
        .ok_or_else(|| GeometryError::EmptyGeometry {
            region: region.id.clone(),
        })
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Radius selection over region polygons.
//!
//! Builds a geodesic circle around a clicked point and returns every
//! region of the active tier whose geometry intersects it, in the
//! regions' original order. An R-tree over region envelopes prunes
//! candidates before the exact polygon intersection test.

pub mod circle;
pub mod measure;

use geo::{BoundingRect, Intersects, MultiPolygon, Polygon};
use rstar::{AABB, RTree, RTreeObject};
use selectie_geography_models::{LatLng, Region};
use thiserror::Error;

pub use circle::{DEFAULT_STEPS, geodesic_circle};

/// Per-region or per-query geometry failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Region has no polygons.
    #[error("Region {region} has an empty geometry")]
    EmptyGeometry {
        /// Offending region id.
        region: String,
    },

    /// Region has a NaN or infinite coordinate.
    #[error("Region {region} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Offending region id.
        region: String,
    },

    /// Search radius is not a strictly positive finite number.
    #[error("Invalid search radius {radius_km} km")]
    InvalidRadius {
        /// The rejected radius.
        radius_km: f64,
    },

    /// Search center is not a finite coordinate.
    #[error("Invalid search center ({lat}, {lng})")]
    InvalidCenter {
        /// Rejected latitude.
        lat: f64,
        /// Rejected longitude.
        lng: f64,
    },
}

/// A region's bounding envelope stored in the R-tree, pointing back at
/// its position in the tier list.
struct RegionEnvelope {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for RegionEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Envelope index over one tier's regions.
///
/// Built once per tier after loading. Queries only narrow the candidate
/// set; results always come back in the regions' original order.
pub struct RegionIndex<'a> {
    regions: &'a [Region],
    tree: RTree<RegionEnvelope>,
}

impl std::fmt::Debug for RegionIndex<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionIndex")
            .field("regions", &self.regions.len())
            .field("indexed", &self.tree.size())
            .finish()
    }
}

impl<'a> RegionIndex<'a> {
    /// Builds an index over `regions`. Regions without a usable bounding
    /// box (empty or non-finite geometry) are left out of the tree.
    #[must_use]
    pub fn build(regions: &'a [Region]) -> Self {
        let entries: Vec<RegionEnvelope> = regions
            .iter()
            .enumerate()
            .filter_map(|(index, region)| {
                compute_envelope(&region.geometry).map(|envelope| RegionEnvelope { index, envelope })
            })
            .collect();

        log::debug!(
            "Indexed {}/{} region envelopes",
            entries.len(),
            regions.len()
        );

        Self {
            regions,
            tree: RTree::bulk_load(entries),
        }
    }

    /// Regions intersecting a circle of `radius_km` around `center`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the radius or center is invalid.
    /// Regions that fail their own geometry checks are skipped.
    pub fn select(&self, center: LatLng, radius_km: f64) -> Result<Vec<&'a Region>, GeometryError> {
        Ok(self
            .select_indices(center, radius_km)?
            .into_iter()
            .map(|index| &self.regions[index])
            .collect())
    }

    /// Like [`Self::select`], but returns positions in the tier list.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the radius or center is invalid.
    pub fn select_indices(
        &self,
        center: LatLng,
        radius_km: f64,
    ) -> Result<Vec<usize>, GeometryError> {
        let circle = geodesic_circle(center, radius_km, DEFAULT_STEPS)?;
        let Some(query_env) = compute_polygon_envelope(&circle) else {
            return Ok(Vec::new());
        };

        let mut candidates: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&query_env)
            .map(|entry| entry.index)
            .collect();
        candidates.sort_unstable();

        Ok(candidates
            .into_iter()
            .filter(|index| matches_circle(&circle, &self.regions[*index]))
            .collect())
    }

    /// The regions this index was built over.
    #[must_use]
    pub const fn regions(&self) -> &'a [Region] {
        self.regions
    }
}

/// Regions intersecting a circle of `radius_km` around `point`, in their
/// original relative order.
///
/// Scans every region; use [`RegionIndex`] when the same tier is queried
/// repeatedly.
///
/// # Errors
///
/// Returns [`GeometryError`] if the radius or point is invalid. Regions
/// that fail their own geometry checks are skipped.
pub fn select_regions(
    regions: &[Region],
    point: LatLng,
    radius_km: f64,
) -> Result<Vec<&Region>, GeometryError> {
    let circle = geodesic_circle(point, radius_km, DEFAULT_STEPS)?;
    Ok(regions
        .iter()
        .filter(|region| matches_circle(&circle, region))
        .collect())
}

/// Tests a single region against the search circle.
///
/// # Errors
///
/// Returns [`GeometryError`] if the region's geometry is empty or has a
/// non-finite coordinate.
pub fn intersects_circle(circle: &Polygon<f64>, region: &Region) -> Result<bool, GeometryError> {
    if region.geometry.0.is_empty() {
        return Err(GeometryError::EmptyGeometry {
            region: region.id.clone(),
        });
    }

    let finite = region.geometry.0.iter().all(|polygon| {
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .flat_map(|ring| ring.coords())
            .all(|c| c.x.is_finite() && c.y.is_finite())
    });
    if !finite {
        return Err(GeometryError::NonFiniteCoordinate {
            region: region.id.clone(),
        });
    }

    Ok(circle.intersects(&region.geometry))
}

fn matches_circle(circle: &Polygon<f64>, region: &Region) -> bool {
    intersects_circle(circle, region).unwrap_or_else(|e| {
        log::debug!("Skipping region during selection: {e}");
        false
    })
}

/// Compute the bounding box envelope for a [`MultiPolygon`]. Envelopes
/// with non-finite corners are rejected so they never enter the tree.
fn compute_envelope(mp: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    mp.bounding_rect()
        .filter(|rect| {
            [rect.min().x, rect.min().y, rect.max().x, rect.max().y]
                .iter()
                .all(|v| v.is_finite())
        })
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}

fn compute_polygon_envelope(polygon: &Polygon<f64>) -> Option<AABB<[f64; 2]>> {
    polygon
        .bounding_rect()
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use geo::polygon;
    use selectie_geography_models::Tier;

    use super::*;

    /// A 4x4 grid of 0.25 degree cells covering 4.0-5.0 E, 50.0-51.0 N,
    /// row-major from the south-west corner.
    fn grid(tier: Tier) -> Vec<Region> {
        let mut regions = Vec::new();
        for row in 0..4 {
            for col in 0..4 {
                let x0 = 4.0 + f64::from(col) * 0.25;
                let y0 = 50.0 + f64::from(row) * 0.25;
                regions.push(Region {
                    id: format!("{tier}-{row}-{col}"),
                    tier,
                    names: BTreeMap::new(),
                    geometry: MultiPolygon(vec![polygon![
                        (x: x0, y: y0),
                        (x: x0 + 0.25, y: y0),
                        (x: x0 + 0.25, y: y0 + 0.25),
                        (x: x0, y: y0 + 0.25),
                        (x: x0, y: y0),
                    ]]),
                });
            }
        }
        regions
    }

    fn ids(regions: &[&Region]) -> Vec<String> {
        regions.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn small_radius_selects_containing_cell() {
        let regions = grid(Tier::District);
        let selected = select_regions(&regions, LatLng::new(50.125, 4.125), 5.0).unwrap();
        assert_eq!(ids(&selected), vec!["district-0-0"]);
    }

    #[test]
    fn point_outside_envelope_selects_nothing_for_any_tier_and_radius() {
        let far = LatLng::new(45.0, 1.0);
        for tier in Tier::ALL {
            let regions = grid(*tier);
            for radius in [5.0, 25.0, 50.0, 100.0] {
                assert!(select_regions(&regions, far, radius).unwrap().is_empty());
            }
        }
    }

    #[test]
    fn selection_grows_monotonically_with_radius() {
        let regions = grid(Tier::PostalArea);
        let center = LatLng::new(50.4, 4.4);
        let mut previous: Vec<String> = Vec::new();

        for radius in [5.0, 10.0, 20.0, 40.0, 60.0, 100.0] {
            let current = ids(&select_regions(&regions, center, radius).unwrap());
            for id in &previous {
                assert!(current.contains(id), "{id} dropped at radius {radius}");
            }
            previous = current;
        }
        assert_eq!(previous.len(), 16);
    }

    #[test]
    fn selection_is_deterministic_and_ordered() {
        let regions = grid(Tier::District);
        let center = LatLng::new(50.5, 4.5);

        let first = ids(&select_regions(&regions, center, 30.0).unwrap());
        let second = ids(&select_regions(&regions, center, 30.0).unwrap());
        assert_eq!(first, second);

        let mut sorted = first.clone();
        sorted.sort_by_key(|id| regions.iter().position(|r| &r.id == id));
        assert_eq!(first, sorted);
    }

    #[test]
    fn malformed_region_is_skipped() {
        let mut regions = grid(Tier::District);
        regions[0].geometry = MultiPolygon(vec![]);
        regions[1].geometry = MultiPolygon(vec![polygon![
            (x: f64::NAN, y: 50.0),
            (x: 4.5, y: 50.0),
            (x: 4.5, y: 50.25),
            (x: f64::NAN, y: 50.0),
        ]]);

        let selected = select_regions(&regions, LatLng::new(50.5, 4.5), 100.0).unwrap();
        assert_eq!(selected.len(), 14);
        assert!(!ids(&selected).contains(&"district-0-0".to_string()));
    }

    #[test]
    fn index_matches_full_scan() {
        let regions = grid(Tier::Province);
        let index = RegionIndex::build(&regions);

        for (center, radius) in [
            (LatLng::new(50.1, 4.1), 5.0),
            (LatLng::new(50.5, 4.5), 20.0),
            (LatLng::new(50.9, 4.9), 45.0),
            (LatLng::new(49.0, 3.0), 100.0),
        ] {
            let scanned = ids(&select_regions(&regions, center, radius).unwrap());
            let indexed = ids(&index.select(center, radius).unwrap());
            assert_eq!(scanned, indexed, "mismatch at {center:?} r={radius}");
        }
    }

    #[test]
    fn invalid_radius_is_an_error() {
        let regions = grid(Tier::District);
        assert!(matches!(
            select_regions(&regions, LatLng::new(50.5, 4.5), 0.0),
            Err(GeometryError::InvalidRadius { .. })
        ));
    }
}

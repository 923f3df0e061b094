//! Country outline and fill derivation.
//!
//! When the pre-computed outline/fill files are unavailable, the fill is
//! the union of every district polygon and the outline is the exterior
//! ring of the largest polygon in that union.

use geo::{BooleanOps, ChamberlainDuquetteArea, MultiPolygon, Polygon, Validation};
use selectie_geography_models::Region;

use crate::GeographyError;

/// Unions the geometry of every region.
///
/// Regions whose geometry is invalid (self-intersecting rings,
/// non-finite coordinates, ...) are skipped and logged; the union of the
/// remaining regions is still returned. Returns `None` when no region
/// could be unioned.
#[must_use]
pub fn union_regions(regions: &[Region]) -> Option<MultiPolygon<f64>> {
    let mut combined: Option<MultiPolygon<f64>> = None;
    let mut skipped = 0usize;

    for region in regions {
        match checked_geometry(region) {
            Ok(geometry) => {
                combined = Some(match combined {
                    None => geometry.clone(),
                    Some(acc) => acc.union(geometry),
                });
            }
            Err(e) => {
                skipped += 1;
                log::debug!("Skipping region in union: {e}");
            }
        }
    }

    if skipped > 0 {
        log::warn!(
            "Skipped {skipped}/{} regions while computing the union",
            regions.len()
        );
    }

    combined
}

/// Picks the exterior ring of the largest-area polygon as the outline.
#[must_use]
pub fn largest_exterior(fill: &MultiPolygon<f64>) -> Option<Polygon<f64>> {
    fill.0
        .iter()
        .map(|polygon| (polygon.chamberlain_duquette_unsigned_area(), polygon))
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, polygon)| Polygon::new(polygon.exterior().clone(), vec![]))
}

/// Derives both fill and outline from a region list.
#[must_use]
pub fn derive_outline_and_fill(
    regions: &[Region],
) -> (Option<Polygon<f64>>, Option<MultiPolygon<f64>>) {
    let fill = union_regions(regions);
    let outline = fill.as_ref().and_then(largest_exterior);
    (outline, fill)
}

fn checked_geometry(region: &Region) -> Result<&MultiPolygon<f64>, GeographyError> {
    if region.geometry.0.is_empty() {
        return Err(GeographyError::Conversion {
            message: format!("Region {} has an empty geometry", region.id),
        });
    }
    if !region.geometry.is_valid() {
        return Err(GeographyError::Conversion {
            message: format!("Region {} has an invalid geometry", region.id),
        });
    }
    Ok(&region.geometry)
}

//! Normalizes `GeoJSON` features into [`Region`] values.
//!
//! Each feature is converted independently; a feature with a missing or
//! non-areal geometry is logged and skipped instead of failing the whole
//! collection.

use std::collections::BTreeMap;

use geo::{Geometry, MultiPolygon};
use geojson::{Feature, GeoJson, JsonObject};
use selectie_geography_models::{ID_PROPERTY_ALIASES, Region, Tier};

use crate::GeographyError;

/// Parses a `FeatureCollection` document into regions of one tier,
/// preserving feature order.
///
/// # Errors
///
/// Returns [`GeographyError`] if the text is not valid `GeoJSON` or is not
/// a `FeatureCollection`. Individual bad features are skipped, not errors.
pub fn parse_regions(text: &str, tier: Tier) -> Result<Vec<Region>, GeographyError> {
    let geojson: GeoJson = text.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(GeographyError::Conversion {
            message: format!("Expected a FeatureCollection for the {tier} tier"),
        });
    };

    let total = collection.features.len();
    let regions: Vec<Region> = collection
        .features
        .into_iter()
        .enumerate()
        .filter_map(|(index, feature)| match normalize_feature(feature, tier, index) {
            Ok(region) => Some(region),
            Err(e) => {
                log::warn!("Skipping {tier} feature {index}: {e}");
                None
            }
        })
        .collect();

    log::debug!("Normalized {}/{total} {tier} features", regions.len());
    Ok(regions)
}

/// Converts one feature into a [`Region`].
///
/// # Errors
///
/// Returns [`GeographyError`] if the feature has no geometry or its
/// geometry is not a `Polygon` or `MultiPolygon`.
pub fn normalize_feature(
    feature: Feature,
    tier: Tier,
    index: usize,
) -> Result<Region, GeographyError> {
    let names = string_properties(feature.properties.as_ref());
    let id = feature_id(&feature, &names).unwrap_or_else(|| format!("{tier}-{index}"));

    let geometry = feature
        .geometry
        .ok_or_else(|| GeographyError::Conversion {
            message: format!("Feature {id} has no geometry"),
        })?;
    let geometry = to_multi_polygon(Geometry::<f64>::try_from(geometry)?).ok_or_else(|| {
        GeographyError::Conversion {
            message: format!("Feature {id} is not a polygon"),
        }
    })?;

    Ok(Region {
        id,
        tier,
        names,
        geometry,
    })
}

/// Parses a single-feature document (outline or fill) into a
/// multi-polygon.
///
/// Accepts a bare `Feature`, a bare `Geometry`, or a `FeatureCollection`
/// whose first feature carries the geometry.
///
/// # Errors
///
/// Returns [`GeographyError`] if the document is not valid `GeoJSON` or
/// does not contain an areal geometry.
pub fn parse_area(text: &str) -> Result<MultiPolygon<f64>, GeographyError> {
    let geometry = match text.parse::<GeoJson>()? {
        GeoJson::Feature(feature) => feature.geometry,
        GeoJson::Geometry(geometry) => Some(geometry),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .next()
            .and_then(|feature| feature.geometry),
    };

    let geometry = geometry.ok_or_else(|| GeographyError::Conversion {
        message: "Area document has no geometry".to_string(),
    })?;

    to_multi_polygon(Geometry::<f64>::try_from(geometry)?).ok_or_else(|| {
        GeographyError::Conversion {
            message: "Area document is not a polygon".to_string(),
        }
    })
}

/// Narrows a geometry to a multi-polygon. Single polygons are wrapped.
#[must_use]
pub fn to_multi_polygon(geometry: Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match geometry {
        Geometry::MultiPolygon(mp) => Some(mp),
        Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

fn string_properties(properties: Option<&JsonObject>) -> BTreeMap<String, String> {
    properties
        .into_iter()
        .flatten()
        .filter_map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s.trim().to_string(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => return None,
            };
            (!text.is_empty()).then(|| (key.clone(), text))
        })
        .collect()
}

fn feature_id(feature: &Feature, names: &BTreeMap<String, String>) -> Option<String> {
    ID_PROPERTY_ALIASES
        .iter()
        .find_map(|key| names.get(*key).cloned())
        .or_else(|| {
            feature.id.as_ref().map(|id| match id {
                geojson::feature::Id::String(s) => s.clone(),
                geojson::feature::Id::Number(n) => n.to_string(),
            })
        })
}

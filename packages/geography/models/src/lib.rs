#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region and boundary types for the geographic selection demo.
//!
//! A [`Region`] is a named polygon belonging to exactly one [`Tier`]
//! (district, province or postal area). Regions are loaded once from
//! static `GeoJSON` files into a [`BoundarySet`] and never mutated
//! afterwards.

use std::collections::BTreeMap;

use geo::{MultiPolygon, Polygon, Rect};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Property keys tried, in priority order, when resolving a region's
/// display label.
pub const NAME_PROPERTY_ALIASES: &[&str] = &[
    "name_nl", "name_fr", "name_de", "name", "NAME", "naam", "postcode",
];

/// Property keys tried, in priority order, when resolving a region's
/// stable identifier.
pub const ID_PROPERTY_ALIASES: &[&str] = &["id", "code", "nis", "nis_code", "postcode"];

/// Region granularity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Tier {
    /// Administrative districts (arrondissementen).
    District,
    /// Provinces.
    Province,
    /// Postal code areas.
    PostalArea,
}

impl Tier {
    /// All tiers, in the order the view-mode toggle presents them.
    pub const ALL: &[Self] = &[Self::District, Self::Province, Self::PostalArea];

    /// Generic label used when a feature carries no name property.
    #[must_use]
    pub const fn fallback_label(self) -> &'static str {
        match self {
            Self::District => "Arrondissement",
            Self::Province => "Provincie",
            Self::PostalArea => "Postcode",
        }
    }
}

/// A WGS84 coordinate as clicked on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Converts to a `geo` point (x = longitude, y = latitude).
    #[must_use]
    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.lng, self.lat)
    }
}

impl From<geo::Point<f64>> for LatLng {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

/// A named polygon belonging to one tier.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Stable identifier, unique within a tier.
    pub id: String,
    /// Granularity this region belongs to.
    pub tier: Tier,
    /// Every string property of the source feature (`name_nl`,
    /// `name_fr`, ...), keyed by property name.
    pub names: BTreeMap<String, String>,
    /// Region geometry. Single polygons are stored as a one-element
    /// multi-polygon.
    pub geometry: MultiPolygon<f64>,
}

impl Region {
    /// Display label, resolved through [`NAME_PROPERTY_ALIASES`].
    #[must_use]
    pub fn display_name(&self) -> &str {
        NAME_PROPERTY_ALIASES
            .iter()
            .find_map(|key| self.name_for(key))
            .unwrap_or_else(|| self.tier.fallback_label())
    }

    /// Looks up a locale-specific name property (e.g. `"name_fr"`).
    #[must_use]
    pub fn name_for(&self, key: &str) -> Option<&str> {
        self.names
            .get(key)
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

/// Every boundary file the demo consumes, loaded once at mount.
#[derive(Debug, Clone, Default)]
pub struct BoundarySet {
    /// District tier regions, in file order.
    pub districts: Vec<Region>,
    /// Province tier regions, in file order.
    pub provinces: Vec<Region>,
    /// Postal-area tier regions, in file order.
    pub postal_areas: Vec<Region>,
    /// Country outline (outer ring of the main landmass).
    pub outline: Option<Polygon<f64>>,
    /// Full country fill, including exclaves.
    pub fill: Option<MultiPolygon<f64>>,
}

impl BoundarySet {
    /// Returns the regions of the given tier, in their original order.
    #[must_use]
    pub fn regions(&self, tier: Tier) -> &[Region] {
        match tier {
            Tier::District => &self.districts,
            Tier::Province => &self.provinces,
            Tier::PostalArea => &self.postal_areas,
        }
    }

    /// Bounding envelope of the country, taken from the fill when present
    /// and the outline otherwise.
    #[must_use]
    pub fn country_envelope(&self) -> Option<Rect<f64>> {
        use geo::BoundingRect;

        self.fill
            .as_ref()
            .and_then(|fill| fill.bounding_rect())
            .or_else(|| self.outline.as_ref().and_then(|outline| outline.bounding_rect()))
    }

    /// Whether no region of any tier was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Tier::ALL.iter().all(|tier| self.regions(*tier).is_empty())
    }
}

/// Where boundary files are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundarySource {
    /// Static files served over HTTP, resolved relative to `base_url`.
    Url {
        /// Base URL (e.g. `"https://example.com/"`).
        base_url: String,
    },
    /// Files on the local filesystem, resolved relative to `path`.
    Directory {
        /// Directory containing the boundary files.
        path: String,
    },
}

/// File names of the boundary set, relative to the [`BoundarySource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryFiles {
    /// District `FeatureCollection`.
    pub districts: String,
    /// Province `FeatureCollection`.
    pub provinces: String,
    /// Postal-area `FeatureCollection`.
    pub postal_areas: String,
    /// Country outline `Feature`. Derived at runtime when absent.
    pub outline: Option<String>,
    /// Country fill `Feature`. Derived at runtime when absent.
    pub fill: Option<String>,
}

impl BoundaryFiles {
    /// Returns the configured file name for a tier.
    #[must_use]
    pub fn for_tier(&self, tier: Tier) -> &str {
        match tier {
            Tier::District => &self.districts,
            Tier::Province => &self.provinces,
            Tier::PostalArea => &self.postal_areas,
        }
    }
}

/// Boundary loader configuration, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// Where to read files from.
    pub source: BoundarySource,
    /// Which files to read.
    pub files: BoundaryFiles,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use geo::polygon;

    use super::*;

    fn region_with(names: &[(&str, &str)]) -> Region {
        Region {
            id: "r1".to_string(),
            tier: Tier::District,
            names: names
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            geometry: MultiPolygon(vec![polygon![
                (x: 4.0, y: 50.0),
                (x: 5.0, y: 50.0),
                (x: 5.0, y: 51.0),
                (x: 4.0, y: 50.0),
            ]]),
        }
    }

    #[test]
    fn tier_round_trips_through_kebab_case() {
        assert_eq!(Tier::PostalArea.to_string(), "postal-area");
        assert_eq!(Tier::from_str("province").unwrap(), Tier::Province);
        assert!(Tier::from_str("municipality").is_err());
    }

    #[test]
    fn display_name_follows_alias_priority() {
        let region = region_with(&[("name", "Generic"), ("name_fr", "Bruxelles")]);
        assert_eq!(region.display_name(), "Bruxelles");

        let region = region_with(&[("name_nl", "Brussel"), ("name_fr", "Bruxelles")]);
        assert_eq!(region.display_name(), "Brussel");
    }

    #[test]
    fn display_name_skips_blank_values_and_falls_back_to_tier_label() {
        let region = region_with(&[("name_nl", "  ")]);
        assert_eq!(region.display_name(), "Arrondissement");
    }

    #[test]
    fn country_envelope_prefers_fill() {
        let outline = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ];
        let fill = MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 0.0),
        ]]);
        let set = BoundarySet {
            outline: Some(outline),
            fill: Some(fill),
            ..BoundarySet::default()
        };
        let env = set.country_envelope().unwrap();
        assert!((env.max().x - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_set_has_no_regions() {
        assert!(BoundarySet::default().is_empty());
    }
}

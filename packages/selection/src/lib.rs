#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View-mode and radius controller for the geographic selection demo.
//!
//! The demo is a small state machine: `no-selection` until the map is
//! clicked, then `has-selection(point, radius, tier)`. Every event is
//! handled by the pure [`reduce`] function, which recomputes the whole
//! [`Selection`] synchronously whenever the point, radius or tier
//! changes, so a displayed selection always matches exactly one
//! `(point, radius, tier)` triple.

pub mod context;
pub mod controller;
pub mod palette;

use selectie_density::Jitter;
use selectie_geography_models::{LatLng, Tier};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use context::SelectionContext;
pub use controller::Controller;

/// Point the demo pre-selects once boundaries are loaded (Brussels).
pub const DEMO_POINT: LatLng = LatLng::new(50.85, 4.35);

/// Errors reading controller settings.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// Config TOML could not be parsed.
    #[error("Radius config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Bounds are not finite, positive and ordered `min <= default <= max`.
    #[error("Invalid radius bounds: min {min_km}, default {default_km}, max {max_km}")]
    InvalidBounds {
        /// Configured minimum.
        min_km: f64,
        /// Configured default.
        default_km: f64,
        /// Configured maximum.
        max_km: f64,
    },
}

/// Allowed range and initial value of the search radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusBounds {
    /// Smallest radius in km.
    pub min_km: f64,
    /// Largest radius in km.
    pub max_km: f64,
    /// Radius before the user touches the slider.
    pub default_km: f64,
}

impl Default for RadiusBounds {
    fn default() -> Self {
        Self {
            min_km: 5.0,
            max_km: 100.0,
            default_km: 25.0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RadiusFile {
    #[serde(default)]
    radius: Option<RadiusBounds>,
}

impl RadiusBounds {
    /// Checks that the bounds are usable.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::InvalidBounds`] unless all values are
    /// finite and `0 < min <= default <= max`.
    pub fn validate(self) -> Result<Self, SelectionError> {
        let finite = [self.min_km, self.default_km, self.max_km]
            .iter()
            .all(|v| v.is_finite());
        if finite && self.min_km > 0.0 && self.min_km <= self.default_km && self.default_km <= self.max_km {
            Ok(self)
        } else {
            Err(SelectionError::InvalidBounds {
                min_km: self.min_km,
                default_km: self.default_km,
                max_km: self.max_km,
            })
        }
    }

    /// Reads the optional `[radius]` table of a demo config file, falling
    /// back to the defaults when it is absent. Other tables are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] if the TOML is malformed or the bounds
    /// are invalid.
    pub fn from_config_toml(toml_str: &str) -> Result<Self, SelectionError> {
        let file: RadiusFile = toml::de::from_str(toml_str)?;
        file.radius.unwrap_or_default().validate()
    }

    /// Clamps a requested radius into range. Returns `None` for NaN or
    /// infinite input.
    #[must_use]
    pub fn clamp(&self, radius_km: f64) -> Option<f64> {
        radius_km
            .is_finite()
            .then(|| radius_km.clamp(self.min_km, self.max_km))
    }
}

/// One region of a selection, as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedRegion {
    /// Position of the region in its tier's list.
    pub index: usize,
    /// Region id.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Fill color, assigned by position within the selection.
    pub color: &'static str,
}

/// The regions of one tier intersecting one search circle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    /// Clicked point.
    pub point: LatLng,
    /// Radius in effect when this selection was computed.
    pub radius_km: f64,
    /// Tier the regions were taken from.
    pub tier: Tier,
    /// Matched regions, in tier order.
    pub regions: Vec<SelectedRegion>,
    /// Synthetic company count, `None` when no region matched.
    pub company_count: Option<u64>,
}

impl Selection {
    /// Whether this selection was computed for exactly this triple.
    #[must_use]
    pub fn matches(&self, point: LatLng, radius_km: f64, tier: Tier) -> bool {
        self.point == point && (self.radius_km - radius_km).abs() < f64::EPSILON && self.tier == tier
    }
}

/// Controller state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerState {
    /// Active tier (view mode).
    pub tier: Tier,
    /// Active radius in km.
    pub radius_km: f64,
    /// Radius limits.
    pub bounds: RadiusBounds,
    /// Current selection; `None` is the `no-selection` state.
    pub selection: Option<Selection>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new(Tier::District, RadiusBounds::default())
    }
}

impl ControllerState {
    /// Initial `no-selection` state.
    #[must_use]
    pub const fn new(tier: Tier, bounds: RadiusBounds) -> Self {
        Self {
            tier,
            radius_km: bounds.default_km,
            bounds,
            selection: None,
        }
    }

    /// Whether the map has been clicked.
    #[must_use]
    pub const fn has_selection(&self) -> bool {
        self.selection.is_some()
    }
}

/// User (or demo) input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Map clicked at a point.
    Click(LatLng),
    /// Radius slider moved.
    SetRadius(f64),
    /// View mode switched.
    SetTier(Tier),
    /// Pre-select [`DEMO_POINT`] if nothing is selected yet.
    AutoDemo,
    /// Drop the selection.
    Reset,
}

/// Applies one event, returning the next state.
///
/// Recomputes the selection against `ctx` whenever the point, radius or
/// tier changes while a selection exists.
#[must_use]
pub fn reduce<J: Jitter>(
    state: &ControllerState,
    event: Event,
    ctx: &SelectionContext<'_, J>,
) -> ControllerState {
    let mut next = state.clone();

    match event {
        Event::Click(point) => {
            next.selection = Some(ctx.compute(point, next.radius_km, next.tier));
        }
        Event::SetRadius(radius_km) => {
            let Some(radius_km) = state.bounds.clamp(radius_km) else {
                log::debug!("Ignoring non-finite radius {radius_km}");
                return next;
            };
            next.radius_km = radius_km;
            next.selection = state
                .selection
                .as_ref()
                .map(|s| ctx.compute(s.point, radius_km, next.tier));
        }
        Event::SetTier(tier) => {
            next.tier = tier;
            next.selection = state
                .selection
                .as_ref()
                .map(|s| ctx.compute(s.point, next.radius_km, tier));
        }
        Event::AutoDemo => {
            if state.selection.is_none() {
                next.selection = Some(ctx.compute(DEMO_POINT, next.radius_km, next.tier));
            }
        }
        Event::Reset => {
            next.selection = None;
        }
    }

    next
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeMap;

    use geo::{MultiPolygon, polygon};
    use selectie_geography_models::{BoundarySet, Region, Tier};

    /// Builds a grid of `n x n` square regions of `size` degrees starting
    /// at (4.0 E, 50.0 N).
    pub fn grid(tier: Tier, n: u32, size: f64) -> Vec<Region> {
        let mut regions = Vec::new();
        for row in 0..n {
            for col in 0..n {
                let x0 = 4.0 + f64::from(col) * size;
                let y0 = 50.0 + f64::from(row) * size;
                regions.push(Region {
                    id: format!("{tier}-{row}-{col}"),
                    tier,
                    names: BTreeMap::from([(
                        "name_nl".to_string(),
                        format!("{tier} {row}/{col}"),
                    )]),
                    geometry: MultiPolygon(vec![polygon![
                        (x: x0, y: y0),
                        (x: x0 + size, y: y0),
                        (x: x0 + size, y: y0 + size),
                        (x: x0, y: y0 + size),
                        (x: x0, y: y0),
                    ]]),
                });
            }
        }
        regions
    }

    /// Three tiers over the same 1x1 degree area at different granularity.
    pub fn boundaries() -> BoundarySet {
        BoundarySet {
            districts: grid(Tier::District, 4, 0.25),
            provinces: grid(Tier::Province, 2, 0.5),
            postal_areas: grid(Tier::PostalArea, 10, 0.1),
            outline: None,
            fill: None,
        }
    }
}

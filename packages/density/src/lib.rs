#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Synthetic company-count estimates for a region selection.
//!
//! For every selected region the estimate adds
//! `floor(area_km2 * density(centroid))`, where the density comes from the
//! first matching band in a [`BandTable`] plus a per-region jitter. The
//! figure is a demo statistic, not real data.

pub mod bands;
pub mod jitter;

use selectie_geography_models::Region;
use selectie_spatial::measure;
use thiserror::Error;

pub use bands::{BandTable, DensityBand};
pub use jitter::{FixedJitter, HashJitter, Jitter};

/// Errors building a density model.
#[derive(Debug, Error)]
pub enum DensityError {
    /// Band TOML could not be parsed.
    #[error("Band table parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The last band is bounded, so some points would have no density.
    #[error("Band table must end with an unbounded catch-all band")]
    NoCatchAll,

    /// A band's `min + spread` does not fit in a `u32` density.
    #[error("Band {band} overflows: min + spread exceeds u32::MAX")]
    BandOverflow { band: String },
}

/// Band table plus jitter source.
#[derive(Debug, Clone)]
pub struct DensityModel<J = HashJitter> {
    table: BandTable,
    jitter: J,
}

impl Default for DensityModel<HashJitter> {
    fn default() -> Self {
        Self::new(BandTable::default(), HashJitter::default())
    }
}

impl<J: Jitter> DensityModel<J> {
    /// Creates a model from a band table and jitter source.
    #[must_use]
    pub const fn new(table: BandTable, jitter: J) -> Self {
        Self { table, jitter }
    }

    /// Density in companies per km² at a point, for the region `key`.
    #[must_use]
    pub fn density_per_km2(&self, lat: f64, lng: f64, key: &str) -> u32 {
        let band = self.table.band_for(lat, lng);
        band.min + self.jitter.offset(key, band.spread)
    }

    /// Estimated company count for a single region.
    ///
    /// A region without a centroid (empty geometry) contributes zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn region_count(&self, region: &Region) -> u64 {
        let centroid = match measure::centroid(region) {
            Ok(c) => c,
            Err(e) => {
                log::debug!("No density for region: {e}");
                return 0;
            }
        };

        let area = measure::area_km2(region);
        let density = self.density_per_km2(centroid.lat, centroid.lng, &region.id);
        let estimate = (area * f64::from(density)).floor();

        if estimate.is_finite() && estimate > 0.0 {
            estimate as u64
        } else {
            0
        }
    }

    /// Estimated company count for a selection: the sum of each region's
    /// floored estimate. An empty selection yields 0.
    #[must_use]
    pub fn estimate_count<'a>(&self, regions: impl IntoIterator<Item = &'a Region>) -> u64 {
        regions
            .into_iter()
            .map(|region| self.region_count(region))
            .sum()
    }

    /// The band table in use.
    #[must_use]
    pub const fn table(&self) -> &BandTable {
        &self.table
    }
}

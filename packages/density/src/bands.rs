//! Ordered table of geographic density bands.
//!
//! The table is an embedded TOML asset. Bands are evaluated in file order
//! and the first band whose (exclusive) bounds contain the point wins, so
//! narrow city bands must precede the broad regional ones.

use serde::{Deserialize, Serialize};

use crate::DensityError;

const BANDS_TOML: &str = include_str!("../bands.toml");

/// One density band. Missing bounds are unbounded on that side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityBand {
    /// Band identifier, used in logs.
    pub name: String,
    /// Exclusive lower latitude bound.
    pub min_lat: Option<f64>,
    /// Exclusive upper latitude bound.
    pub max_lat: Option<f64>,
    /// Exclusive lower longitude bound.
    pub min_lng: Option<f64>,
    /// Exclusive upper longitude bound.
    pub max_lng: Option<f64>,
    /// Lowest density (companies per km²) within the band.
    pub min: u32,
    /// Width of the jitter range above `min`.
    pub spread: u32,
}

impl DensityBand {
    /// Whether `(lat, lng)` lies strictly inside this band's bounds.
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        self.min_lat.is_none_or(|b| lat > b)
            && self.max_lat.is_none_or(|b| lat < b)
            && self.min_lng.is_none_or(|b| lng > b)
            && self.max_lng.is_none_or(|b| lng < b)
    }
}

#[derive(Debug, Deserialize)]
struct BandFile {
    bands: Vec<DensityBand>,
}

/// An ordered list of density bands; first match wins.
#[derive(Debug, Clone, PartialEq)]
pub struct BandTable {
    bands: Vec<DensityBand>,
}

impl BandTable {
    /// Builds a table from bands in evaluation order.
    ///
    /// # Errors
    ///
    /// Returns [`DensityError::NoCatchAll`] if the last band has bounds,
    /// which would leave some points without a density, or
    /// [`DensityError::BandOverflow`] if a band's range does not fit in a
    /// `u32`.
    pub fn new(bands: Vec<DensityBand>) -> Result<Self, DensityError> {
        if let Some(band) = bands.iter().find(|b| b.min.checked_add(b.spread).is_none()) {
            return Err(DensityError::BandOverflow {
                band: band.name.clone(),
            });
        }

        match bands.last() {
            Some(last)
                if last.min_lat.is_none()
                    && last.max_lat.is_none()
                    && last.min_lng.is_none()
                    && last.max_lng.is_none() =>
            {
                Ok(Self { bands })
            }
            _ => Err(DensityError::NoCatchAll),
        }
    }

    /// Parses a band table from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`DensityError`] if the TOML is malformed, the table has
    /// no catch-all band, or a band overflows.
    pub fn from_toml(toml_str: &str) -> Result<Self, DensityError> {
        let file: BandFile = toml::de::from_str(toml_str)?;
        Self::new(file.bands)
    }

    /// Returns the first band containing the point.
    #[must_use]
    pub fn band_for(&self, lat: f64, lng: f64) -> &DensityBand {
        self.bands
            .iter()
            .find(|band| band.contains(lat, lng))
            .unwrap_or_else(|| &self.bands[self.bands.len() - 1])
    }

    /// Bands in evaluation order.
    #[must_use]
    pub fn bands(&self) -> &[DensityBand] {
        &self.bands
    }
}

impl Default for BandTable {
    /// The embedded Belgian band table.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. Since it is a
    /// compile-time constant, a failure is a development error caught by
    /// tests.
    fn default() -> Self {
        Self::from_toml(BANDS_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded density bands: {e}"))
    }
}

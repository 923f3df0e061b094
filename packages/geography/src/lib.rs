#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary data loading for the geographic selection demo.
//!
//! Fetches the district, province and postal-area `FeatureCollection`s
//! plus the country outline and fill in parallel, normalizes every
//! feature into a [`selectie_geography_models::Region`], and derives the
//! outline and fill from the district tier when those files are missing.

pub mod config;
pub mod fetch;
pub mod loader;
pub mod normalize;
pub mod outline;

use thiserror::Error;

/// Errors that can occur while loading boundaries.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading a local boundary file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `GeoJSON` structure or geometry conversion failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Data conversion or normalization error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

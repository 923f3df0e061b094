//! Boundary loader configuration.
//!
//! The default configuration is embedded at compile time; callers can
//! override it with their own TOML file.

use std::path::Path;

use selectie_geography_models::BoundaryConfig;

use crate::GeographyError;

/// Embedded default configuration.
const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Returns the embedded default boundary configuration.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. Since it is a compile-time
/// constant, a parse failure is a development error caught by tests.
#[must_use]
pub fn default_config() -> BoundaryConfig {
    parse_config(DEFAULT_CONFIG_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded boundary config: {e}"))
}

/// Parses a boundary configuration from a TOML string.
///
/// # Errors
///
/// Returns [`GeographyError::Config`] if the TOML is malformed or does not
/// match the [`BoundaryConfig`] schema.
pub fn parse_config(toml_str: &str) -> Result<BoundaryConfig, GeographyError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Reads a boundary configuration from a TOML file.
///
/// # Errors
///
/// Returns [`GeographyError`] if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<BoundaryConfig, GeographyError> {
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

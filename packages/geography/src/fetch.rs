//! Raw boundary file retrieval.
//!
//! Reads a single file's contents from either an HTTP base URL or a local
//! directory, depending on the configured [`BoundarySource`].

use std::path::Path;

use selectie_geography_models::BoundarySource;

use crate::GeographyError;

/// Resolves `file` against an HTTP base URL.
#[must_use]
pub fn resolve_url(base_url: &str, file: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        file.trim_start_matches('/')
    )
}

/// Fetches the raw text of one boundary file.
///
/// # Errors
///
/// Returns [`GeographyError`] if the request fails, returns a non-success
/// status, or the local file cannot be read.
pub async fn fetch_text(
    client: &reqwest::Client,
    source: &BoundarySource,
    file: &str,
) -> Result<String, GeographyError> {
    match source {
        BoundarySource::Url { base_url } => {
            let url = resolve_url(base_url, file);
            log::debug!("Fetching boundary file {url}");

            let resp = client.get(&url).send().await?;
            if !resp.status().is_success() {
                return Err(GeographyError::Conversion {
                    message: format!("Request for {url} failed with status {}", resp.status()),
                });
            }
            Ok(resp.text().await?)
        }
        BoundarySource::Directory { path } => {
            let full = Path::new(path).join(file);
            log::debug!("Reading boundary file {}", full.display());
            Ok(tokio::fs::read_to_string(&full).await?)
        }
    }
}

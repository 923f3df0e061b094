//! Parallel, cancellable loading of the full boundary set.
//!
//! All five files are requested concurrently once per mount. The pending
//! load can be aborted (e.g. when the demo view is torn down); a response
//! that arrives after the abort is discarded and never applied.

use std::sync::Arc;

use futures::future::{AbortHandle, Abortable, BoxFuture};
use futures::FutureExt as _;
use selectie_geography_models::{BoundaryConfig, BoundarySet, BoundarySource, Tier};

use crate::fetch::fetch_text;
use crate::normalize::{parse_area, parse_regions};
use crate::outline::{derive_outline_and_fill, largest_exterior, union_regions};
use crate::GeographyError;

/// Observable state of the boundary load.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Requests are in flight.
    Loading,
    /// Every tier was loaded.
    Loaded(Arc<BoundarySet>),
    /// A required file failed; the demo renders its empty state.
    Failed(String),
    /// The load was aborted before it completed.
    Cancelled,
}

impl LoadState {
    /// Returns the loaded boundaries, if any.
    #[must_use]
    pub fn boundaries(&self) -> Option<&Arc<BoundarySet>> {
        match self {
            Self::Loaded(set) => Some(set),
            _ => None,
        }
    }

    /// Whether requests are still in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Cancels a pending load.
#[derive(Debug, Clone)]
pub struct LoadHandle {
    abort: AbortHandle,
}

impl LoadHandle {
    /// Aborts the pending load. Idempotent.
    pub fn abort(&self) {
        self.abort.abort();
    }

    /// Whether [`Self::abort`] has been called.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.abort.is_aborted()
    }
}

/// A boundary load that has been started but not yet awaited.
pub struct PendingLoad {
    handle: LoadHandle,
    future: Abortable<BoxFuture<'static, Result<BoundarySet, GeographyError>>>,
}

impl std::fmt::Debug for PendingLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingLoad")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl PendingLoad {
    /// Returns a handle that can cancel this load from elsewhere.
    #[must_use]
    pub fn handle(&self) -> LoadHandle {
        self.handle.clone()
    }

    /// Drives the load to completion.
    ///
    /// Fetch failures are logged and reported as [`LoadState::Failed`]
    /// rather than returned as errors. A result that completes after
    /// the handle was aborted is dropped and reported as
    /// [`LoadState::Cancelled`].
    pub async fn finish(self) -> LoadState {
        let outcome = self.future.await;

        if self.handle.is_aborted() {
            log::debug!("Discarding boundary load result after abort");
            return LoadState::Cancelled;
        }

        match outcome {
            Ok(Ok(set)) => {
                log::info!(
                    "Loaded boundaries: {} districts, {} provinces, {} postal areas",
                    set.districts.len(),
                    set.provinces.len(),
                    set.postal_areas.len()
                );
                LoadState::Loaded(Arc::new(set))
            }
            Ok(Err(e)) => {
                log::error!("Failed to load boundaries: {e}");
                LoadState::Failed(e.to_string())
            }
            Err(_aborted) => LoadState::Cancelled,
        }
    }
}

/// Starts loading every boundary file described by `config`.
///
/// Nothing is requested until the returned [`PendingLoad`] is polled.
#[must_use]
pub fn start(client: reqwest::Client, config: BoundaryConfig) -> PendingLoad {
    let (abort, registration) = AbortHandle::new_pair();
    let future = async move { load_boundaries(&client, &config).await }.boxed();

    PendingLoad {
        handle: LoadHandle { abort },
        future: Abortable::new(future, registration),
    }
}

/// Loads every boundary file concurrently.
///
/// The three tier collections are required. Outline and fill are
/// optional: a missing fill is the union of the district tier, and a
/// missing outline is taken from the fill. Whichever file did load is
/// kept.
///
/// # Errors
///
/// Returns [`GeographyError`] if any tier collection cannot be fetched or
/// parsed.
pub async fn load_boundaries(
    client: &reqwest::Client,
    config: &BoundaryConfig,
) -> Result<BoundarySet, GeographyError> {
    let source = &config.source;
    let files = &config.files;

    let (districts, provinces, postal_areas, outline, fill) = futures::join!(
        fetch_tier(client, source, files.for_tier(Tier::District), Tier::District),
        fetch_tier(client, source, files.for_tier(Tier::Province), Tier::Province),
        fetch_tier(client, source, files.for_tier(Tier::PostalArea), Tier::PostalArea),
        fetch_optional_area(client, source, files.outline.as_deref()),
        fetch_optional_area(client, source, files.fill.as_deref()),
    );

    let districts = districts?;
    let provinces = provinces?;
    let postal_areas = postal_areas?;

    let (outline, fill) = match (outline, fill) {
        (Some(outline), Some(fill)) => (largest_exterior(&outline), Some(fill)),
        (Some(outline), None) => {
            log::info!("Deriving country fill from {} districts", districts.len());
            (largest_exterior(&outline), union_regions(&districts))
        }
        (None, Some(fill)) => (largest_exterior(&fill), Some(fill)),
        (None, None) => {
            log::info!("Deriving country outline from {} districts", districts.len());
            derive_outline_and_fill(&districts)
        }
    };

    Ok(BoundarySet {
        districts,
        provinces,
        postal_areas,
        outline,
        fill,
    })
}

async fn fetch_tier(
    client: &reqwest::Client,
    source: &BoundarySource,
    file: &str,
    tier: Tier,
) -> Result<Vec<selectie_geography_models::Region>, GeographyError> {
    let text = fetch_text(client, source, file).await?;
    parse_regions(&text, tier)
}

async fn fetch_optional_area(
    client: &reqwest::Client,
    source: &BoundarySource,
    file: Option<&str>,
) -> Option<geo::MultiPolygon<f64>> {
    let file = file?;
    let result = match fetch_text(client, source, file).await {
        Ok(text) => parse_area(&text),
        Err(e) => Err(e),
    };

    result
        .map_err(|e| log::warn!("Ignoring country area file {file}: {e}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use selectie_geography_models::BoundaryFiles;

    use super::*;

    const SQUARE_COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name_nl": "West" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[4.0, 50.0], [4.5, 50.0], [4.5, 50.5], [4.0, 50.5], [4.0, 50.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "name_nl": "Oost" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[4.5, 50.0], [5.0, 50.0], [5.0, 50.5], [4.5, 50.5], [4.5, 50.0]]]
                }
            }
        ]
    }"#;

    fn fixture_dir(name: &str, with_districts: bool) -> std::path::PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();
        if with_districts {
            std::fs::write(tmp.join("districts.geojson"), SQUARE_COLLECTION).unwrap();
        }
        std::fs::write(tmp.join("provinces.geojson"), SQUARE_COLLECTION).unwrap();
        std::fs::write(tmp.join("postcodes.geojson"), SQUARE_COLLECTION).unwrap();
        tmp
    }

    fn config_for(dir: &std::path::Path) -> BoundaryConfig {
        BoundaryConfig {
            source: BoundarySource::Directory {
                path: dir.to_string_lossy().to_string(),
            },
            files: BoundaryFiles {
                districts: "districts.geojson".to_string(),
                provinces: "provinces.geojson".to_string(),
                postal_areas: "postcodes.geojson".to_string(),
                outline: Some("missing-outline.geojson".to_string()),
                fill: None,
            },
        }
    }

    #[tokio::test]
    async fn loads_all_tiers_and_derives_outline() {
        let dir = fixture_dir("selectie_loader_test_ok", true);
        let state = start(reqwest::Client::new(), config_for(&dir)).finish().await;

        let set = state.boundaries().expect("boundaries should load");
        assert_eq!(set.districts.len(), 2);
        assert_eq!(set.provinces.len(), 2);
        assert_eq!(set.postal_areas.len(), 2);
        assert_eq!(set.districts[0].display_name(), "West");
        assert!(set.outline.is_some());
        assert_eq!(set.fill.as_ref().unwrap().0.len(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn missing_tier_file_reports_failure() {
        let dir = fixture_dir("selectie_loader_test_missing", false);
        let state = start(reqwest::Client::new(), config_for(&dir)).finish().await;

        assert!(matches!(state, LoadState::Failed(_)));
        assert!(!state.is_loading());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn aborted_load_is_discarded() {
        let dir = fixture_dir("selectie_loader_test_abort", true);
        let pending = start(reqwest::Client::new(), config_for(&dir));
        let handle = pending.handle();

        handle.abort();
        assert!(handle.is_aborted());
        assert!(matches!(pending.finish().await, LoadState::Cancelled));

        let _ = std::fs::remove_dir_all(&dir);
    }

    const OUTLINE_FEATURE: &str = r#"{
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[3.0, 49.0], [6.0, 49.0], [6.0, 52.0], [3.0, 52.0], [3.0, 49.0]]]
        }
    }"#;

    fn exterior_x_range(polygon: &geo::Polygon<f64>) -> (f64, f64) {
        polygon
            .exterior()
            .coords()
            .fold((f64::MAX, f64::MIN), |(lo, hi), c| (lo.min(c.x), hi.max(c.x)))
    }

    #[tokio::test]
    async fn loaded_outline_is_kept_when_fill_is_derived() {
        let dir = fixture_dir("selectie_loader_test_outline_only", true);
        std::fs::write(dir.join("outline.geojson"), OUTLINE_FEATURE).unwrap();
        let mut config = config_for(&dir);
        config.files.outline = Some("outline.geojson".to_string());

        let state = start(reqwest::Client::new(), config).finish().await;
        let set = state.boundaries().expect("boundaries should load");

        let (lo, hi) = exterior_x_range(set.outline.as_ref().unwrap());
        assert!((lo - 3.0).abs() < 1e-9 && (hi - 6.0).abs() < 1e-9);

        let fill = set.fill.as_ref().unwrap();
        assert_eq!(fill.0.len(), 1);
        let (lo, hi) = exterior_x_range(&fill.0[0]);
        assert!((lo - 4.0).abs() < 1e-9 && (hi - 5.0).abs() < 1e-9);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn loaded_fill_supplies_outline() {
        let dir = fixture_dir("selectie_loader_test_fill_only", true);
        std::fs::write(dir.join("fill.geojson"), OUTLINE_FEATURE).unwrap();
        let mut config = config_for(&dir);
        config.files.outline = None;
        config.files.fill = Some("fill.geojson".to_string());

        let state = start(reqwest::Client::new(), config).finish().await;
        let set = state.boundaries().expect("boundaries should load");

        let (lo, hi) = exterior_x_range(set.outline.as_ref().unwrap());
        assert!((lo - 3.0).abs() < 1e-9 && (hi - 6.0).abs() < 1e-9);
        let (lo, hi) = exterior_x_range(&set.fill.as_ref().unwrap().0[0]);
        assert!((lo - 3.0).abs() < 1e-9 && (hi - 6.0).abs() < 1e-9);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn abort_while_requests_in_flight_is_cancelled() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = BoundaryConfig {
            source: BoundarySource::Url {
                base_url: format!("http://{addr}"),
            },
            files: BoundaryFiles {
                districts: "districts.geojson".to_string(),
                provinces: "provinces.geojson".to_string(),
                postal_areas: "postcodes.geojson".to_string(),
                outline: None,
                fill: None,
            },
        };

        let pending = start(reqwest::Client::new(), config);
        let handle = pending.handle();
        let task = tokio::spawn(pending.finish());

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert!(!task.is_finished());
        handle.abort();

        let state = tokio::time::timeout(std::time::Duration::from_secs(5), task)
            .await
            .expect("aborted load should resolve")
            .unwrap();
        assert!(matches!(state, LoadState::Cancelled));
    }
}

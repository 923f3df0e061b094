//! Boundary load plus one radius selection.

use std::path::PathBuf;

use selectie_density::{BandTable, DensityModel, HashJitter};
use selectie_geography::config::{default_config, parse_config};
use selectie_geography::loader::{self, LoadState};
use selectie_geography_models::{LatLng, Tier};
use selectie_selection::{Controller, ControllerState, Event, RadiusBounds, SelectionContext};

pub struct SelectArgs {
    pub tier: Tier,
    pub lat: f64,
    pub lng: f64,
    pub radius: Option<f64>,
    pub config: Option<PathBuf>,
    pub seed: u64,
    pub json: bool,
}

pub async fn run(args: SelectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (config, bounds) = match &args.config {
        Some(path) => {
            let text = tokio::fs::read_to_string(path).await?;
            (parse_config(&text)?, RadiusBounds::from_config_toml(&text)?)
        }
        None => (default_config(), RadiusBounds::default()),
    };

    let pending = loader::start(reqwest::Client::new(), config);
    let handle = pending.handle();

    let state = tokio::select! {
        state = pending.finish() => state,
        _ = tokio::signal::ctrl_c() => {
            handle.abort();
            LoadState::Cancelled
        }
    };

    let boundaries = match state {
        LoadState::Loaded(set) => set,
        LoadState::Failed(message) => return Err(message.into()),
        LoadState::Cancelled | LoadState::Loading => {
            log::warn!("Boundary load did not complete");
            return Ok(());
        }
    };

    let density = DensityModel::new(BandTable::default(), HashJitter::new(args.seed));
    let ctx = SelectionContext::new(&boundaries, &density);
    let mut controller = Controller::new(ctx, ControllerState::new(args.tier, bounds))
        .on_selection_change(|has| log::debug!("has_selection = {has}"));

    if let Some(radius) = args.radius {
        controller.dispatch(Event::SetRadius(radius));
    }
    let state = controller.dispatch(Event::Click(LatLng::new(args.lat, args.lng)));

    let Some(selection) = &state.selection else {
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(selection)?);
        return Ok(());
    }

    println!(
        "{} {} region(s) within {} km of ({}, {})",
        selection.regions.len(),
        selection.tier,
        selection.radius_km,
        selection.point.lat,
        selection.point.lng
    );
    for region in &selection.regions {
        println!("  {}  {:<10} {}", region.color, region.id, region.name);
    }
    match selection.company_count {
        Some(count) => println!("Estimated companies: {count}"),
        None => println!("No regions at this point"),
    }

    Ok(())
}

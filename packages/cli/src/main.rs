#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the demo widgets.
//!
//! `select` loads the boundary files and runs a radius selection with a
//! company estimate, `nace` prints the filtered classification tree for
//! a query and `marquee` runs the ticker simulation headless.

mod marquee;
mod nace;
mod select;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use selectie_geography_models::Tier;
use selectie_nace_models::Locale;

#[derive(Parser)]
#[command(name = "selectie", about = "Region selection and industry search demos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select the regions of one tier within a radius of a point
    Select {
        /// Region tier: district, province or postal-area
        #[arg(long, default_value = "district", value_parser = parse_tier)]
        tier: Tier,
        /// Latitude of the clicked point
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude of the clicked point
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Search radius in km, clamped to the configured bounds
        #[arg(long)]
        radius: Option<f64>,
        /// Boundary config TOML (defaults to the embedded config)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Seed for the density jitter
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Print the selection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Filter the industry classification tree
    Nace {
        /// Free-text query or colloquial industry term
        #[arg(default_value = "")]
        query: String,
        /// Label language: nl or en
        #[arg(long, default_value = "nl", value_parser = parse_locale)]
        locale: Locale,
        /// Codes to tick before printing
        #[arg(long = "select")]
        selected: Vec<String>,
        /// Expand every node instead of the default set
        #[arg(long)]
        expand_all: bool,
    },
    /// Run the tech-stack ticker for a number of frames
    Marquee {
        /// Frames to simulate
        #[arg(long, default_value_t = 120)]
        frames: usize,
        /// Pointer movement applied to the top row every frame, in pixels
        #[arg(long, allow_negative_numbers = true)]
        push: Option<f64>,
        /// Print offsets every N frames
        #[arg(long, default_value_t = 30)]
        every: usize,
    },
}

fn parse_tier(value: &str) -> Result<Tier, String> {
    value
        .parse()
        .map_err(|_| format!("unknown tier {value:?}, expected district, province or postal-area"))
}

fn parse_locale(value: &str) -> Result<Locale, String> {
    value
        .parse()
        .map_err(|_| format!("unknown locale {value:?}, expected nl or en"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Select {
            tier,
            lat,
            lng,
            radius,
            config,
            seed,
            json,
        } => {
            select::run(select::SelectArgs {
                tier,
                lat,
                lng,
                radius,
                config,
                seed,
                json,
            })
            .await?;
        }
        Commands::Nace {
            query,
            locale,
            selected,
            expand_all,
        } => nace::run(&query, locale, &selected, expand_all),
        Commands::Marquee {
            frames,
            push,
            every,
        } => marquee::run(frames, push, every),
    }

    Ok(())
}

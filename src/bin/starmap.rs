//! Host program: renders the sky over the configured site into `starmap.svg`.
//!
//! # Environment Variables
//!
//! - `STARMAP_CONFIG`: path of a JSON file with `observer_latitude`,
//!   `observer_longitude` and `instant` (all optional)
//! - `RUST_LOG`: log filter (default: info)
use std::{fs, process::ExitCode};

use hifitime::TimeScale;
use tracing::info;
use tracing_subscriber::EnvFilter;

use starmap::{
    config::StarMapConfig, env_state::StarMapEnv, starmap::StarMap, starmap_errors::StarMapError,
};

const OUTPUT_FILE: &str = "starmap.svg";
const OUTPUT_PIXELS: u32 = 1000;

fn run() -> Result<bool, StarMapError> {
    let config = StarMapConfig::from_env()?;
    let instant = config.instant()?;
    let observer = config.observer()?;

    println!(
        "Current time (UTC): {}",
        instant.to_time_scale(TimeScale::UTC)
    );
    println!(
        "Observer location: latitude {:.2}°, longitude {:.2}°",
        observer.latitude, observer.longitude
    );

    let starmap = StarMap::new(StarMapEnv::new()?)?;
    let outcome = starmap.plot_sky(&instant, &observer);

    match outcome.chart() {
        Some(chart) => {
            let svg = chart.to_svg(OUTPUT_PIXELS)?;
            fs::write(OUTPUT_FILE, svg).map_err(|e| {
                StarMapError::RenderError(format!("cannot write {OUTPUT_FILE}: {e}"))
            })?;
            info!(path = OUTPUT_FILE, stars = chart.markers.len(), "chart written");
            println!("{chart}");
            Ok(true)
        }
        None => {
            eprintln!("{}", outcome.message().unwrap_or("could not render sky chart"));
            Ok(false)
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

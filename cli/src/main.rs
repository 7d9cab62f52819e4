mod tui;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use snaphunt_core::{
    metadata, DeviceLocationFeed, GeoCoordinate, Hunt, HuntService, LocationResolver,
    SimulatedUploadTransport,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snaphunt")]
#[command(about = "A photo scavenger hunt for the terminal", long_about = None)]
struct Cli {
    /// Simulated device GPS fix as "LAT,LON", used for camera captures.
    /// Omit to model a device without permission or signal.
    #[arg(long, value_name = "LAT,LON")]
    fix: Option<String>,

    /// Simulated upload duration in milliseconds
    #[arg(long, default_value_t = 2000)]
    delay_ms: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the interactive hunt session (default)
    Tui,
    /// Print the location embedded in an image file's metadata
    Resolve {
        /// Path to a JPEG or TIFF image
        path: std::path::PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Some(Commands::Resolve { path, json }) => resolve(path, *json),
        Some(Commands::Tui) | None => run_tui(&cli),
    }
}

fn run_tui(cli: &Cli) -> Result<()> {
    let fix = cli.fix.as_deref().map(parse_fix).transpose()?;
    let feed = match fix {
        Some(coordinate) => DeviceLocationFeed::with_fix(coordinate),
        None => DeviceLocationFeed::new(),
    };
    let resolver = LocationResolver::new(feed.subscribe());
    let transport = SimulatedUploadTransport::with_delay(Duration::from_millis(cli.delay_ms));
    let service = Arc::new(HuntService::new(Hunt::sample(), transport));
    info!(?fix, delay_ms = cli.delay_ms, "starting hunt session");

    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    tui::run(runtime.handle().clone(), service, resolver)
}

fn resolve(path: &Path, json: bool) -> Result<()> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let location = metadata::photo_location(&data);

    if json {
        println!("{}", serde_json::to_string(&location)?);
        return Ok(());
    }
    match location {
        Some(coordinate) => {
            println!("{coordinate}");
            println!("{}", osm_url(coordinate));
        }
        None => println!("no location data in {}", path.display()),
    }
    Ok(())
}

fn parse_fix(raw: &str) -> Result<GeoCoordinate> {
    let (lat, lon) = raw
        .split_once(',')
        .with_context(|| format!("expected LAT,LON, got '{raw}'"))?;
    let latitude: f64 = lat.trim().parse().context("latitude is not a number")?;
    let longitude: f64 = lon.trim().parse().context("longitude is not a number")?;
    GeoCoordinate::checked(latitude, longitude)
        .with_context(|| format!("'{raw}' is outside the valid degree ranges"))
}

/// Web map link for a coordinate.
pub(crate) fn osm_url(coordinate: GeoCoordinate) -> String {
    format!(
        "https://www.openstreetmap.org/?mlat={:.5}&mlon={:.5}#map=14/{:.5}/{:.5}",
        coordinate.latitude, coordinate.longitude, coordinate.latitude, coordinate.longitude
    )
}

// geofilter - main.rs
//
// Binary entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Running the correlation pipeline
// 4. Emitting marker lines, the run summary, and optional exports

use clap::Parser;
use std::path::PathBuf;

use geofilter::app::pipeline::{self, RunOptions};
use geofilter::core::export;
use geofilter::core::model::{MarkerStyle, TransferMode};
use geofilter::platform;
use geofilter::platform::config::AppConfig;
use geofilter::util;
use geofilter::util::error::{ExportError, Result};

/// geofilter - geofence filter for aerial survey imagery.
///
/// Correlates a flight's captured images 1:1 with the positional camera
/// events in its log, classifies each image as inside or outside the
/// configured bounding box, prints a map marker per image and a
/// retained/filtered summary. Retained images can be copied or moved into
/// the flight's destination folder.
#[derive(Parser, Debug)]
#[command(name = "geofilter", version, about)]
struct Cli {
    /// Flight root directory (searched for geofilter.json).
    flight_path: PathBuf,

    /// Explicit flight config file (overrides the geofilter.json search).
    #[arg(short = 'f', long = "flight-config")]
    flight_config: Option<PathBuf>,

    /// Write the marker CSV to this file.
    #[arg(short = 'm', long = "markers")]
    markers: Option<PathBuf>,

    /// Write the JSON run report to this file.
    #[arg(short = 'r', long = "report")]
    report: Option<PathBuf>,

    /// Override the flight's transfer mode: none, copy or move.
    #[arg(short = 't', long = "transfer")]
    transfer: Option<TransferMode>,

    /// Suppress per-image marker lines on stdout.
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // config.toml is loaded before logging init so its [logging] level can
    // take part in the filter priority chain.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (app_config, config_warnings) = platform::config::load_config(&platform_paths.config_dir);

    util::logging::init(cli.debug, cli.quiet, app_config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        flight = %cli.flight_path.display(),
        "geofilter starting"
    );

    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    if let Err(e) = execute(&cli, &app_config) {
        tracing::error!(error = %e, "Run failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Run the pipeline and emit all requested output.
fn execute(cli: &Cli, app_config: &AppConfig) -> Result<()> {
    let options = RunOptions {
        flight_root: cli.flight_path.clone(),
        flight_config_path: cli.flight_config.clone(),
        transfer_override: cli.transfer,
    };

    let outcome = pipeline::run(&options, app_config)?;

    for warning in &outcome.warnings {
        tracing::warn!(warning = %warning, "Discovery warning");
    }

    let style = MarkerStyle {
        label: app_config.marker_label.clone(),
        colour: app_config.marker_colour.clone(),
    };

    // One marker line per pair, retained or not; the summary is always
    // printed.
    if !cli.quiet {
        for classification in &outcome.report.classifications {
            println!("{}", export::marker_line(classification, &style));
        }
        println!();
    }
    println!("Images retained: {}", outcome.report.summary.retained);
    println!("Images filtered: {}", outcome.report.summary.filtered);

    if let Some(path) = &cli.markers {
        let file = std::fs::File::create(path).map_err(|e| ExportError::Io {
            path: path.clone(),
            source: e,
        })?;
        let count = export::export_markers_csv(
            &outcome.report.classifications,
            file,
            path,
            &style,
        )?;
        tracing::info!(count, path = %path.display(), "Marker CSV written");
    }

    if let Some(path) = &cli.report {
        let file = std::fs::File::create(path).map_err(|e| ExportError::Io {
            path: path.clone(),
            source: e,
        })?;
        export::export_report_json(&outcome.report, file, path)?;
        tracing::info!(path = %path.display(), "Run report written");
    }

    if outcome.transferred > 0 {
        tracing::info!(
            transferred = outcome.transferred,
            mode = %outcome.flight.transfer,
            destination = %outcome.flight.image_filter_folder.display(),
            "Retained images transferred"
        );
    }

    Ok(())
}

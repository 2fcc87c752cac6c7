// geofilter - app/pipeline.rs
//
// End-to-end correlation run, fully sequential:
// flight config -> bounding box -> image discovery -> log scan ->
// count check -> record parsing -> classification -> transfer.
//
// The image/record count check runs BEFORE parsing. A mismatched flight
// fails on the cheap comparison without surfacing parse errors from
// records that would never be paired; `correlate` re-validates the same
// precondition so the classifier stays safe when called directly.

use crate::app::flight::{self, FlightConfig};
use crate::app::transfer;
use crate::core::discovery::{self, DiscoveryConfig};
use crate::core::model::{BoundingBox, ClassificationReport, RecordSchema, TransferMode};
use crate::core::{classify, filter, record};
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::{ConfigError, CorrelateError, Result};
use std::path::PathBuf;

/// Inputs for one correlation run, assembled from the CLI.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Flight root directory (the CLI's FLIGHT_PATH argument).
    pub flight_root: PathBuf,

    /// Explicit flight config path from --flight-config, when given.
    pub flight_config_path: Option<PathBuf>,

    /// Transfer mode override from --transfer, when given.
    pub transfer_override: Option<TransferMode>,
}

/// Everything a completed run produces.
#[derive(Debug)]
pub struct RunOutcome {
    /// The loaded flight config (after any CLI override).
    pub flight: FlightConfig,

    /// Per-pair decisions, bounds and totals.
    pub report: ClassificationReport,

    /// Number of images copied/moved to the destination folder.
    pub transferred: usize,

    /// Non-fatal warnings accumulated along the way.
    pub warnings: Vec<String>,
}

/// Execute a full correlation run.
///
/// All-or-nothing: the first fatal precondition aborts the run with a
/// typed error and no partial output.
pub fn run(options: &RunOptions, app_config: &AppConfig) -> Result<RunOutcome> {
    // --- Flight config ---
    let config_path = flight::find_flight_config(
        &options.flight_root,
        options.flight_config_path.as_deref(),
    )?;
    let mut flight = flight::load_flight_config(&config_path, &options.flight_root)?;
    if let Some(mode) = options.transfer_override {
        tracing::debug!(mode = %mode, "Transfer mode overridden from CLI");
        flight.transfer = mode;
    }

    // --- Bounding box ---
    let bounds = BoundingBox::from_corner_coords(&flight.coords)?;
    tracing::info!(
        lat_min = bounds.lat_min(),
        lat_max = bounds.lat_max(),
        lon_min = bounds.lon_min(),
        lon_max = bounds.lon_max(),
        "Bounding box built"
    );

    // --- Image discovery ---
    let discovery_config = DiscoveryConfig {
        max_depth: app_config.max_depth,
        max_images: app_config.max_images,
        extensions: flight.extensions.clone(),
    };
    let (images, warnings) = discovery::discover_images(&flight.image_folder, &discovery_config)?;
    tracing::info!(images = images.len(), "Images discovered");

    // --- Log scan ---
    let text = fs::read_log_text(&flight.log_file, constants::MAX_LOG_FILE_BYTES)?;
    let schemas = RecordSchema::builtins();
    let tags: Vec<&str> = schemas.iter().map(|s| s.tag).collect();
    let scan = filter::scan_log(&text, &tags);
    let tracked_lines = filter::lines_with_tag(&scan.lines, &flight.tracked_tag);
    tracing::info!(
        tracked = tracked_lines.len(),
        tag = %flight.tracked_tag,
        "Log scanned"
    );

    // --- Count check before parsing ---
    if images.len() != tracked_lines.len() {
        return Err(CorrelateError::CountMismatch {
            images: images.len(),
            records: tracked_lines.len(),
            tag: flight.tracked_tag.clone(),
        }
        .into());
    }

    // --- Record parsing ---
    let schema =
        RecordSchema::for_tag(&flight.tracked_tag).ok_or_else(|| ConfigError::InvalidValue {
            path: flight.source_path.clone(),
            field: "tracked-tag",
            value: flight.tracked_tag.clone(),
            expected: "a recognised record tag (CAM, GPS)",
        })?;
    let records = record::parse_records(&tracked_lines, &schema)?;

    // --- Classification ---
    let report = classify::correlate(
        &images,
        &records,
        bounds,
        &flight.tracked_tag,
        scan.tag_counts.clone(),
    )?;
    tracing::info!(
        retained = report.summary.retained,
        filtered = report.summary.filtered,
        "Flight classified"
    );

    // --- Transfer ---
    let transferred = transfer::transfer_retained(
        &report.classifications,
        &flight.image_filter_folder,
        flight.transfer,
    )?;

    Ok(RunOutcome {
        flight,
        report,
        transferred,
        warnings,
    })
}

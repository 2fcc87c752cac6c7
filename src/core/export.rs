// geofilter - core/export.rs
//
// Marker CSV and JSON report export of classification results.
// Core layer: writes to any Write trait object.

use crate::core::model::{Classification, ClassificationReport, MarkerStyle};
use crate::util::constants::MARKER_PRECISION;
use crate::util::error::ExportError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Formats one classification as a map-marker line:
/// `<lat>, <lon>, <label>, <colour>` with fixed 7-decimal coordinates.
///
/// This is the line printed to stdout for every pair; mapping tools ingest
/// it directly.
pub fn marker_line(classification: &Classification, style: &MarkerStyle) -> String {
    format!(
        "{:.prec$}, {:.prec$}, {}, {}",
        classification.lat,
        classification.lon,
        style.label,
        style.colour,
        prec = MARKER_PRECISION
    )
}

/// Export all classifications as marker rows to CSV.
///
/// Writes: latitude, longitude, name, colour. Every pair is exported
/// whether retained or filtered; the marker set shows the whole flight
/// track, not just the survey area.
pub fn export_markers_csv<W: Write>(
    classifications: &[Classification],
    writer: W,
    export_path: &Path,
    style: &MarkerStyle,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["latitude", "longitude", "name", "colour"])
        .map_err(|e| ExportError::Csv {
            path: export_path.to_path_buf(),
            source: e,
        })?;

    let mut count = 0;
    for classification in classifications {
        csv_writer
            .write_record([
                &format!("{:.prec$}", classification.lat, prec = MARKER_PRECISION),
                &format!("{:.prec$}", classification.lon, prec = MARKER_PRECISION),
                &style.label,
                &style.colour,
            ])
            .map_err(|e| ExportError::Csv {
                path: export_path.to_path_buf(),
                source: e,
            })?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Envelope written around the report so consumers can identify the run
/// that produced it.
#[derive(Serialize)]
struct ReportDocument<'a> {
    generated_at: DateTime<Utc>,
    generator: String,
    #[serde(flatten)]
    report: &'a ClassificationReport,
}

/// Export the full classification report (per-pair decisions, bounds and
/// totals) as pretty-printed JSON.
pub fn export_report_json<W: Write>(
    report: &ClassificationReport,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let document = ReportDocument {
        generated_at: Utc::now(),
        generator: format!(
            "{} {}",
            crate::util::constants::APP_NAME,
            crate::util::constants::APP_VERSION
        ),
        report,
    };
    serde_json::to_writer_pretty(writer, &document).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(report.classifications.len())
}

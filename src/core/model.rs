// geofilter - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

// =============================================================================
// Record Schema
// =============================================================================

/// Field layout for one tracked record type, mapping each named field to its
/// comma-separated position in the log line.
///
/// Schemas are order-preserving by construction: `field_names[i]` is the
/// field at index `i`. The tag itself is always field 0.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    /// Leading tag that identifies this record type (e.g. "CAM").
    pub tag: &'static str,

    /// Ordered field names, index-aligned with the split line.
    pub field_names: &'static [&'static str],

    /// Index of the latitude field (decimal degrees).
    pub lat_index: usize,

    /// Index of the longitude field (decimal degrees).
    pub lon_index: usize,

    /// Index of the GPS intra-week milliseconds field, when the record
    /// carries one. Used for best-effort capture-time derivation.
    pub time_ms_index: Option<usize>,

    /// Index of the GPS week-number field, when the record carries one.
    pub week_index: Option<usize>,
}

impl RecordSchema {
    /// Schema for ArduPilot CAM records (camera trigger events).
    ///
    /// Example line:
    /// `CAM, 216941495, 2167, 216941.0, 51.9239374, -2.5424495, 103.42, 52.18, -1.5, 2.2, 118.3, 216941`
    pub fn cam() -> Self {
        Self {
            tag: "CAM",
            field_names: &[
                "CAM", "GPSTime", "GPSWeek", "Unknown1", "Lat", "Lng", "Alt", "RelAlt", "Roll",
                "Pitch", "Yaw", "TimeMS",
            ],
            lat_index: 4,
            lon_index: 5,
            time_ms_index: Some(1),
            week_index: Some(2),
        }
    }

    /// Schema for ArduPilot GPS records (periodic position fixes).
    pub fn gps() -> Self {
        Self {
            tag: "GPS",
            field_names: &[
                "GPS", "Status", "TimeMS", "Week", "NSats", "HDop", "Lat", "Lng", "Alt", "Spd",
                "GCrs", "VZ", "T", "hAcc",
            ],
            lat_index: 6,
            lon_index: 7,
            time_ms_index: Some(2),
            week_index: Some(3),
        }
    }

    /// All built-in schemas. The recognised-tag set for log scanning is
    /// derived from this list.
    pub fn builtins() -> Vec<RecordSchema> {
        vec![Self::cam(), Self::gps()]
    }

    /// Finds the built-in schema for a tag, if one exists.
    pub fn for_tag(tag: &str) -> Option<RecordSchema> {
        Self::builtins().into_iter().find(|s| s.tag == tag)
    }

    /// Minimum field count a line must have for the coordinate positions
    /// to exist. Fields beyond this are optional extras.
    pub fn required_fields(&self) -> usize {
        self.lat_index.max(self.lon_index) + 1
    }
}

// =============================================================================
// Log Scan (output of line filtering)
// =============================================================================

/// One retained log line together with its extracted tag and its position
/// in the source file.
#[derive(Debug, Clone)]
pub struct TaggedLine {
    /// 1-based line number in the source log file.
    pub line_number: usize,

    /// Extracted leading tag (the text before the first delimiter).
    pub tag: String,

    /// Full original line text.
    pub text: String,
}

/// Result of filtering a raw log: the ordered retained lines plus a count
/// of matches per recognised tag.
///
/// Every recognised tag is present in `tag_counts`, zero-initialised, even
/// when no line matched it. Relative line order is preserved from the
/// source file.
#[derive(Debug, Clone)]
pub struct LogScan {
    /// Retained lines in source order.
    pub lines: Vec<TaggedLine>,

    /// Matches per recognised tag.
    pub tag_counts: BTreeMap<String, usize>,
}

impl LogScan {
    /// Number of retained lines carrying the given tag.
    pub fn count_for(&self, tag: &str) -> usize {
        self.tag_counts.get(tag).copied().unwrap_or(0)
    }
}

// =============================================================================
// Cam Record (normalised output of parsing)
// =============================================================================

/// A single parsed positional record from the flight log.
///
/// Immutable after parsing. The coordinate fields are the only ones the
/// classifier reads; the raw field strings are kept for diagnostics.
#[derive(Debug, Clone)]
pub struct CamRecord {
    /// 1-based line number in the source log file.
    pub line_number: usize,

    /// Raw field strings after whitespace stripping and delimiter split.
    pub fields: Vec<String>,

    /// Latitude in decimal degrees, parsed from the schema's lat position.
    pub lat: f64,

    /// Longitude in decimal degrees, parsed from the schema's lon position.
    pub lon: f64,

    /// Derived capture time in UTC, when the schema names GPS week and
    /// intra-week millisecond fields and both parse cleanly. Best-effort:
    /// `None` never fails the record.
    pub captured_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Bounding Box
// =============================================================================

/// An axis-aligned geographic rectangle in decimal degrees.
///
/// Construction is fallible (see `BoundingBox::from_corner_coords` in
/// core::bounds); a successfully built box always satisfies
/// `lat_max >= lat_min` and `lon_max >= lon_min`. Degenerate boxes with
/// equal bounds are legal and match exactly one line or point. An unset
/// box cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub(crate) lat_min: f64,
    pub(crate) lat_max: f64,
    pub(crate) lon_min: f64,
    pub(crate) lon_max: f64,
}

// =============================================================================
// Image File (output of discovery phase)
// =============================================================================

/// Metadata about an image file found during discovery.
///
/// Opaque to the classifier: only its ordinal position in the discovered
/// list matters for pairing.
#[derive(Debug, Clone)]
pub struct ImageFile {
    /// Full path to the file.
    pub path: PathBuf,

    /// File size in bytes.
    pub size: u64,

    /// Last modification timestamp.
    pub modified: Option<DateTime<Utc>>,
}

// =============================================================================
// Classification (per image/record pair)
// =============================================================================

/// The inside/outside decision for one image/record pair.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    /// Path of the paired image file.
    pub image: PathBuf,

    /// Latitude of the paired log record, decimal degrees.
    pub lat: f64,

    /// Longitude of the paired log record, decimal degrees.
    pub lon: f64,

    /// True when the position lies inside the bounding box (inclusive on
    /// all four edges).
    pub retained: bool,

    /// Derived capture time from the log record, when available.
    pub captured_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Flight Summary
// =============================================================================

/// Run totals for a completed classification pass.
///
/// Invariant: `retained + filtered == image_count`.
#[derive(Debug, Clone, Serialize)]
pub struct FlightSummary {
    /// Number of images paired and classified.
    pub image_count: usize,

    /// Images inside the bounding box.
    pub retained: usize,

    /// Images outside the bounding box.
    pub filtered: usize,

    /// Matches per recognised tag from the log scan.
    pub tag_counts: BTreeMap<String, usize>,
}

/// Complete result of a correlation pass: per-pair decisions, the box they
/// were tested against, and the accumulated totals.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationReport {
    /// The bounding box every pair was tested against.
    pub bounds: BoundingBox,

    /// Per-pair decisions, in image order.
    pub classifications: Vec<Classification>,

    /// Accumulated run totals.
    pub summary: FlightSummary,
}

// =============================================================================
// Transfer Mode
// =============================================================================

/// What to do with retained images after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// Classify only; no filesystem changes.
    #[default]
    None,

    /// Copy retained images into the destination folder.
    Copy,

    /// Move retained images into the destination folder.
    Move,
}

impl TransferMode {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            TransferMode::None => "none",
            TransferMode::Copy => "copy",
            TransferMode::Move => "move",
        }
    }
}

impl std::fmt::Display for TransferMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TransferMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(TransferMode::None),
            "copy" => Ok(TransferMode::Copy),
            "move" => Ok(TransferMode::Move),
            other => Err(format!(
                "unknown transfer mode '{other}' (expected none, copy or move)"
            )),
        }
    }
}

// =============================================================================
// Marker Style
// =============================================================================

/// Label and colour applied to every exported map marker.
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    /// Marker name column, the same for every point.
    pub label: String,

    /// Marker colour as an RGB hex string without '#'.
    pub colour: String,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            label: crate::util::constants::DEFAULT_MARKER_LABEL.to_string(),
            colour: crate::util::constants::DEFAULT_MARKER_COLOUR.to_string(),
        }
    }
}

// geofilter - app/flight.rs
//
// Per-flight configuration: locating and loading geofilter.json.
//
// Unlike config.toml (machine preferences, load-tolerant), the flight
// config is required input. A missing file, a missing key or an
// unacceptable value is a fatal ConfigError with a distinct variant so the
// operator is told exactly what to fix.
//
// Lookup order: explicit --flight-config path, then
// <flight root>/geofilter.json, then ./geofilter.json.

use crate::core::model::{RecordSchema, TransferMode};
use crate::util::constants;
use crate::util::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// =============================================================================
// On-disk shape
// =============================================================================

/// Raw deserialisable shape of geofilter.json.
///
/// Every field is optional at the serde level so a missing key surfaces as
/// a `MissingField` error naming the key, rather than a generic JSON parse
/// failure. Wrong value types still fail deserialisation and surface as
/// `JsonParse`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct RawFlightConfig {
    /// Flat boundary coordinate list: lat, lon, lat, lon, ...
    coords: Option<Vec<f64>>,

    /// Flight log file path.
    log_file: Option<String>,

    /// Folder holding the captured images.
    image_folder: Option<String>,

    /// Destination folder for retained images.
    image_filter_folder: Option<String>,

    /// Record tag to correlate against (default "CAM").
    tracked_tag: Option<String>,

    /// Transfer mode: "none", "copy" or "move" (default "none").
    transfer: Option<String>,

    /// Image extensions to accept (default: the built-in list).
    extensions: Option<Vec<String>>,
}

// =============================================================================
// Validated flight config
// =============================================================================

/// Validated per-flight configuration with all paths resolved against the
/// flight root.
#[derive(Debug, Clone)]
pub struct FlightConfig {
    /// Path the config was loaded from.
    pub source_path: PathBuf,

    /// Boundary coordinates, alternating lat/lon.
    pub coords: Vec<f64>,

    /// Resolved flight log path.
    pub log_file: PathBuf,

    /// Resolved image folder path.
    pub image_folder: PathBuf,

    /// Resolved destination folder for retained images.
    pub image_filter_folder: PathBuf,

    /// Tag of the record type images are paired with.
    pub tracked_tag: String,

    /// What to do with retained images.
    pub transfer: TransferMode,

    /// Accepted image extensions, lower-case, no leading dot.
    pub extensions: Vec<String>,
}

/// Locate the flight config file.
///
/// When `explicit` is given it is the only candidate; otherwise the flight
/// root and then the working directory are searched for
/// `geofilter.json`.
pub fn find_flight_config(
    flight_root: &Path,
    explicit: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    let candidates: Vec<PathBuf> = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => vec![
            flight_root.join(constants::FLIGHT_CONFIG_FILE_NAME),
            PathBuf::from(constants::FLIGHT_CONFIG_FILE_NAME),
        ],
    };

    for candidate in &candidates {
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "Flight config located");
            return Ok(candidate.clone());
        }
    }

    Err(ConfigError::FlightConfigNotFound {
        searched: candidates,
    })
}

/// Load and validate the flight config at `path`, resolving relative paths
/// against `flight_root`.
pub fn load_flight_config(path: &Path, flight_root: &Path) -> Result<FlightConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let raw: RawFlightConfig =
        serde_json::from_str(&content).map_err(|e| ConfigError::JsonParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    let coords = raw.coords.ok_or(ConfigError::MissingField {
        path: path.to_path_buf(),
        field: "coords",
    })?;
    let log_file = raw.log_file.ok_or(ConfigError::MissingField {
        path: path.to_path_buf(),
        field: "log-file",
    })?;
    let image_folder = raw.image_folder.ok_or(ConfigError::MissingField {
        path: path.to_path_buf(),
        field: "image-folder",
    })?;
    let image_filter_folder = raw.image_filter_folder.ok_or(ConfigError::MissingField {
        path: path.to_path_buf(),
        field: "image-filter-folder",
    })?;

    let tracked_tag = raw
        .tracked_tag
        .unwrap_or_else(|| constants::DEFAULT_TRACKED_TAG.to_string());
    if RecordSchema::for_tag(&tracked_tag).is_none() {
        return Err(ConfigError::InvalidValue {
            path: path.to_path_buf(),
            field: "tracked-tag",
            value: tracked_tag,
            expected: "a recognised record tag (CAM, GPS)",
        });
    }

    let transfer = match raw.transfer {
        Some(value) => {
            TransferMode::from_str(&value).map_err(|_| ConfigError::InvalidValue {
                path: path.to_path_buf(),
                field: "transfer",
                value,
                expected: "one of: none, copy, move",
            })?
        }
        None => TransferMode::default(),
    };

    let extensions = match raw.extensions {
        Some(list) => {
            let cleaned: Vec<String> = list
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
            if cleaned.is_empty() {
                return Err(ConfigError::InvalidValue {
                    path: path.to_path_buf(),
                    field: "extensions",
                    value: format!("{list:?}"),
                    expected: "at least one non-empty extension",
                });
            }
            cleaned
        }
        None => constants::SUPPORTED_IMAGE_EXTENSIONS
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
    };

    let config = FlightConfig {
        source_path: path.to_path_buf(),
        coords,
        log_file: resolve(&log_file, flight_root),
        image_folder: resolve(&image_folder, flight_root),
        image_filter_folder: resolve(&image_filter_folder, flight_root),
        tracked_tag,
        transfer,
        extensions,
    };

    tracing::info!(
        path = %path.display(),
        log = %config.log_file.display(),
        images = %config.image_folder.display(),
        tag = %config.tracked_tag,
        transfer = %config.transfer,
        "Flight config loaded"
    );

    Ok(config)
}

/// Resolve a configured path against the flight root. Absolute paths pass
/// through untouched.
fn resolve(configured: &str, flight_root: &Path) -> PathBuf {
    let path = Path::new(configured);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        flight_root.join(path)
    }
}

// =============================================================================
// Unit tests
// =============================================================================

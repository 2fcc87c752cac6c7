// geofilter - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "geofilter";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "geofilter";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Log format
// =============================================================================

/// Field delimiter in flight-log lines. The tag is everything before the
/// first occurrence of this character.
pub const FIELD_DELIMITER: char = ',';

/// Tag whose records are correlated with captured images.
pub const DEFAULT_TRACKED_TAG: &str = "CAM";

/// Seconds per GPS week, used to convert GPSWeek/GPSTime fields to UTC.
pub const SECONDS_PER_GPS_WEEK: i64 = 604_800;

/// Maximum flight-log size in bytes. Dataflash text logs for a single
/// survey flight are tens of megabytes at most; anything past this limit
/// is almost certainly the wrong file.
pub const MAX_LOG_FILE_BYTES: u64 = 512 * 1024 * 1024; // 512 MB

// =============================================================================
// Image discovery
// =============================================================================

/// Image extensions recognised by default (lower-case, no dot).
/// Matching is case-insensitive so `IMG_0001.JPG` is found.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "tif", "tiff", "png", "arw"];

/// Default directory recursion depth for image discovery. Depth 1 lists the
/// image folder itself without descending, matching how cameras lay out a
/// single flight's captures.
pub const DEFAULT_IMAGE_MAX_DEPTH: usize = 1;

/// Hard upper bound on image discovery depth.
pub const ABSOLUTE_IMAGE_MAX_DEPTH: usize = 10;

/// Default maximum number of images accepted in a single run.
pub const DEFAULT_MAX_IMAGES: usize = 10_000;

/// Minimum sensible value for the max-images limit.
pub const MIN_MAX_IMAGES: usize = 1;

/// Hard upper bound on max images (prevents configuration mistakes).
pub const ABSOLUTE_MAX_IMAGES: usize = 100_000;

// =============================================================================
// Marker output
// =============================================================================

/// Default marker name column written for every classified image.
pub const DEFAULT_MARKER_LABEL: &str = "rock";

/// Default marker colour column (RGB hex, no leading #).
pub const DEFAULT_MARKER_COLOUR: &str = "FFFF00";

/// Decimal places for latitude/longitude in marker output. Seven places is
/// roughly centimetre resolution, past the accuracy of the source GPS.
pub const MARKER_PRECISION: usize = 7;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Application configuration file name (platform config directory).
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Per-flight configuration file name, looked for in the flight folder and
/// then the working directory.
pub const FLIGHT_CONFIG_FILE_NAME: &str = "geofilter.json";

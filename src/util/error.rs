// geofilter - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation. Every precondition failure in the
// correlation run surfaces as its own identifiable variant so callers can
// report exactly which input was at fault.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all geofilter operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum GeofilterError {
    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Image discovery failed.
    Discovery(DiscoveryError),

    /// Flight-log record parsing failed.
    Parse(ParseError),

    /// Boundary coordinate list was malformed.
    Bounds(BoundsError),

    /// Image/record correlation precondition failed.
    Correlate(CorrelateError),

    /// Export operation failed.
    Export(ExportError),

    /// Image transfer (copy/move) failed.
    Transfer(TransferError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for GeofilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::Bounds(e) => write!(f, "Boundary error: {e}"),
            Self::Correlate(e) => write!(f, "Correlation error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Transfer(e) => write!(f, "Transfer error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for GeofilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Discovery(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Bounds(e) => Some(e),
            Self::Correlate(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Transfer(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors related to the application config (`config.toml`) and the
/// per-flight config (`geofilter.json`).
#[derive(Debug)]
pub enum ConfigError {
    /// No flight config file was found in any of the searched locations.
    FlightConfigNotFound { searched: Vec<PathBuf> },

    /// JSON file could not be parsed.
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// TOML file could not be parsed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A required field is missing from the flight config.
    MissingField { path: PathBuf, field: &'static str },

    /// A config value has the wrong shape or an unacceptable value.
    InvalidValue {
        path: PathBuf,
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// I/O error reading a config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FlightConfigNotFound { searched } => {
                let locations: Vec<String> =
                    searched.iter().map(|p| p.display().to_string()).collect();
                write!(
                    f,
                    "No flight config found. Searched: {}",
                    locations.join(", ")
                )
            }
            Self::JsonParse { path, source } => {
                write!(f, "Failed to parse JSON '{}': {source}", path.display())
            }
            Self::TomlParse { path, source } => {
                write!(f, "Failed to parse TOML '{}': {source}", path.display())
            }
            Self::MissingField { path, field } => {
                write!(
                    f,
                    "Flight config '{}': missing required field '{field}'",
                    path.display()
                )
            }
            Self::InvalidValue {
                path,
                field,
                value,
                expected,
            } => write!(
                f,
                "Flight config '{}': '{field}' = '{value}' is invalid. Expected: {expected}",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "I/O error reading config '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::JsonParse { source, .. } => Some(source),
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for GeofilterError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to image file discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The image folder does not exist or is not accessible.
    RootNotFound { path: PathBuf },

    /// The image folder path is not a directory.
    NotADirectory { path: PathBuf },

    /// The image folder contains no files with a recognised extension.
    NoImages { path: PathBuf },

    /// More images were found than the configured limit allows. Truncation
    /// would silently break the 1:1 image/record correspondence, so this is
    /// fatal rather than a warning.
    TooManyImages { found: usize, max: usize },

    /// Walkdir traversal error (wraps individual file/dir access failures).
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Image folder '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Image folder '{}' is not a directory", path.display())
            }
            Self::NoImages { path } => {
                write!(
                    f,
                    "No image files found in '{}' (recognised extensions only)",
                    path.display()
                )
            }
            Self::TooManyImages { found, max } => {
                write!(
                    f,
                    "Found {found} images but the limit is {max}. \
                     Raise [discovery] max_images in config.toml if this flight is genuine."
                )
            }
            Self::Traversal { path, source } => {
                write!(f, "Error traversing '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Traversal { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for GeofilterError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors related to flight-log record parsing. All parse errors are fatal
/// for the whole run: a skipped record would silently desynchronise the
/// positional image/record pairing.
#[derive(Debug)]
pub enum ParseError {
    /// A tracked line has fewer fields than the schema's coordinate
    /// positions require.
    TooFewFields {
        line_number: usize,
        tag: String,
        found: usize,
        required: usize,
    },

    /// The field at a coordinate position is not a parseable number.
    InvalidCoordinate {
        line_number: usize,
        field: &'static str,
        value: String,
        source: std::num::ParseFloatError,
    },

    /// The log file exceeds the maximum accepted size.
    LogTooLarge { path: PathBuf, size: u64, max: u64 },

    /// I/O error while reading the log file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewFields {
                line_number,
                tag,
                found,
                required,
            } => write!(
                f,
                "line {line_number}: {tag} record has {found} fields, \
                 schema requires at least {required}"
            ),
            Self::InvalidCoordinate {
                line_number,
                field,
                value,
                source,
            } => write!(
                f,
                "line {line_number}: cannot parse {field} value '{value}': {source}"
            ),
            Self::LogTooLarge { path, size, max } => write!(
                f,
                "Log file '{}' is {size} bytes, exceeds maximum of {max} bytes",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "'{}': I/O error: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidCoordinate { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ParseError> for GeofilterError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Boundary errors
// ---------------------------------------------------------------------------

/// Errors related to the boundary coordinate list.
#[derive(Debug)]
pub enum BoundsError {
    /// The coordinate list is empty; no bounding box can be formed.
    NoCoordinates,

    /// The coordinate list has an odd number of values; the last latitude
    /// has no matching longitude.
    OddCoordinateCount { count: usize },
}

impl fmt::Display for BoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCoordinates => {
                write!(f, "Boundary coordinate list is empty")
            }
            Self::OddCoordinateCount { count } => write!(
                f,
                "Boundary coordinate list has {count} values; \
                 expected an even count of alternating latitude/longitude pairs"
            ),
        }
    }
}

impl std::error::Error for BoundsError {}

impl From<BoundsError> for GeofilterError {
    fn from(e: BoundsError) -> Self {
        Self::Bounds(e)
    }
}

// ---------------------------------------------------------------------------
// Correlation errors
// ---------------------------------------------------------------------------

/// Errors related to image/record correlation.
#[derive(Debug)]
pub enum CorrelateError {
    /// The image count does not equal the tracked-record count. The run is
    /// all-or-nothing: no classification output is produced.
    CountMismatch {
        images: usize,
        records: usize,
        tag: String,
    },
}

impl fmt::Display for CorrelateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CountMismatch {
                images,
                records,
                tag,
            } => write!(
                f,
                "{images} image files but {records} {tag} log entries; \
                 counts must match exactly for positional pairing"
            ),
        }
    }
}

impl std::error::Error for CorrelateError {}

impl From<CorrelateError> for GeofilterError {
    fn from(e: CorrelateError) -> Self {
        Self::Correlate(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for GeofilterError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Transfer errors
// ---------------------------------------------------------------------------

/// Errors related to copying/moving retained images. Per-file failures are
/// fatal so a half-transferred flight is always visible.
#[derive(Debug)]
pub enum TransferError {
    /// The destination directory could not be created.
    CreateDir { path: PathBuf, source: io::Error },

    /// A retained image could not be copied.
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    /// A retained image could not be moved.
    Move {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    /// An image path has no final file-name component.
    MissingFileName { path: PathBuf },
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir { path, source } => write!(
                f,
                "Cannot create destination directory '{}': {source}",
                path.display()
            ),
            Self::Copy { from, to, source } => write!(
                f,
                "Cannot copy '{}' to '{}': {source}",
                from.display(),
                to.display()
            ),
            Self::Move { from, to, source } => write!(
                f,
                "Cannot move '{}' to '{}': {source}",
                from.display(),
                to.display()
            ),
            Self::MissingFileName { path } => {
                write!(f, "Image path '{}' has no file name", path.display())
            }
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Copy { source, .. } => Some(source),
            Self::Move { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<TransferError> for GeofilterError {
    fn from(e: TransferError) -> Self {
        Self::Transfer(e)
    }
}

/// Convenience type alias for geofilter results.
pub type Result<T> = std::result::Result<T, GeofilterError>;

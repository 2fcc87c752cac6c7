// geofilter - platform/config.rs
//
// Platform configuration directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance. config.toml holds machine-level preferences;
// per-flight settings live in the flight's geofilter.json (app::flight).

use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for geofilter configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/geofilter/ or
    /// %APPDATA%\geofilter\config\).
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be
    /// determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[markers]` section.
    pub markers: MarkersSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Maximum directory recursion depth inside the image folder.
    pub max_depth: Option<usize>,
    /// Maximum images accepted per flight.
    pub max_images: Option<usize>,
}

/// `[markers]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct MarkersSection {
    /// Marker label written for every exported point.
    pub label: Option<String>,
    /// Marker colour as a 6-digit RGB hex string.
    pub colour: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time. Invalid
/// values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Discovery --
    /// Maximum directory recursion depth inside the image folder.
    pub max_depth: usize,
    /// Maximum images accepted per flight.
    pub max_images: usize,

    // -- Markers --
    /// Marker label.
    pub marker_label: String,
    /// Marker colour (RGB hex, no '#').
    pub marker_colour: String,

    // -- Logging --
    /// Logging level string (consumed by logging init before tracing is up).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_depth: constants::DEFAULT_IMAGE_MAX_DEPTH,
            max_images: constants::DEFAULT_MAX_IMAGES,
            marker_label: constants::DEFAULT_MARKER_LABEL.to_string(),
            marker_colour: constants::DEFAULT_MARKER_COLOUR.to_string(),
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal
/// warnings. If the file does not exist, returns defaults with no warnings
/// (first-run). If the file is unreadable or unparseable, returns defaults
/// with a warning -- the run still proceeds; a broken preference file must
/// never block a flight.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults. \
                 See config.example.toml for the expected format.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    // Validate each field against named constants, accumulating all errors.
    let mut config = AppConfig::default();

    // -- Discovery: max_depth --
    if let Some(depth) = raw.discovery.max_depth {
        if (1..=constants::ABSOLUTE_IMAGE_MAX_DEPTH).contains(&depth) {
            config.max_depth = depth;
        } else {
            warnings.push(format!(
                "[discovery] max_depth = {depth} is out of range (1-{}). Using default ({}).",
                constants::ABSOLUTE_IMAGE_MAX_DEPTH,
                constants::DEFAULT_IMAGE_MAX_DEPTH,
            ));
        }
    }

    // -- Discovery: max_images --
    if let Some(images) = raw.discovery.max_images {
        if (constants::MIN_MAX_IMAGES..=constants::ABSOLUTE_MAX_IMAGES).contains(&images) {
            config.max_images = images;
        } else {
            warnings.push(format!(
                "[discovery] max_images = {images} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_IMAGES,
                constants::ABSOLUTE_MAX_IMAGES,
                constants::DEFAULT_MAX_IMAGES,
            ));
        }
    }

    // -- Markers: label --
    if let Some(ref label) = raw.markers.label {
        if label.is_empty() {
            warnings.push(format!(
                "[markers] label is empty. Using default (\"{}\").",
                constants::DEFAULT_MARKER_LABEL,
            ));
        } else {
            config.marker_label = label.clone();
        }
    }

    // -- Markers: colour --
    if let Some(ref colour) = raw.markers.colour {
        if colour.len() == 6 && colour.chars().all(|c| c.is_ascii_hexdigit()) {
            config.marker_colour = colour.clone();
        } else {
            warnings.push(format!(
                "[markers] colour = \"{colour}\" is not a 6-digit RGB hex value. \
                 Using default ({}).",
                constants::DEFAULT_MARKER_COLOUR,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}

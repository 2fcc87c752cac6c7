// geofilter - core/discovery.rs
//
// Image folder traversal and capture discovery.
//
// Architecture note: this module uses `walkdir` for directory traversal and
// reads only file *metadata* (size, mtime), never image *contents*. The
// ordering it produces is load-bearing: the classifier pairs image[i] with
// log record[i], so discovery must return the same deterministic order the
// camera wrote the files in. Camera firmware numbers files without
// zero-padding, so a plain lexicographic sort would put IMG_10 before
// IMG_2; filenames are therefore compared with digit runs taken as numbers.

use crate::core::model::ImageFile;
use crate::util::error::DiscoveryError;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::path::Path;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for an image discovery pass.
///
/// All limits reference named constants from `util::constants` so they are
/// auditable in a single place.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum directory recursion depth. 1 means the image folder itself,
    /// no subdirectories, which is how cameras lay out a flight.
    pub max_depth: usize,

    /// Maximum number of images accepted before the run is refused.
    /// Truncating instead would silently desynchronise the positional
    /// pairing, so exceeding this limit is fatal.
    pub max_images: usize,

    /// Image file extensions to accept, lower-case, without the dot.
    pub extensions: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        use crate::util::constants;
        Self {
            max_depth: constants::DEFAULT_IMAGE_MAX_DEPTH,
            max_images: constants::DEFAULT_MAX_IMAGES,
            extensions: constants::SUPPORTED_IMAGE_EXTENSIONS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// Discover image files under `root`, in deterministic natural filename
/// order.
///
/// # Non-fatal errors
/// Entries that cannot be accessed due to permission or I/O problems are
/// recorded as human-readable strings in the returned warnings vector and
/// do NOT cause the function to return `Err`.
///
/// # Fatal errors
/// Returns `Err` when the root path is invalid (`RootNotFound`,
/// `NotADirectory`), when no image file is found (`NoImages`), or when the
/// image count exceeds the configured limit (`TooManyImages`).
pub fn discover_images(
    root: &Path,
    config: &DiscoveryConfig,
) -> Result<(Vec<ImageFile>, Vec<String>), DiscoveryError> {
    use crate::util::constants;

    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(DiscoveryError::NotADirectory {
                path: root.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(DiscoveryError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
    }

    // Clamp config limits to absolute bounds.
    let max_depth = config.max_depth.min(constants::ABSOLUTE_IMAGE_MAX_DEPTH);
    let max_images = config
        .max_images
        .clamp(constants::MIN_MAX_IMAGES, constants::ABSOLUTE_MAX_IMAGES);

    tracing::debug!(
        root = %root.display(),
        max_depth,
        max_images,
        extensions = ?config.extensions,
        "Image discovery starting"
    );

    let patterns = compile_extension_patterns(&config.extensions);

    let mut files: Vec<ImageFile> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let walker = walkdir::WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false);

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                // Inaccessible entry: non-fatal, record warning.
                let path_str = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let msg = format!("Cannot access '{path_str}': {e}");
                tracing::debug!(warning = %msg, "Discovery warning");
                warnings.push(msg);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => {
                warnings.push(format!("Skipping '{}': non-UTF-8 filename", path.display()));
                continue;
            }
        };

        if !matches_extension(file_name, &patterns) {
            tracing::trace!(file = file_name, "Not a recognised image extension");
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                let msg = format!("Cannot read metadata for '{}': {e}", path.display());
                tracing::debug!(warning = %msg, "Discovery warning");
                warnings.push(msg);
                continue;
            }
        };

        files.push(ImageFile {
            path: path.to_path_buf(),
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        });

        if files.len() > max_images {
            return Err(DiscoveryError::TooManyImages {
                found: files.len(),
                max: max_images,
            });
        }
    }

    if files.is_empty() {
        return Err(DiscoveryError::NoImages {
            path: root.to_path_buf(),
        });
    }

    files.sort_by(|a, b| compare_natural(&a.path, &b.path));

    tracing::debug!(
        images = files.len(),
        warnings = warnings.len(),
        first = %files[0].path.display(),
        "Image discovery complete"
    );

    Ok((files, warnings))
}

// =============================================================================
// Extension matching
// =============================================================================

/// Build `*.ext` glob patterns from the configured extension list.
/// Extensions that fail to compile are logged and skipped.
fn compile_extension_patterns(extensions: &[String]) -> Vec<glob::Pattern> {
    extensions
        .iter()
        .filter_map(|ext| {
            let pattern = format!("*.{}", ext.trim_start_matches('.'));
            match glob::Pattern::new(&pattern) {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    tracing::warn!(extension = %ext, error = %e, "Invalid extension, skipping");
                    None
                }
            }
        })
        .collect()
}

/// Case-insensitive extension match, so `IMG_0001.JPG` and `img_0001.jpg`
/// are both recognised.
fn matches_extension(file_name: &str, patterns: &[glob::Pattern]) -> bool {
    let options = glob::MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    patterns.iter().any(|p| p.matches_with(file_name, options))
}

// =============================================================================
// Natural ordering
// =============================================================================

/// One token of a natural-sort key: a digit run compared numerically, or a
/// text run compared case-insensitively. Digit runs order before text runs
/// when the token kinds differ.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum NaturalToken {
    Number(u128),
    Text(String),
}

/// Token splitter, compiled once. The pattern is a literal that always
/// compiles; the Option exists only to avoid a panic path.
fn token_splitter() -> Option<&'static regex::Regex> {
    static SPLITTER: std::sync::OnceLock<Option<regex::Regex>> = std::sync::OnceLock::new();
    SPLITTER
        .get_or_init(|| regex::Regex::new(r"\d+|\D+").ok())
        .as_ref()
}

/// Splits a filename into alternating digit and non-digit runs.
///
/// Digit runs long enough to overflow u128 fall back to text tokens; no
/// camera produces such names, and the comparison stays total either way.
fn natural_key(name: &str) -> Vec<NaturalToken> {
    let splitter = match token_splitter() {
        Some(r) => r,
        None => return vec![NaturalToken::Text(name.to_lowercase())],
    };
    splitter
        .find_iter(name)
        .map(|m| {
            let token = m.as_str();
            match token.parse::<u128>() {
                Ok(n) => NaturalToken::Number(n),
                Err(_) => NaturalToken::Text(token.to_lowercase()),
            }
        })
        .collect()
}

/// Compares two paths by the natural key of their final component, falling
/// back to the full path so the order is total and deterministic.
fn compare_natural(a: &Path, b: &Path) -> Ordering {
    let name_a = a.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let name_b = b.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    natural_key(name_a)
        .cmp(&natural_key(name_b))
        .then_with(|| a.cmp(b))
}

// =============================================================================
// Tests
// =============================================================================

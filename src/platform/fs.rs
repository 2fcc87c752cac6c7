// geofilter - platform/fs.rs
//
// Filesystem access for flight-log text.

use crate::util::error::ParseError;
use std::path::Path;

/// Read the full content of a flight log as a string.
///
/// The file size is checked against `max_bytes` before reading; dataflash
/// logs are small and a multi-gigabyte path here is a wrong file, not a
/// big flight. Invalid UTF-8 is converted lossily -- ArduPilot logs are
/// ASCII, but a truncated download must not abort the run at the decode
/// step when the coordinate fields are intact.
pub fn read_log_text(path: &Path, max_bytes: u64) -> Result<String, ParseError> {
    let metadata = std::fs::metadata(path).map_err(|e| ParseError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    if metadata.len() > max_bytes {
        return Err(ParseError::LogTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max: max_bytes,
        });
    }

    let bytes = std::fs::read(path).map_err(|e| ParseError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        "Flight log read"
    );

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

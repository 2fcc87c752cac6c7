// geofilter - app/transfer.rs
//
// Moving retained images into the destination folder after classification.
//
// Transfer failures are fatal: a half-transferred flight folder looks
// complete to the next pipeline stage, so the first failed file stops the
// run with the offending paths. Mode `none` leaves the filesystem alone.

use crate::core::model::{Classification, TransferMode};
use crate::util::error::TransferError;
use std::path::Path;

/// Copy or move every retained image into `destination`, preserving file
/// names. Existing files with the same name are overwritten. Returns the
/// number of files transferred; `TransferMode::None` transfers nothing and
/// touches nothing.
pub fn transfer_retained(
    classifications: &[Classification],
    destination: &Path,
    mode: TransferMode,
) -> Result<usize, TransferError> {
    if mode == TransferMode::None {
        tracing::debug!("Transfer mode is none; leaving images in place");
        return Ok(0);
    }

    std::fs::create_dir_all(destination).map_err(|e| TransferError::CreateDir {
        path: destination.to_path_buf(),
        source: e,
    })?;

    let mut transferred = 0usize;
    for classification in classifications.iter().filter(|c| c.retained) {
        let file_name =
            classification
                .image
                .file_name()
                .ok_or_else(|| TransferError::MissingFileName {
                    path: classification.image.clone(),
                })?;
        let target = destination.join(file_name);

        // Mode none returned above, so this is a copy or a move.
        if mode == TransferMode::Move {
            move_file(&classification.image, &target)?;
        } else {
            std::fs::copy(&classification.image, &target).map_err(|e| TransferError::Copy {
                from: classification.image.clone(),
                to: target.clone(),
                source: e,
            })?;
        }

        tracing::trace!(
            from = %classification.image.display(),
            to = %target.display(),
            "Image transferred"
        );
        transferred += 1;
    }

    tracing::info!(
        transferred,
        mode = %mode,
        destination = %destination.display(),
        "Transfer complete"
    );
    Ok(transferred)
}

/// Rename, falling back to copy-and-delete when the destination is on a
/// different filesystem (SD card to archive share is the common case).
fn move_file(from: &Path, to: &Path) -> Result<(), TransferError> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to)
        .and_then(|_| std::fs::remove_file(from))
        .map_err(|e| TransferError::Move {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: e,
        })?;
    Ok(())
}

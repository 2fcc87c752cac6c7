// geofilter - core/classify.rs
//
// Correlation and classification: pair image[i] with record[i], test each
// position against the bounding box, accumulate run totals.
//
// Pairing is positional. Synchronised capture means the i-th image was
// triggered by the i-th tracked log entry; there is no content-based
// matching and no recovery from a miscount, so the count precondition is
// checked before any pair is classified.
// Core layer: pure logic, no filesystem side effects.

use crate::core::model::{
    BoundingBox, CamRecord, Classification, ClassificationReport, FlightSummary, ImageFile,
};
use crate::util::error::CorrelateError;
use std::collections::BTreeMap;

/// Pairs each image with its positional record and classifies every pair
/// against the bounding box.
///
/// All-or-nothing: when the image count and record count differ the run
/// fails with both counts and produces no classifications at all. On
/// success the returned summary always satisfies
/// `retained + filtered == image_count`.
pub fn correlate(
    images: &[ImageFile],
    records: &[CamRecord],
    bounds: BoundingBox,
    tracked_tag: &str,
    tag_counts: BTreeMap<String, usize>,
) -> Result<ClassificationReport, CorrelateError> {
    if images.len() != records.len() {
        return Err(CorrelateError::CountMismatch {
            images: images.len(),
            records: records.len(),
            tag: tracked_tag.to_string(),
        });
    }

    let mut retained = 0usize;
    let mut filtered = 0usize;
    let mut classifications = Vec::with_capacity(images.len());

    for (image, record) in images.iter().zip(records.iter()) {
        let inside = bounds.contains(record.lat, record.lon);
        if inside {
            retained += 1;
        } else {
            filtered += 1;
        }
        classifications.push(Classification {
            image: image.path.clone(),
            lat: record.lat,
            lon: record.lon,
            retained: inside,
            captured_at: record.captured_at,
        });
    }

    tracing::debug!(retained, filtered, "Classification complete");

    Ok(ClassificationReport {
        bounds,
        classifications,
        summary: FlightSummary {
            image_count: images.len(),
            retained,
            filtered,
            tag_counts,
        },
    })
}

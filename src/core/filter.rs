// geofilter - core/filter.rs
//
// Log line filtering: retain the lines whose leading tag is recognised,
// preserving source order and counting matches per tag.
// Core layer: pure logic, no I/O dependencies.

use crate::core::model::{LogScan, TaggedLine};
use std::collections::BTreeMap;

/// Extracts the leading tag from a raw log line: the text before the first
/// field delimiter, or the whole line when no delimiter is present.
///
/// No trimming is applied; a padded tag like `" CAM"` is a different tag.
pub fn extract_tag(line: &str) -> &str {
    match line.find(crate::util::constants::FIELD_DELIMITER) {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Scans raw log text and retains every line whose extracted tag is in the
/// recognised set.
///
/// Returns the retained lines in source order together with per-tag match
/// counts. Every recognised tag appears in the counts, zero-initialised.
/// Unrecognised lines are dropped silently; a delimiter-free line is
/// retained only when the whole line equals a recognised tag.
pub fn scan_log(text: &str, tags: &[&str]) -> LogScan {
    let mut tag_counts: BTreeMap<String, usize> =
        tags.iter().map(|t| (t.to_string(), 0)).collect();
    let mut lines = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let tag = extract_tag(line);
        if let Some(count) = tag_counts.get_mut(tag) {
            *count += 1;
            lines.push(TaggedLine {
                line_number: idx + 1,
                tag: tag.to_string(),
                text: line.to_string(),
            });
        }
    }

    tracing::debug!(
        retained = lines.len(),
        tags = ?tag_counts,
        "Log scan complete"
    );

    LogScan { lines, tag_counts }
}

/// Selects the subset of retained lines carrying the given tag, preserving
/// order. Idempotent: re-applying with the same tag returns an equal list.
pub fn lines_with_tag(lines: &[TaggedLine], tag: &str) -> Vec<TaggedLine> {
    lines.iter().filter(|l| l.tag == tag).cloned().collect()
}

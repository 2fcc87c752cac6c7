// geofilter - core/record.rs
//
// Record parsing: split a retained log line into fields by a fixed per-tag
// schema and extract the numeric position. Parse failures are fatal for the
// whole run; a silently defaulted coordinate would classify an image
// against a position it was never captured at.
// Core layer: pure logic, no I/O dependencies.

use crate::core::model::{CamRecord, RecordSchema, TaggedLine};
use crate::util::constants::{FIELD_DELIMITER, SECONDS_PER_GPS_WEEK};
use crate::util::error::ParseError;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Parses one retained log line into a positional record.
///
/// All whitespace is stripped before splitting, so padded fields like
/// `" 51.9239374"` parse cleanly. The line must have at least enough fields
/// for the schema's coordinate positions to exist; the values there must be
/// finite decimal numbers. Fields beyond the coordinates pass through
/// unparsed.
///
/// GPS week/time fields are best-effort: when the schema names them and
/// both parse as integers the record carries a derived UTC capture time,
/// otherwise `captured_at` is `None` and the record still succeeds.
pub fn parse_record(
    line: &str,
    line_number: usize,
    schema: &RecordSchema,
) -> Result<CamRecord, ParseError> {
    let stripped: String = line.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let fields: Vec<String> = stripped
        .split(FIELD_DELIMITER)
        .map(str::to_string)
        .collect();

    let required = schema.required_fields();
    if fields.len() < required {
        return Err(ParseError::TooFewFields {
            line_number,
            tag: schema.tag.to_string(),
            found: fields.len(),
            required,
        });
    }

    let lat = parse_coordinate(&fields[schema.lat_index], "latitude", line_number)?;
    let lon = parse_coordinate(&fields[schema.lon_index], "longitude", line_number)?;
    let captured_at = derive_capture_time(&fields, schema);

    Ok(CamRecord {
        line_number,
        fields,
        lat,
        lon,
        captured_at,
    })
}

/// Parses every tracked line in order, failing on the first bad record.
pub fn parse_records(
    lines: &[TaggedLine],
    schema: &RecordSchema,
) -> Result<Vec<CamRecord>, ParseError> {
    let records = lines
        .iter()
        .map(|l| parse_record(&l.text, l.line_number, schema))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        records = records.len(),
        tag = schema.tag,
        "Parsed tracked records"
    );
    Ok(records)
}

fn parse_coordinate(
    value: &str,
    field: &'static str,
    line_number: usize,
) -> Result<f64, ParseError> {
    value
        .parse::<f64>()
        .map_err(|e| ParseError::InvalidCoordinate {
            line_number,
            field,
            value: value.to_string(),
            source: e,
        })
}

fn derive_capture_time(fields: &[String], schema: &RecordSchema) -> Option<DateTime<Utc>> {
    let week_idx = schema.week_index?;
    let ms_idx = schema.time_ms_index?;
    let week = fields.get(week_idx)?.parse::<u64>().ok()?;
    let millis = fields.get(ms_idx)?.parse::<u64>().ok()?;
    gps_datetime(week, millis)
}

/// Converts a GPS week number plus intra-week milliseconds to UTC.
///
/// GPS time starts at 1980-01-06T00:00:00Z. No leap-second correction is
/// applied; flight logs carry raw GPS time and the derived timestamp is
/// informational only.
pub fn gps_datetime(week: u64, millis: u64) -> Option<DateTime<Utc>> {
    let epoch = Utc.with_ymd_and_hms(1980, 1, 6, 0, 0, 0).single()?;
    let week_secs = i64::try_from(week).ok()?.checked_mul(SECONDS_PER_GPS_WEEK)?;
    let intra_ms = i64::try_from(millis).ok()?;
    epoch
        .checked_add_signed(Duration::try_seconds(week_secs)?)?
        .checked_add_signed(Duration::try_milliseconds(intra_ms)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAM_LINE: &str =
        "CAM, 216941495, 2167, 216941.0, 51.9239374, -2.5424495, 103.42, 52.18, -1.5, 2.2, 118.3, 216941";

    #[test]
    fn test_parse_cam_line() {
        let record = parse_record(CAM_LINE, 7, &RecordSchema::cam()).unwrap();
        assert_eq!(record.line_number, 7);
        assert_eq!(record.fields.len(), 12);
        assert_eq!(record.lat, 51.9239374);
        assert_eq!(record.lon, -2.5424495);
    }

    #[test]
    fn test_parse_derives_capture_time() {
        let record = parse_record(CAM_LINE, 1, &RecordSchema::cam()).unwrap();
        // Week 2167 after 1980-01-06 is 2021-07-18; 216941495 ms is
        // 2 days 12:15:41.495 into the week.
        let expected = Utc.with_ymd_and_hms(2021, 7, 20, 12, 15, 41).unwrap()
            + Duration::milliseconds(495);
        assert_eq!(record.captured_at, Some(expected));
    }

    #[test]
    fn test_whitespace_padded_fields_parse() {
        let line = "CAM,  1 , 2 , 3 ,  51.5000000 ,  -2.5000000 ";
        let record = parse_record(line, 1, &RecordSchema::cam()).unwrap();
        assert_eq!(record.lat, 51.5);
        assert_eq!(record.lon, -2.5);
    }

    #[test]
    fn test_too_few_fields_is_fatal() {
        let err = parse_record("CAM, 1, 2", 9, &RecordSchema::cam()).unwrap_err();
        match err {
            ParseError::TooFewFields {
                line_number,
                found,
                required,
                ..
            } => {
                assert_eq!(line_number, 9);
                assert_eq!(found, 3);
                assert_eq!(required, 6);
            }
            other => panic!("expected TooFewFields, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_coordinate_is_fatal() {
        let err = parse_record("CAM, 1, 2, 3, abc, -2.5", 4, &RecordSchema::cam()).unwrap_err();
        match err {
            ParseError::InvalidCoordinate { field, value, .. } => {
                assert_eq!(field, "latitude");
                assert_eq!(value, "abc");
            }
            other => panic!("expected InvalidCoordinate, got {other:?}"),
        }
    }

    #[test]
    fn test_gps_schema_positions() {
        let line = "GPS, 3, 216941400, 2167, 11, 1.8, 51.9239375, -2.5424497, 103.5, 14.2";
        let record = parse_record(line, 1, &RecordSchema::gps()).unwrap();
        assert_eq!(record.lat, 51.9239375);
        assert_eq!(record.lon, -2.5424497);
    }

    /// A garbled week field loses the timestamp but never the record.
    #[test]
    fn test_bad_time_fields_do_not_fail_parse() {
        let line = "CAM, xyz, 2167, 3, 51.5, -2.5";
        let record = parse_record(line, 1, &RecordSchema::cam()).unwrap();
        assert_eq!(record.lat, 51.5);
        assert!(record.captured_at.is_none());
    }

    #[test]
    fn test_parse_records_stops_at_first_error() {
        let lines = vec![
            TaggedLine {
                line_number: 1,
                tag: "CAM".to_string(),
                text: "CAM, 1, 2, 3, 51.5, -2.5".to_string(),
            },
            TaggedLine {
                line_number: 2,
                tag: "CAM".to_string(),
                text: "CAM, 1, 2, 3, bad, -2.5".to_string(),
            },
        ];
        let err = parse_records(&lines, &RecordSchema::cam()).unwrap_err();
        match err {
            ParseError::InvalidCoordinate { line_number, .. } => assert_eq!(line_number, 2),
            other => panic!("expected InvalidCoordinate, got {other:?}"),
        }
    }

    #[test]
    fn test_gps_datetime_epoch() {
        let dt = gps_datetime(0, 0).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(1980, 1, 6, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_gps_datetime_known_week() {
        let dt = gps_datetime(2167, 0).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2021, 7, 18, 0, 0, 0).unwrap());
    }
}

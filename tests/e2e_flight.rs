// geofilter - tests/e2e_flight.rs
//
// End-to-end tests for the full correlation pipeline.
//
// These tests exercise the real filesystem, real walkdir traversal,
// real serde_json flight-config loading and real chrono GPS-time
// derivation. No mocks, no stubs: each test stages a complete flight
// folder in a tempdir around the committed fixture log and drives it
// through `app::pipeline::run`, the same entry point the CLI uses.
//
// The fixture log (tests/fixtures/flight_sample.log) carries 6 CAM
// records. Against the box built from
// [51.5210, -0.1430, 51.5240, -0.1390], four fall inside and two
// outside (one north of the box, one west of it).

use chrono::{Duration, TimeZone, Utc};
use geofilter::app::pipeline::{self, RunOptions};
use geofilter::core::export;
use geofilter::core::model::{MarkerStyle, RecordSchema, TransferMode};
use geofilter::core::{filter, record};
use geofilter::platform::config::AppConfig;
use geofilter::util::error::{ConfigError, CorrelateError, GeofilterError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// The committed sample flight log as text.
fn fixture_log_text() -> String {
    fs::read_to_string(fixture("flight_sample.log")).unwrap()
}

/// Default flight config JSON for the fixture log, with the boundary that
/// retains 4 of its 6 CAM fixes.
fn flight_config_json(transfer: &str) -> String {
    format!(
        r#"{{
    "coords": [51.5210, -0.1430, 51.5240, -0.1390],
    "log-file": "flight.log",
    "image-folder": "images",
    "image-filter-folder": "retained",
    "tracked-tag": "CAM",
    "transfer": "{transfer}"
}}"#
    )
}

/// Stage a complete flight folder in a tempdir: the fixture log, an image
/// folder with `image_names` files and a geofilter.json.
fn stage_flight(image_names: &[&str], config_json: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::write(root.join("flight.log"), fixture_log_text()).unwrap();

    let images = root.join("images");
    fs::create_dir(&images).unwrap();
    for name in image_names {
        fs::write(images.join(name), "jpeg-bytes").unwrap();
    }

    fs::write(root.join("geofilter.json"), config_json).unwrap();
    dir
}

/// Six image names matching the fixture's six CAM records, in the order a
/// camera would number them.
fn six_images() -> Vec<&'static str> {
    vec![
        "IMG_0001.JPG",
        "IMG_0002.JPG",
        "IMG_0003.JPG",
        "IMG_0004.JPG",
        "IMG_0005.JPG",
        "IMG_0006.JPG",
    ]
}

/// Run options pointing at a staged flight root.
fn run_opts(root: &Path) -> RunOptions {
    RunOptions {
        flight_root: root.to_path_buf(),
        flight_config_path: None,
        transfer_override: None,
    }
}

// =============================================================================
// Full flight runs
// =============================================================================

/// A staged flight with matching image and CAM counts classifies every
/// pair: 4 retained, 2 filtered, nothing transferred in "none" mode.
#[test]
fn e2e_full_flight_run_classifies_all_pairs() {
    let dir = stage_flight(&six_images(), &flight_config_json("none"));
    let outcome = pipeline::run(&run_opts(dir.path()), &AppConfig::default()).unwrap();

    let summary = &outcome.report.summary;
    assert_eq!(summary.image_count, 6, "all six pairs should be classified");
    assert_eq!(summary.retained, 4, "four CAM fixes lie inside the box");
    assert_eq!(summary.filtered, 2, "two CAM fixes lie outside the box");
    assert_eq!(outcome.report.classifications.len(), 6);
    assert_eq!(outcome.transferred, 0, "transfer mode none moves nothing");
    assert!(
        outcome.warnings.is_empty(),
        "a clean flight folder should produce no warnings: {:?}",
        outcome.warnings
    );

    // The box was derived from the corner list, min/max per axis.
    let bounds = outcome.report.bounds;
    assert_eq!(bounds.lat_min(), 51.5210);
    assert_eq!(bounds.lat_max(), 51.5240);
    assert_eq!(bounds.lon_min(), -0.1430);
    assert_eq!(bounds.lon_max(), -0.1390);

    // Per-tag counts from the scan ride along in the summary.
    assert_eq!(summary.tag_counts.get("CAM"), Some(&6));
    assert_eq!(summary.tag_counts.get("GPS"), Some(&7));
}

/// Pairing is positional over the naturally sorted image list: IMG_2
/// pairs with the first CAM record even though IMG_10 sorts before it
/// lexicographically.
#[test]
fn e2e_pairing_follows_natural_filename_order() {
    let names = [
        "IMG_1.JPG",
        "IMG_2.JPG",
        "IMG_3.JPG",
        "IMG_10.JPG",
        "IMG_11.JPG",
        "IMG_20.JPG",
    ];
    let dir = stage_flight(&names, &flight_config_json("none"));
    let outcome = pipeline::run(&run_opts(dir.path()), &AppConfig::default()).unwrap();

    let paired: Vec<String> = outcome
        .report
        .classifications
        .iter()
        .map(|c| c.image.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        paired, names,
        "classification order should follow numeric filename order"
    );

    // First pair carries the first CAM fix.
    let first = &outcome.report.classifications[0];
    assert_eq!(first.lat, 51.5223127);
    assert_eq!(first.lon, -0.1412340);
    assert!(first.retained);
}

/// Capture times come from the record's GPS week/millisecond fields,
/// anchored at the GPS epoch (1980-01-06).
#[test]
fn e2e_capture_times_derived_from_gps_week() {
    let dir = stage_flight(&six_images(), &flight_config_json("none"));
    let outcome = pipeline::run(&run_opts(dir.path()), &AppConfig::default()).unwrap();

    // Week 2167 starts 2021-07-18; 216941495 ms is 2 days 12:15:41.495 in.
    let expected = Utc.with_ymd_and_hms(2021, 7, 20, 12, 15, 41).unwrap()
        + Duration::milliseconds(495);
    assert_eq!(
        outcome.report.classifications[0].captured_at,
        Some(expected)
    );

    // Every fixture record carries valid time fields.
    assert!(
        outcome
            .report
            .classifications
            .iter()
            .all(|c| c.captured_at.is_some()),
        "all fixture CAM records have week/ms fields"
    );
}

// =============================================================================
// Transfer
// =============================================================================

/// Copy mode duplicates exactly the retained images into the filter
/// folder and leaves every original in place.
#[test]
fn e2e_transfer_copy_places_retained_images() {
    let dir = stage_flight(&six_images(), &flight_config_json("copy"));
    let outcome = pipeline::run(&run_opts(dir.path()), &AppConfig::default()).unwrap();

    assert_eq!(outcome.transferred, 4, "only retained images transfer");

    let retained_dir = dir.path().join("retained");
    let mut copied: Vec<String> = fs::read_dir(&retained_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    copied.sort();
    // Records 3 and 5 are outside the box, so images 3 and 5 stay behind.
    assert_eq!(
        copied,
        vec!["IMG_0001.JPG", "IMG_0002.JPG", "IMG_0004.JPG", "IMG_0006.JPG"]
    );

    for name in six_images() {
        assert!(
            dir.path().join("images").join(name).is_file(),
            "copy mode must leave the original {name} in place"
        );
    }
}

/// Move mode relocates retained images: gone from the image folder,
/// present in the filter folder. Filtered images stay where they were.
#[test]
fn e2e_transfer_move_removes_retained_originals() {
    let dir = stage_flight(&six_images(), &flight_config_json("move"));
    let outcome = pipeline::run(&run_opts(dir.path()), &AppConfig::default()).unwrap();

    assert_eq!(outcome.transferred, 4);

    let images = dir.path().join("images");
    let retained_dir = dir.path().join("retained");
    for name in ["IMG_0001.JPG", "IMG_0002.JPG", "IMG_0004.JPG", "IMG_0006.JPG"] {
        assert!(!images.join(name).exists(), "{name} should have moved out");
        assert!(retained_dir.join(name).is_file(), "{name} should have moved in");
    }
    for name in ["IMG_0003.JPG", "IMG_0005.JPG"] {
        assert!(images.join(name).is_file(), "filtered {name} must not move");
    }
}

/// A --transfer override from the CLI beats the mode in geofilter.json.
#[test]
fn e2e_transfer_override_beats_flight_config() {
    let dir = stage_flight(&six_images(), &flight_config_json("none"));
    let mut options = run_opts(dir.path());
    options.transfer_override = Some(TransferMode::Copy);

    let outcome = pipeline::run(&options, &AppConfig::default()).unwrap();
    assert_eq!(outcome.flight.transfer, TransferMode::Copy);
    assert_eq!(outcome.transferred, 4);
    assert!(dir.path().join("retained").join("IMG_0001.JPG").is_file());
}

// =============================================================================
// Fatal preconditions
// =============================================================================

/// No geofilter.json in the flight root or working directory is fatal,
/// and the error names both searched locations.
#[test]
fn e2e_missing_flight_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("flight.log"), fixture_log_text()).unwrap();

    let err = pipeline::run(&run_opts(dir.path()), &AppConfig::default()).unwrap_err();
    match err {
        GeofilterError::Config(ConfigError::FlightConfigNotFound { searched }) => {
            assert_eq!(searched.len(), 2, "flight root and cwd are searched");
            assert!(searched[0].starts_with(dir.path()));
        }
        other => panic!("expected FlightConfigNotFound, got {other:?}"),
    }
}

/// Five images against six CAM records must abort before anything is
/// classified; positional pairing cannot survive a count mismatch.
#[test]
fn e2e_image_record_count_mismatch_is_fatal() {
    let five = &six_images()[..5];
    let dir = stage_flight(five, &flight_config_json("none"));

    let err = pipeline::run(&run_opts(dir.path()), &AppConfig::default()).unwrap_err();
    match err {
        GeofilterError::Correlate(CorrelateError::CountMismatch {
            images,
            records,
            tag,
        }) => {
            assert_eq!(images, 5);
            assert_eq!(records, 6);
            assert_eq!(tag, "CAM");
        }
        other => panic!("expected CountMismatch, got {other:?}"),
    }
}

/// An empty coords list cannot form a box and is rejected up front.
#[test]
fn e2e_empty_boundary_is_fatal() {
    let config = r#"{
        "coords": [],
        "log-file": "flight.log",
        "image-folder": "images",
        "image-filter-folder": "retained"
    }"#;
    let dir = stage_flight(&six_images(), config);

    let err = pipeline::run(&run_opts(dir.path()), &AppConfig::default()).unwrap_err();
    assert!(
        matches!(err, GeofilterError::Bounds(_)),
        "expected a boundary error, got {err:?}"
    );
}

/// An empty image folder is fatal: there is nothing to pair.
#[test]
fn e2e_empty_image_folder_is_fatal() {
    let dir = stage_flight(&[], &flight_config_json("none"));

    let err = pipeline::run(&run_opts(dir.path()), &AppConfig::default()).unwrap_err();
    assert!(
        matches!(err, GeofilterError::Discovery(_)),
        "expected a discovery error, got {err:?}"
    );
}

// =============================================================================
// Fixture log through the core directly
// =============================================================================

/// Scanning the fixture retains only the recognised lines and counts
/// them per tag; FMT, PARM, MODE, ATT and BARO noise is dropped.
#[test]
fn e2e_fixture_scan_counts_recognised_tags() {
    let text = fixture_log_text();
    let scan = filter::scan_log(&text, &["CAM", "GPS"]);

    assert_eq!(scan.lines.len(), 13, "6 CAM lines plus 7 GPS lines");
    assert_eq!(scan.count_for("CAM"), 6);
    assert_eq!(scan.count_for("GPS"), 7);
}

/// Every CAM line in the fixture parses into a record with plausible
/// coordinates.
#[test]
fn e2e_fixture_cam_records_parse_cleanly() {
    let text = fixture_log_text();
    let scan = filter::scan_log(&text, &["CAM", "GPS"]);
    let cam_lines = filter::lines_with_tag(&scan.lines, "CAM");
    let records = record::parse_records(&cam_lines, &RecordSchema::cam()).unwrap();

    assert_eq!(records.len(), 6);
    for rec in &records {
        assert!(
            (51.52..51.53).contains(&rec.lat),
            "fixture latitudes sit around 51.52, got {}",
            rec.lat
        );
        assert!(
            (-0.15..-0.13).contains(&rec.lon),
            "fixture longitudes sit around -0.14, got {}",
            rec.lon
        );
        assert!(rec.captured_at.is_some());
    }
}

// =============================================================================
// Exports
// =============================================================================

/// The marker CSV written to disk carries a header plus one 7-decimal row
/// per classified pair, retained and filtered alike.
#[test]
fn e2e_marker_csv_written_to_disk() {
    let dir = stage_flight(&six_images(), &flight_config_json("none"));
    let outcome = pipeline::run(&run_opts(dir.path()), &AppConfig::default()).unwrap();

    let csv_path = dir.path().join("markers.csv");
    let file = fs::File::create(&csv_path).unwrap();
    let written = export::export_markers_csv(
        &outcome.report.classifications,
        file,
        &csv_path,
        &MarkerStyle::default(),
    )
    .unwrap();
    assert_eq!(written, 6);

    let content = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 7, "header plus six marker rows");
    assert_eq!(lines[0], "latitude,longitude,name,colour");
    assert_eq!(lines[1], "51.5223127,-0.1412340,rock,FFFF00");
    assert!(
        lines.iter().skip(1).all(|l| l.ends_with("rock,FFFF00")),
        "every row carries the default marker style"
    );
}

/// The JSON report round-trips: bounds, per-pair decisions and totals all
/// land in the document with stamped metadata.
#[test]
fn e2e_json_report_round_trips() {
    let dir = stage_flight(&six_images(), &flight_config_json("none"));
    let outcome = pipeline::run(&run_opts(dir.path()), &AppConfig::default()).unwrap();

    let mut buffer = Vec::new();
    let json_path = dir.path().join("report.json");
    export::export_report_json(&outcome.report, &mut buffer, &json_path).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
    assert!(value["generated_at"].is_string());
    assert!(
        value["generator"]
            .as_str()
            .unwrap()
            .starts_with("geofilter"),
        "generator field names the tool"
    );
    assert_eq!(value["bounds"]["lat_min"], 51.5210);
    assert_eq!(value["summary"]["image_count"], 6);
    assert_eq!(value["summary"]["retained"], 4);
    assert_eq!(value["summary"]["filtered"], 2);

    let classifications = value["classifications"].as_array().unwrap();
    assert_eq!(classifications.len(), 6);
    assert_eq!(classifications[0]["retained"], true);
    assert_eq!(classifications[2]["retained"], false);
    assert_eq!(classifications[4]["retained"], false);
}

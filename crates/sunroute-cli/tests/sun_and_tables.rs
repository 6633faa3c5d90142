//! Integration tests for the `sun` and `tables` subcommands.
//!
//! Neither command reads the street graph, so no dataset is configured.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn cli(subcommand: &str, time: &str) -> Command {
    let mut cmd = Command::cargo_bin("sunroute-cli").expect("binary exists");
    cmd.env("RUST_LOG", "warn").args([
        subcommand,
        "--date",
        "2023-12-21",
        "--time",
        time,
        "--lat",
        "33.59",
        "--lon",
        "130.40",
    ]);
    cmd
}

#[test]
fn sun_reports_low_southern_noon_sun() {
    let output = cli("sun", "12:00")
        .args(["--format", "json"])
        .output()
        .expect("command runs");
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let altitude = value["altitude_deg"].as_f64().expect("altitude");
    let azimuth = value["azimuth_deg"].as_f64().expect("azimuth");
    assert!((altitude - 32.97).abs() < 1.0, "altitude {altitude}");
    assert!((azimuth - 180.0).abs() < 10.0, "azimuth {azimuth}");
    assert_eq!(value["above_horizon"], true);
}

#[test]
fn sun_text_mentions_horizon() {
    cli("sun", "23:00")
        .assert()
        .success()
        .stdout(predicate::str::contains("below the horizon"));
}

#[test]
fn sun_accepts_southern_hemisphere() {
    Command::cargo_bin("sunroute-cli")
        .expect("binary exists")
        .args([
            "sun", "--date", "2024-06-21", "--time", "12:00", "--lat", "-33.87", "--lon",
            "151.21",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("above the horizon"));
}

#[test]
fn sun_rejects_geojson_format() {
    cli("sun", "12:00")
        .args(["--format", "geojson"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only available for the route command"));
}

#[test]
fn tables_print_one_row_per_bearing() {
    let output = cli("tables", "12:00")
        .args(["--format", "json"])
        .output()
        .expect("command runs");
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let rows = value.as_array().expect("array of rows");
    assert_eq!(rows.len(), 180);
    assert_eq!(rows[0]["bearing"], 0);
    assert_eq!(rows[179]["bearing"], 179);
    for row in rows {
        let exposure = row["exposure"].as_f64().expect("exposure");
        assert!((0.0..=1.0).contains(&exposure));
    }
}

#[test]
fn tables_can_be_written_as_csv() {
    let temp = tempdir().expect("temp dir");
    let path = temp.path().join("noon.csv");

    cli("tables", "12:00")
        .arg("--output")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let csv = fs::read_to_string(&path).expect("csv written");
    assert!(csv.starts_with("bearing,insolation,exposure\n"));
    assert_eq!(csv.lines().count(), 181);
}

#[test]
fn tables_at_night_print_advisory() {
    cli("tables", "23:00")
        .assert()
        .success()
        .stdout(predicate::str::contains("below the horizon"))
        .stdout(predicate::str::contains("bearing").not());
}

#[test]
fn invalid_date_fails() {
    Command::cargo_bin("sunroute-cli")
        .expect("binary exists")
        .args([
            "sun", "--date", "2023-02-30", "--time", "12:00", "--lat", "33.59", "--lon",
            "130.40",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

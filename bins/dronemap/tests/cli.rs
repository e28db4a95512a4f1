//! End-to-end tests for the dronemap binary. None of them touch the network.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Runs from an empty directory so no stray config file is picked up.
fn dronemap(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dronemap").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("DRONEMAP_CONFIG")
        .env_remove("DRONEMAP_OPERATOR_URL")
        .env_remove("DRONEMAP_GEOCODER_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    dronemap(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("measure"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("zones"));
}

#[test]
fn measure_reports_no_fly_zone() {
    let dir = TempDir::new().unwrap();
    dronemap(&dir)
        .arg("measure")
        .arg(fixture("ben_gurion.geojson"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Polygon information"))
        .stdout(predicate::str::contains("Ben Gurion Airport"));
}

#[test]
fn measure_json_for_clear_polygon() {
    let dir = TempDir::new().unwrap();
    let output = dronemap(&dir)
        .args(["--format", "json", "measure"])
        .arg(fixture("negev_field.geojson"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["no_fly_zones"], serde_json::json!([]));
    assert_eq!(json["coordinates"].as_array().unwrap().len(), 5);
    let area = json["area_m2"].as_f64().unwrap();
    // About 0.96 km x 1.11 km
    assert!(area > 1.0e6 && area < 1.1e6, "area {area}");
}

#[test]
fn measure_send_without_operator_logs_and_confirms() {
    let dir = TempDir::new().unwrap();
    dronemap(&dir)
        .arg("measure")
        .arg(fixture("negev_field.geojson"))
        .arg("--send")
        .assert()
        .success()
        .stdout(predicate::str::contains("Polygon information sent to the drone company!"));
}

#[test]
fn measure_send_json_reports_outcome() {
    let dir = TempDir::new().unwrap();
    let output = dronemap(&dir)
        .args(["-f", "json", "measure", "--send"])
        .arg(fixture("negev_field.geojson"))
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["dispatch"]["outcome"], "logged");
    assert_eq!(json["notices"][0], "Polygon information sent to the drone company!");
}

#[test]
fn quote_needs_a_no_fly_conflict() {
    let dir = TempDir::new().unwrap();
    dronemap(&dir)
        .arg("measure")
        .arg(fixture("negev_field.geojson"))
        .arg("--quote")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not intersect any no-fly zone"));

    dronemap(&dir)
        .arg("measure")
        .arg(fixture("ben_gurion.geojson"))
        .arg("--quote")
        .assert()
        .success()
        .stdout(predicate::str::contains("Calling the company for a price quote..."));
}

#[test]
fn hebrew_notices() {
    let dir = TempDir::new().unwrap();
    dronemap(&dir)
        .args(["--lang", "he", "measure", "--send"])
        .arg(fixture("negev_field.geojson"))
        .assert()
        .success()
        .stdout(predicate::str::contains("מידע על הפוליגון נשלח לחברת הרחפנים!"));
}

#[test]
fn measure_file_without_polygon_fails() {
    let dir = TempDir::new().unwrap();
    dronemap(&dir)
        .arg("measure")
        .arg(fixture("points.geojson"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to measure"));
}

#[test]
fn open_vector_overlay() {
    let dir = TempDir::new().unwrap();
    dronemap(&dir)
        .arg("open")
        .arg(fixture("points.geojson"))
        .assert()
        .success()
        .stdout(predicate::str::contains("2 features"))
        .stdout(predicate::str::contains("Overlay loaded"));
}

#[test]
fn open_json_snapshot() {
    let dir = TempDir::new().unwrap();
    let output = dronemap(&dir)
        .args(["--format", "json", "open"])
        .arg(fixture("points.geojson"))
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["vector_layer"]["feature_count"], 2);
    assert_eq!(json["vector_layer"]["bounds"]["north"], 31.3);
    assert!(json["view"]["zoom"].as_u64().unwrap() > 7);
    assert!(json["visible_tiles"].as_u64().unwrap() > 0);
}

#[test]
fn open_unsupported_file_fails() {
    let dir = TempDir::new().unwrap();
    dronemap(&dir)
        .arg("open")
        .arg(fixture("notes.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file type"));
}

#[test]
fn open_broken_geojson_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.geojson");
    std::fs::write(&path, "{\"type\": \"Feature\"").unwrap();
    dronemap(&dir)
        .arg("open")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error parsing GeoJSON file"));
}

#[test]
fn zones_lists_catalogue() {
    let dir = TempDir::new().unwrap();
    dronemap(&dir)
        .arg("zones")
        .assert()
        .success()
        .stdout(predicate::str::contains("6 zones"))
        .stdout(predicate::str::contains("Knesset"));
}

#[test]
fn zones_from_config_file() {
    let dir = TempDir::new().unwrap();
    let zones = dir.path().join("zones.geojson");
    std::fs::write(
        &zones,
        r#"{"type":"Feature","properties":{"name":"Test Range"},
            "geometry":{"type":"Polygon","coordinates":[[[34.5,30.5],[34.6,30.5],[34.6,30.6],[34.5,30.5]]]}}"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("dronemap.toml"),
        format!("[zones]\npath = {:?}\n", zones.display().to_string()),
    )
    .unwrap();

    let output = dronemap(&dir).args(["zones", "--format", "json"]).output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Test Range");

    dronemap(&dir)
        .arg("measure")
        .arg(fixture("negev_field.geojson"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Test Range"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    dronemap(&dir)
        .args(["--config", "nope.toml", "zones"])
        .assert()
        .failure();
}

#[test]
fn tile_for_default_center() {
    let dir = TempDir::new().unwrap();
    dronemap(&dir)
        .args(["tile", "--lat", "31.7683", "--lng", "35.2137"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7/76/52"))
        .stdout(predicate::str::contains("https://mt0.google.com/vt/lyrs=s&x=76&y=52&z=7"));
}

#[test]
fn tile_rejects_bad_input() {
    let dir = TempDir::new().unwrap();
    dronemap(&dir)
        .args(["tile", "--lat", "-95", "--lng", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid latitude/longitude"));

    dronemap(&dir)
        .args(["tile", "--lat", "31", "--lng", "35", "--zoom", "25"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds"));
}

#[test]
fn tile_rejects_config_beyond_tile_zoom_range() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("dronemap.toml"), "[map]\nmax_zoom = 40\nzoom = 35\n").unwrap();

    dronemap(&dir)
        .args(["tile", "--lat", "31.7683", "--lng", "35.2137"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("map.max_zoom"));
}

#[test]
fn blank_search_reports_no_results() {
    let dir = TempDir::new().unwrap();
    dronemap(&dir)
        .args(["search", " "])
        .assert()
        .success()
        .stderr(predicate::str::contains("No results found for this search."));
}

#[test]
fn metrics_flag_prints_counters() {
    let dir = TempDir::new().unwrap();
    dronemap(&dir)
        .args(["--metrics", "measure"])
        .arg(fixture("negev_field.geojson"))
        .assert()
        .success()
        .stderr(predicate::str::contains("polygons_measured"));
}

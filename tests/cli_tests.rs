//! Binary-level CLI tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TRIP_JSON: &str = r#"{
  "trip": {
    "arrivalDate": "2025-12-08",
    "returnDate": "2025-12-12",
    "traveler": "Musti",
    "isoWeek": 50,
    "title": "Hamburg"
  },
  "receipts": [
    { "date": "2025-12-09", "category": "Fuel", "currency": "EUR", "exchangeRate": 1, "costEur": 55.0 },
    { "date": "2025-12-10", "category": "Hotel", "currency": "CHF", "exchangeRate": 0.937, "costEur": 120.55 }
  ]
}"#;

fn tripsheet() -> Command {
    Command::cargo_bin("tripsheet").unwrap()
}

fn write_trip_json(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("trip.json");
    std::fs::write(&path, TRIP_JSON).unwrap();
    path
}

#[test]
fn test_export_writes_default_filename() {
    let dir = TempDir::new().unwrap();
    let trip_json = write_trip_json(&dir);

    tripsheet()
        .arg("export")
        .arg(&trip_json)
        .assert()
        .success()
        .stdout(predicate::str::contains("Export Complete"));

    assert!(dir.path().join("Week50.xlsx").exists());
}

#[test]
fn test_export_explicit_output_path() {
    let dir = TempDir::new().unwrap();
    let trip_json = write_trip_json(&dir);
    let out = dir.path().join("custom.xlsx");

    tripsheet()
        .arg("export")
        .arg(&trip_json)
        .arg(&out)
        .assert()
        .success();

    assert!(out.exists());
}

#[test]
fn test_export_missing_input_fails() {
    tripsheet()
        .arg("export")
        .arg("/nonexistent/trip.json")
        .assert()
        .failure();
}

#[test]
fn test_import_reports_count_and_writes_json() {
    let dir = TempDir::new().unwrap();
    let trip_json = write_trip_json(&dir);
    let xlsx = dir.path().join("Week50.xlsx");
    let out = dir.path().join("imported.json");

    tripsheet()
        .arg("export")
        .arg(&trip_json)
        .arg(&xlsx)
        .assert()
        .success();

    tripsheet()
        .arg("import")
        .arg(&xlsx)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 receipts imported"));

    let raw = std::fs::read_to_string(&out).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["importedCount"], 2);
    assert_eq!(parsed["trip"]["traveler"], "Musti");
    assert_eq!(parsed["receipts"][0]["category"], "Fuel");
}

#[test]
fn test_import_merges_into_prior_trip() {
    let dir = TempDir::new().unwrap();
    let trip_json = write_trip_json(&dir);
    let xlsx = dir.path().join("Week50.xlsx");
    let merged = dir.path().join("merged.json");

    tripsheet()
        .arg("export")
        .arg(&trip_json)
        .arg(&xlsx)
        .assert()
        .success();

    tripsheet()
        .arg("import")
        .arg(&xlsx)
        .arg("--trip")
        .arg(&trip_json)
        .arg("-o")
        .arg(&merged)
        .assert()
        .success();

    let raw = std::fs::read_to_string(&merged).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    // prior two receipts plus the two imported ones
    assert_eq!(parsed["receipts"].as_array().unwrap().len(), 4);
    assert_eq!(parsed["trip"]["isoWeek"], 50);
    assert_eq!(parsed["trip"]["title"], "Hamburg");
}

#[test]
fn test_import_sheet_without_header_fails() {
    let dir = TempDir::new().unwrap();
    let xlsx = dir.path().join("noise.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let ws = workbook.add_worksheet();
    ws.write_string(0, 0, "nothing to see here").unwrap();
    workbook.save(&xlsx).unwrap();

    tripsheet().arg("import").arg(&xlsx).assert().failure();
}

#[test]
fn test_summary_prints_category_totals() {
    let dir = TempDir::new().unwrap();
    let trip_json = write_trip_json(&dir);

    tripsheet()
        .arg("summary")
        .arg(&trip_json)
        .assert()
        .success()
        .stdout(predicate::str::contains("Hotel"))
        .stdout(predicate::str::contains("120.55"))
        .stdout(predicate::str::contains("175.55"));
}

#[test]
fn test_validate_accepts_consistent_trip() {
    let dir = TempDir::new().unwrap();
    let trip_json = write_trip_json(&dir);

    tripsheet()
        .arg("validate")
        .arg(&trip_json)
        .assert()
        .success();
}

#[test]
fn test_validate_rejects_stale_iso_week() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stale.json");
    std::fs::write(
        &path,
        r#"{
  "trip": {
    "arrivalDate": "2025-12-08",
    "returnDate": "2025-12-12",
    "traveler": "Musti",
    "isoWeek": 7
  },
  "receipts": []
}"#,
    )
    .unwrap();

    tripsheet()
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("does not match"));
}

#[test]
fn test_version_flag() {
    tripsheet()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tripsheet"));
}

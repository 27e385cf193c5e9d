//! CLI integration tests for datefile
//!
//! These tests exercise the binary end to end: naming files from dates,
//! decoding filenames, and scanning real (temporary) directories.

use predicates::prelude::*;
use std::fs::File;
use tempfile::TempDir;

/// Get a command instance for the datefile binary
fn datefile_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("datefile"))
}

/// Create a temporary directory populated with the given filenames
fn dir_with(names: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in names {
        File::create(dir.path().join(name)).unwrap();
    }
    dir
}

// =============================================================================
// Naming Tests
// =============================================================================

#[test]
fn test_name_computes_the_filename() {
    datefile_cmd()
        .args(["name", "daily_update_%Y-%m-%d.txt", "20230615"])
        .assert()
        .success()
        .stdout(predicate::str::contains("daily_update_2023-06-15.txt"));
}

#[test]
fn test_name_accepts_delimited_dates() {
    datefile_cmd()
        .args(["name", "update_%Y%m%d.log", "2023-06-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("update_20230615.log"));
}

#[test]
fn test_name_accepts_bracketed_templates() {
    datefile_cmd()
        .args(["name", "update_<%Y%m%d>.log", "2023-06-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("update_20230615.log"));
}

#[test]
fn test_name_json_output_includes_datetime() {
    let output = datefile_cmd()
        .args(["name", "update_%Y%m%d.log", "20230615", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["filename"], "update_20230615.log");
    assert_eq!(json["datetime"], "2023-06-15 00:00:00");
}

#[test]
fn test_name_rejects_bad_dates() {
    datefile_cmd()
        .args(["name", "update_%Y%m%d.log", "not-a-date"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("doesn't obviously start with a year"));
}

#[test]
fn test_name_rejects_bad_templates() {
    datefile_cmd()
        .args(["name", "update_%x.log", "20230615"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized field code"));
}

// =============================================================================
// Extraction and Matching Tests
// =============================================================================

#[test]
fn test_extract_recovers_the_date() {
    datefile_cmd()
        .args(["extract", "mydaemon_%Y_%m_%d_%H%M.log", "mydaemon_2023_06_15_1030.log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-06-15 10:30:00"));
}

#[test]
fn test_extract_fails_on_mismatch() {
    datefile_cmd()
        .args(["extract", "update_%Y%m%d.log", "other.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match"));
}

#[test]
fn test_match_succeeds_on_conforming_names() {
    datefile_cmd()
        .args(["match", "update_%Y%m%d.log", "update_20230615.log"])
        .assert()
        .success();
}

#[test]
fn test_match_fails_on_partial_matches() {
    datefile_cmd()
        .args(["match", "update_%Y%m%d.log", "update_20230615.log.bak"])
        .assert()
        .failure();
}

// =============================================================================
// Directory Tests
// =============================================================================

#[test]
fn test_list_is_sorted_and_filtered() {
    let dir = dir_with(&[
        "prefix_20230201.log",
        "prefix_20230101.log",
        "other.txt",
    ]);

    let output = datefile_cmd()
        .args(["list", "prefix_%Y%m%d.log"])
        .arg(dir.path())
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("prefix_20230101.log"));
    assert!(lines[1].ends_with("prefix_20230201.log"));
}

#[test]
fn test_list_since_keeps_later_files() {
    let dir = dir_with(&["prefix_20230101.log", "prefix_20230201.log"]);

    datefile_cmd()
        .args(["list", "prefix_%Y%m%d.log"])
        .arg(dir.path())
        .args(["--since", "20230115"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("prefix_20230201.log")
                .and(predicate::str::contains("prefix_20230101.log").not()),
        );
}

#[test]
fn test_list_first_and_last() {
    let dir = dir_with(&["prefix_20230101.log", "prefix_20230201.log"]);

    datefile_cmd()
        .args(["list", "prefix_%Y%m%d.log"])
        .arg(dir.path())
        .arg("--first")
        .assert()
        .success()
        .stdout(predicate::str::contains("prefix_20230101.log"));

    datefile_cmd()
        .args(["list", "prefix_%Y%m%d.log"])
        .arg(dir.path())
        .arg("--last")
        .assert()
        .success()
        .stdout(predicate::str::contains("prefix_20230201.log"));
}

#[test]
fn test_list_json_rows() {
    let dir = dir_with(&["prefix_20230101.log"]);

    let output = datefile_cmd()
        .args(["list", "prefix_%Y%m%d.log"])
        .arg(dir.path())
        .args(["--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["filename"], "prefix_20230101.log");
}

#[test]
fn test_list_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    datefile_cmd()
        .args(["list", "prefix_%Y%m%d.log"])
        .arg(dir.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_has_reflects_the_live_directory() {
    let dir = dir_with(&["prefix_20230101.log"]);

    datefile_cmd()
        .args(["has", "prefix_%Y%m%d.log"])
        .arg(dir.path())
        .arg("20230101")
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));

    datefile_cmd()
        .args(["has", "prefix_%Y%m%d.log"])
        .arg(dir.path())
        .arg("20230301")
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));
}

// =============================================================================
// Daily Range Tests
// =============================================================================

#[test]
fn test_daily_since_today_prints_one_name() {
    let today = chrono::Local::now().date_naive();
    let output = datefile_cmd()
        .args(["daily-since", "d_%Y%m%d.log"])
        .arg(today.format("%Y%m%d").to_string())
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec![format!("d_{}.log", today.format("%Y%m%d"))]);
}

#[test]
fn test_daily_since_two_days_back_prints_three_ascending_names() {
    let today = chrono::Local::now().date_naive();
    let start = today - chrono::Duration::days(2);
    let output = datefile_cmd()
        .args(["daily-since", "d_%Y%m%d.log"])
        .arg(start.format("%Y%m%d").to_string())
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
    assert_eq!(lines[2], format!("d_{}.log", today.format("%Y%m%d")));
}

#[test]
fn test_daily_since_skip_start_drops_the_first_day() {
    let today = chrono::Local::now().date_naive();
    let start = today - chrono::Duration::days(2);
    let output = datefile_cmd()
        .args(["daily-since", "d_%Y%m%d.log"])
        .arg(start.format("%Y%m%d").to_string())
        .arg("--skip-start")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    assert_eq!(stdout.lines().count(), 2);
    assert!(!stdout.contains(&format!("d_{}.log", start.format("%Y%m%d"))));
}

#[test]
fn test_daily_since_through_yesterday_drops_today() {
    let today = chrono::Local::now().date_naive();
    let start = today - chrono::Duration::days(2);
    let output = datefile_cmd()
        .args(["daily-since", "d_%Y%m%d.log"])
        .arg(start.format("%Y%m%d").to_string())
        .arg("--through-yesterday")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    assert_eq!(stdout.lines().count(), 2);
    assert!(!stdout.contains(&format!("d_{}.log", today.format("%Y%m%d"))));
}

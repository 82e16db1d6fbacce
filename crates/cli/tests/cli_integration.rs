//! CLI integration tests for the `roster` binary.
//!
//! Uses `assert_cmd` to spawn the binary and verify exit codes, stdout JSON
//! and stderr messages. No test talks to a real scheduling API: sources are
//! either a JSON file, the synthetic fallback, or deliberately missing.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper: a `roster` command with no ambient `ROSTER_*` settings.
fn roster() -> Command {
    let mut cmd = cargo_bin_cmd!("roster");
    for key in [
        "ROSTER_STORE",
        "ROSTER_SOURCE_URL",
        "ROSTER_SOURCE_API_KEY",
        "ROSTER_SOURCE_COMPANY_ID",
        "ROSTER_FETCH_TIMEOUT_SECS",
        "ROSTER_DEGRADED_MODE",
    ] {
        cmd.env_remove(key);
    }
    cmd.env("ROSTER_LOG", "warn");
    cmd
}

fn month_args(employee: &str) -> [&str; 6] {
    ["--employee", employee, "--year", "2024", "--month", "2"]
}

fn stdout_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout is JSON")
}

/// Write a source file with morning shifts on Feb 5..=9 2024.
fn write_source_file(dir: &Path) -> PathBuf {
    let shifts: Vec<_> = (5..=9)
        .map(|d| {
            serde_json::json!({
                "date": format!("2024-02-{:02}", d),
                "startTime": "07:00:00",
                "endTime": "15:00:00",
                "shiftType": "morning",
                "service": "Service A",
                "location": "Floor 1",
                "status": "confirmed",
                "octimeId": format!("OCT-SHIFT-2024-02-{:02}-e1", d)
            })
        })
        .collect();
    let path = dir.join("february.json");
    let body = serde_json::json!({"reference": "OCT-FEB-e1", "shifts": shifts});
    fs::write(&path, serde_json::to_string_pretty(&body).unwrap()).unwrap();
    path
}

// ──────────────────────────────────────────────
// 1. Help and usage
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    roster()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synchronize monthly staff rosters"));
}

#[test]
fn missing_employee_is_a_usage_error() {
    roster()
        .args(["sync", "--year", "2024", "--month", "2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--employee"));
}

#[test]
fn bad_degraded_mode_is_a_usage_error() {
    roster()
        .arg("sync")
        .args(month_args("e1"))
        .args(["--degraded", "sometimes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid degraded mode"));
}

// ──────────────────────────────────────────────
// 2. mock
// ──────────────────────────────────────────────

#[test]
fn mock_with_seed_is_reproducible() {
    let first = roster()
        .arg("mock")
        .args(month_args("e1"))
        .args(["--seed", "42"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let second = roster()
        .arg("mock")
        .args(month_args("e1"))
        .args(["--seed", "42"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(first, second);

    let json = stdout_json(&first);
    assert_eq!(json["shifts"].as_array().unwrap().len(), 29);
    assert_eq!(json["reference"], "OCT-20242-e1");
}

#[test]
fn mock_rejects_invalid_month() {
    roster()
        .args(["mock", "--employee", "e1", "--year", "2024", "--month", "13"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("month 13 is outside 1..=12"));
}

// ──────────────────────────────────────────────
// 3. sync
// ──────────────────────────────────────────────

#[test]
fn sync_without_source_fails_when_degraded_mode_is_off() {
    roster()
        .arg("sync")
        .args(month_args("e1"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no roster source URL configured"));
}

#[test]
fn sync_with_degraded_fallback_prints_result() {
    let output = roster()
        .arg("sync")
        .args(month_args("e1"))
        .args(["--degraded", "seeded:7"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);
    assert!(json["syncId"].as_str().unwrap().starts_with("sync_"));
    assert_eq!(json["roster"]["year"], 2024);
    assert_eq!(json["roster"]["month"], 2);
    assert_eq!(json["summary"]["totalShifts"], 29);
    assert_eq!(json["summary"]["created"], 29);
}

#[test]
fn sync_from_source_file_into_store_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let source = write_source_file(dir.path());
    let store = dir.path().join("rosters.json");

    let run = || {
        let output = roster()
            .arg("sync")
            .args(month_args("e1"))
            .arg("--source-file")
            .arg(&source)
            .arg("--store")
            .arg(&store)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        stdout_json(&output)
    };

    let first = run();
    assert_eq!(first["summary"]["created"], 29);
    assert!(store.exists());

    let second = run();
    assert_eq!(second["roster"]["id"], first["roster"]["id"]);
    assert_eq!(second["summary"]["unchanged"], 29);
    assert_eq!(second["summary"]["created"], 0);
}

#[test]
fn sync_reports_unreadable_source_file() {
    let dir = TempDir::new().unwrap();
    roster()
        .arg("sync")
        .args(month_args("e1"))
        .arg("--source-file")
        .arg(dir.path().join("absent.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read source file"));
}

#[test]
fn sync_reads_degraded_mode_from_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("roster.toml");
    fs::write(&config, "[sync]\ndegraded_mode = \"seeded:3\"\n").unwrap();

    roster()
        .arg("--config")
        .arg(&config)
        .arg("sync")
        .args(month_args("e1"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"totalShifts\": 29"));
}

#[test]
fn sync_reads_degraded_mode_from_environment() {
    roster()
        .env("ROSTER_DEGRADED_MODE", "random")
        .arg("sync")
        .args(month_args("e1"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"created\": 29"));
}

// ──────────────────────────────────────────────
// 4. show / upcoming / publish
// ──────────────────────────────────────────────

#[test]
fn show_syncs_empty_month_on_demand() {
    let dir = TempDir::new().unwrap();
    let source = write_source_file(dir.path());
    let store = dir.path().join("rosters.json");

    let output = roster()
        .arg("show")
        .args(month_args("e1"))
        .arg("--source-file")
        .arg(&source)
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);
    assert_eq!(json["roster"]["status"], "draft");
    assert_eq!(json["roster"]["external_reference"], "OCT-FEB-e1");
    let days = json["assignments"].as_array().unwrap();
    assert_eq!(days.len(), 29);
    assert_eq!(days[4]["date"], "2024-02-05");
    assert_eq!(days[4]["kind"], "morning");
    assert_eq!(days[0]["kind"], "rest");
}

#[test]
fn show_returns_empty_month_when_source_is_down() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("rosters.json");

    let output = roster()
        .arg("show")
        .args(month_args("e1"))
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);
    assert!(json["roster"].is_null());
    assert_eq!(json["assignments"], serde_json::json!([]));
}

#[test]
fn show_requires_a_store() {
    roster()
        .arg("show")
        .args(month_args("e1"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no store given"));
}

#[test]
fn upcoming_lists_next_working_days() {
    let dir = TempDir::new().unwrap();
    let source = write_source_file(dir.path());
    let store = dir.path().join("rosters.json");

    roster()
        .arg("sync")
        .args(month_args("e1"))
        .arg("--source-file")
        .arg(&source)
        .arg("--store")
        .arg(&store)
        .assert()
        .success();

    let output = roster()
        .args(["upcoming", "--employee", "e1", "--from", "2024-02-07", "--count", "10"])
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);
    let dates: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["date"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(dates, vec!["2024-02-07", "2024-02-08", "2024-02-09"]);
}

#[test]
fn upcoming_rejects_malformed_date() {
    roster()
        .args(["upcoming", "--employee", "e1", "--store", "x.json", "--from", "07/02/2024"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn publish_moves_draft_roster_once() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("rosters.json");

    let output = roster()
        .arg("sync")
        .args(month_args("e1"))
        .args(["--degraded", "seeded:1"])
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let roster_id = stdout_json(&output)["roster"]["id"].to_string();

    roster()
        .args(["publish", "--employee", "e1", "--roster-id", &roster_id])
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"published\""));

    roster()
        .args(["publish", "--employee", "e1", "--roster-id", &roster_id])
        .arg("--store")
        .arg(&store)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot move from published to published"));
}

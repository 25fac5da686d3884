//! CLI integration tests for `gstn report`.
//!
//! Uses `assert_cmd` to spawn the `gstn` binary against a local mock of the
//! filing-status service and verifies exit codes, stdout, stderr and the
//! written report.

mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use common::{fixture, start_mock_remote, workspace_root};

const HEADER: &str = "GSTN,FY,Tax Period,Mode of Filing,Date of Filing,Return Type,ARN,Status";

/// Helper: a `gstn` command rooted at the workspace with no inherited
/// `GSTN_*` overrides.
fn gstn() -> Command {
    let mut cmd = cargo_bin_cmd!("gstn");
    cmd.current_dir(workspace_root());
    cmd.env_remove("GSTN_API_URL")
        .env_remove("GSTN_FETCH_WORKERS")
        .env_remove("GSTN_EXPORT_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Run `gstn report` successfully and return the report path it printed.
fn report_path(stdout: &[u8]) -> PathBuf {
    let text = String::from_utf8_lossy(stdout);
    PathBuf::from(text.trim())
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    gstn()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Build GST filing-status reports from GSTIN lists",
        ));
}

#[test]
fn version_exits_0() {
    gstn()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gstn"));
}

// ──────────────────────────────────────────────
// 2. Successful reports
// ──────────────────────────────────────────────

#[test]
fn csv_report_keeps_resolved_gstins_and_drops_failures() {
    let remote = start_mock_remote();
    let out = TempDir::new().unwrap();

    let assert = gstn()
        .env("GSTN_API_URL", format!("{}/status", remote))
        .args(["report"])
        .arg(fixture("vendors.csv"))
        .args(["--month", "April", "--year", "2024", "--out"])
        .arg(out.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("2 GSTINs: 1 resolved, 1 failed"));

    let path = report_path(&assert.get_output().stdout);
    assert!(path.starts_with(out.path()), "{}", path.display());
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("filing_April_2024_") && name.ends_with(".csv"));

    let report = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(
        lines,
        vec![
            HEADER,
            "29ABCDE1234F1Z5,2024-2025,April,ONLINE,11-05-2024,GSTR1,AA290424123456X,Filed",
            "29ABCDE1234F1Z5,,April,,,GSTR3B,,No Record Found",
        ]
    );
}

#[test]
fn xlsx_report_reads_header_in_second_row() {
    let remote = start_mock_remote();
    let out = TempDir::new().unwrap();

    let assert = gstn()
        .env("GSTN_API_URL", format!("{}/status", remote))
        .arg("report")
        .arg(fixture("vendors.xlsx"))
        .args(["--month", "April", "--year", "2024", "--quiet", "--out"])
        .arg(out.path())
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    let report = fs::read_to_string(report_path(&assert.get_output().stdout)).unwrap();
    let gstins: Vec<&str> = report
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(
        gstins,
        vec![
            "07BBBBB1111B1Z1",
            "07BBBBB1111B1Z1",
            "27AAAAA0000A1Z5",
            "27AAAAA0000A1Z5"
        ]
    );
}

#[test]
fn month_without_filings_is_fully_synthesized() {
    let remote = start_mock_remote();
    let out = TempDir::new().unwrap();

    let assert = gstn()
        .env("GSTN_API_URL", format!("{}/status", remote))
        .arg("report")
        .arg(fixture("vendors.csv"))
        .args(["--month", "May", "--year", "2024", "--out"])
        .arg(out.path())
        .assert()
        .success();

    let report = fs::read_to_string(report_path(&assert.get_output().stdout)).unwrap();
    let lines: Vec<&str> = report.lines().skip(1).collect();
    assert_eq!(
        lines,
        vec![
            "29ABCDE1234F1Z5,,May,,,GSTR1,,No Record Found",
            "29ABCDE1234F1Z5,,May,,,GSTR3B,,No Record Found",
        ]
    );
}

#[test]
fn content_type_flag_overrides_extension() {
    let remote = start_mock_remote();
    let dir = TempDir::new().unwrap();
    let upload = dir.path().join("upload.bin");
    fs::write(&upload, "GSTN\n29ABCDE1234F1Z5\n").unwrap();

    gstn()
        .env("GSTN_API_URL", format!("{}/status", remote))
        .arg("report")
        .arg(&upload)
        .args(["--month", "April", "--year", "2024", "--content-type", "text/csv", "--out"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("1 GSTINs: 1 resolved, 0 failed"));
}

#[test]
fn config_file_supplies_url_and_export_dir() {
    let remote = start_mock_remote();
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("gstn.toml");
    fs::write(
        &config,
        format!(
            "[remote]\nurl = \"{}/status\"\n\n[fetch]\nworkers = 2\n\n[serve]\nexport_dir = {:?}\n",
            remote,
            dir.path().display().to_string()
        ),
    )
    .unwrap();

    let assert = gstn()
        .arg("--config")
        .arg(&config)
        .arg("report")
        .arg(fixture("vendors.csv"))
        .args(["--month", "April", "--year", "2024"])
        .assert()
        .success();

    let path = report_path(&assert.get_output().stdout);
    assert!(path.starts_with(dir.path()), "{}", path.display());
}

// ──────────────────────────────────────────────
// 3. Failures
// ──────────────────────────────────────────────

#[test]
fn unknown_month_is_an_invalid_period() {
    gstn()
        .arg("report")
        .arg(fixture("vendors.csv"))
        .args(["--month", "Smarch", "--year", "2024"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: invalid period"));
}

#[test]
fn missing_column_is_reported() {
    let dir = TempDir::new().unwrap();
    let upload = dir.path().join("people.csv");
    fs::write(&upload, "Name,City\nAcme,Pune\n").unwrap();

    gstn()
        .env("GSTN_API_URL", "http://127.0.0.1:1/status")
        .arg("report")
        .arg(&upload)
        .args(["--month", "April", "--year", "2024"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: no matching column"));
}

#[test]
fn upload_without_gstins_is_a_bad_file() {
    let dir = TempDir::new().unwrap();
    let upload = dir.path().join("blank.csv");
    fs::write(&upload, "Name,GSTN\nAcme,\nBeta,  \n").unwrap();

    gstn()
        .arg("report")
        .arg(&upload)
        .args(["--month", "April", "--year", "2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: bad file: no GSTINs found"));
}

#[test]
fn unsupported_extension_is_a_bad_file() {
    gstn()
        .arg("report")
        .arg("Cargo.toml")
        .args(["--month", "April", "--year", "2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: bad file"));
}

#[test]
fn missing_input_is_a_bad_file() {
    gstn()
        .arg("report")
        .arg("does/not/exist.csv")
        .args(["--month", "April", "--year", "2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: bad file: could not read"));
}

#[test]
fn missing_url_fails_at_lookup() {
    gstn()
        .arg("report")
        .arg(fixture("vendors.csv"))
        .args(["--month", "April", "--year", "2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no remote service URL configured"));
}

#[test]
fn invalid_worker_override_is_rejected() {
    gstn()
        .env("GSTN_FETCH_WORKERS", "lots")
        .arg("report")
        .arg(fixture("vendors.csv"))
        .args(["--month", "April", "--year", "2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: configuration"));
}

#[test]
fn slow_service_times_out() {
    let remote = start_mock_remote();
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("gstn.toml");
    fs::write(
        &config,
        format!("[remote]\nurl = \"{}/slow\"\n\n[fetch]\nwait_seconds = 1\n", remote),
    )
    .unwrap();

    gstn()
        .arg("--config")
        .arg(&config)
        .arg("report")
        .arg(fixture("vendors.csv"))
        .args(["--month", "April", "--year", "2024", "--out"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: remote timeout"));

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("filing_"))
        .collect();
    assert!(leftovers.is_empty());
}

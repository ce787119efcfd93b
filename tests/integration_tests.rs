//! Integration tests for the license-report CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const MANIFEST: &str = r#"
[[module]]
path = "golang.org/x/text"
version = "v0.3.0"
license = { spdx = "BSD-3-Clause", name = "BSD 3-Clause License" }

[[module]]
path = "github.com/x/y"
version = "v1.0.0"
license = { spdx = "MIT", name = "MIT License" }

[[module]]
path = "github.com/a/b"
version = "v0.2.0"
error = "not found"

[[module]]
path = "github.com/m/n"
version = ""
"#;

fn command(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("license-report").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("license-report").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve a results manifest"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("license-report").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("license-report"));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    let mut cmd = Command::cargo_bin("license-report").unwrap();
    cmd.arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_report_writes_sorted_csv() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("results.toml"), MANIFEST).unwrap();

    command(&temp_dir)
        .args(["report", "--input", "results.toml", "--output", "report.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to report.csv"));

    let report = fs::read_to_string(temp_dir.path().join("report.csv")).unwrap();
    assert_eq!(
        report,
        "github.com/a/b,v0.2.0,ERROR: not found\n\
         github.com/m/n,,\n\
         github.com/x/y,v1.0.0,MIT,,,MIT License\n\
         golang.org/x/text,v0.3.0,BSD-3-Clause,,,BSD 3-Clause License\n"
    );
}

#[test]
fn test_report_is_deterministic_across_worker_counts() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("results.toml"), MANIFEST).unwrap();

    for (jobs, name) in [("1", "one.csv"), ("8", "eight.csv")] {
        command(&temp_dir)
            .args(["-q", "report", "--input", "results.toml", "--output", name, "--jobs", jobs])
            .assert()
            .success();
    }

    assert_eq!(
        fs::read(temp_dir.path().join("one.csv")).unwrap(),
        fs::read(temp_dir.path().join("eight.csv")).unwrap()
    );
}

#[test]
fn test_report_header_and_config_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("results.toml"), MANIFEST).unwrap();
    fs::write(
        temp_dir.path().join("license-report.toml"),
        r#"
[report]
output = "from-config.csv"
header = true

[policy.override]
"github.com/a/b" = "Apache-2.0"
"#,
    )
    .unwrap();

    command(&temp_dir)
        .args(["-q", "report", "--input", "results.toml"])
        .assert()
        .success();

    let report = fs::read_to_string(temp_dir.path().join("from-config.csv")).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "Name,Version,License Type,Publisher,Description,Comment");
    assert_eq!(lines[1], "github.com/a/b,v0.2.0,Apache-2.0,,,Apache-2.0");
    assert_eq!(lines.len(), 5);
}

#[test]
fn test_report_rfc4180_quoting() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("results.json"),
        r#"{"module": [{"path": "example.com/q", "version": "v1", "error": "bad, input"}]}"#,
    )
    .unwrap();

    command(&temp_dir)
        .args(["-q", "report", "-i", "results.json", "-o", "q.csv", "--quoting", "rfc4180"])
        .assert()
        .success();

    let report = fs::read_to_string(temp_dir.path().join("q.csv")).unwrap();
    assert_eq!(report, "example.com/q,v1,\"ERROR: bad, input\"\n");
}

#[test]
fn test_unwritable_destination_exits_with_diagnostic() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("results.toml"), MANIFEST).unwrap();

    command(&temp_dir)
        .args(["-q", "report", "--input", "results.toml", "--output", "missing/dir/report.csv"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "File 'missing/dir/report.csv' does not exist or cannot be created",
        ));

    assert!(!temp_dir.path().join("missing").exists());
}

#[test]
fn test_missing_manifest_fails() {
    let temp_dir = TempDir::new().unwrap();

    command(&temp_dir)
        .args(["report", "--input", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Manifest not found"));
}

#[test]
fn test_config_show_and_validate() {
    let temp_dir = TempDir::new().unwrap();

    command(&temp_dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("licenses.csv"));

    command(&temp_dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

//! Tests for the `ccheck` binary.

#![allow(deprecated)] // Command::cargo_bin

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn ccheck() -> Command {
    let mut command = Command::cargo_bin("ccheck").expect("ccheck binary should exist");
    command.env_remove("RUST_LOG");
    command
}

fn source(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write source");
    path
}

// -----------------------------------------------------------
// check
// -----------------------------------------------------------

#[test]
fn check_clean_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = source(&dir, "ok.c", b"#include <stdio.h>\nint main() {\n    return 0;\n}\n");
    ccheck()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(":0: valid import"))
        .stdout(predicate::str::contains(":3: valid end of function"));
}

#[test]
fn check_reports_errors_and_logs_the_path() {
    let dir = TempDir::new().expect("temp dir");
    let path = source(&dir, "bad.c", b"#include <stdio.h>\n#include <stdio.h>\n");
    ccheck()
        .args(["-vv", "check"])
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains(":1: ERROR: import already declared"))
        .stderr(predicate::str::contains("read file"))
        .stderr(predicate::str::contains("file has errors"));
}

#[test]
fn void_return_flag() {
    let dir = TempDir::new().expect("temp dir");
    let path = source(&dir, "greet.c", b"void greet() {\n}\n");
    ccheck().arg("check").arg(&path).assert().success();
    ccheck()
        .args(["check", "--require-void-return"])
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            ":1: ERROR: Function ended without return statement",
        ));
}

#[test]
fn non_text_file_fails() {
    let dir = TempDir::new().expect("temp dir");
    let path = source(&dir, "bin.c", b"int x;\xff\n");
    ccheck()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid UTF-8"));
}

#[test]
fn missing_file_fails() {
    let dir = TempDir::new().expect("temp dir");
    ccheck()
        .arg("check")
        .arg(dir.path().join("absent.c"))
        .assert()
        .failure();
}

// -----------------------------------------------------------
// tokens
// -----------------------------------------------------------

#[test]
fn tokens_as_text() {
    let dir = TempDir::new().expect("temp dir");
    let path = source(&dir, "expr.c", b"a+b\n");
    ccheck()
        .arg("tokens")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(":0:0-1: identifier a"))
        .stdout(predicate::str::contains(":0:1-2: punctuation +"));
}

#[test]
fn tokens_as_json() {
    let dir = TempDir::new().expect("temp dir");
    let path = source(&dir, "expr.c", b"foo = 70 / 5\n");
    let output = ccheck()
        .args(["--format", "json", "tokens"])
        .arg(&path)
        .output()
        .expect("run ccheck");
    assert!(output.status.success());
    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let results = reports[0]["results"].as_array().expect("results");
    assert_eq!(results.len(), 5);
    assert_eq!(results[2]["kind"], "number");
    assert_eq!(results[2]["text"], "70");
}

#[test]
fn no_subcommand_is_a_usage_error() {
    ccheck().assert().failure().code(2);
}

//! Integration tests for basic CLI behavior.
//!
//! Tests that the binary exists, accepts standard flags, and each subcommand
//! responds to `--help` with appropriate text.

#![allow(deprecated)] // cargo_bin deprecation — replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `antmark` binary.
fn antmark() -> Command {
    Command::cargo_bin("antmark").expect("binary 'antmark' should be built")
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    antmark()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: antmark"))
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("frames"));
}

#[test]
fn version_flag_shows_version() {
    antmark()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_subcommand_fails() {
    antmark()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: antmark"));
}

#[test]
fn unknown_subcommand_fails() {
    antmark()
        .arg("export")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ─── Subcommand help ─────────────────────────────────────────────────────────

#[test]
fn convert_help() {
    antmark()
        .args(["convert", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("version 3"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("CarryingUnkown"));
}

#[test]
fn inspect_help() {
    antmark()
        .args(["inspect", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn frames_help() {
    antmark()
        .args(["frames", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--warm"));
}

#[test]
fn frames_rejects_missing_directory() {
    antmark()
        .args(["frames", "/definitely/not/a/frame/dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("frame directory"));
}

#[test]
fn frames_reports_range() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["clip_0005.jpg", "clip_0006.jpg", "clip_0007.jpg"] {
        std::fs::write(dir.path().join(name), b"\xff\xd8\xff").unwrap();
    }

    antmark()
        .args(["frames", "--warm", "2"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Frames: 5-7 (3 images)"))
        .stdout(predicate::str::contains("Prefetched 2 frames"));
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! End-to-end tests against a fake `platformio` script.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Fake PlatformIO: behaviour depends on the environment name (5th argument).
const FAKE_PIO: &str = r#"#!/bin/sh
echo "$@" >> "$PIO_FAKE_LOG"
case "$5" in
  good*)
    echo "[SUCCESS] Took 4.20 seconds"
    exit 0
    ;;
  wrong*)
    echo "Connecting...."
    echo "A fatal error occurred: This chip is ESP32, not ESP8266. Wrong --chip argument?" >&2
    exit 2
    ;;
  broken)
    echo "Upload failed: timeout" >&2
    exit 3
    ;;
  silent)
    exit 4
    ;;
esac
exit 99
"#;

struct Fixture {
    dir: TempDir,
    pio: PathBuf,
    log: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let pio = dir.path().join("fake-platformio");
        fs::write(&pio, FAKE_PIO).unwrap();
        fs::set_permissions(&pio, fs::Permissions::from_mode(0o755)).unwrap();
        let log = dir.path().join("calls.log");
        Self { dir, pio, log }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("pioflash-upload").unwrap();
        cmd.env("PIO_FAKE_LOG", &self.log)
            .env("HOME", self.dir.path())
            .env_remove("PLATFORMIO_CMD")
            .arg("--no-progress")
            .arg("--platformio")
            .arg(&self.pio);
        cmd
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[test]
fn help_shows_usage() {
    let mut cmd = Command::cargo_bin("pioflash-upload").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--env"))
        .stdout(predicate::str::contains("--platformio"));
}

#[test]
fn env_flag_is_required() {
    let fx = Fixture::new();
    fx.command().assert().failure().code(2);
    assert!(fx.calls().is_empty());
}

#[test]
fn first_success_stops_immediately() {
    let fx = Fixture::new();
    fx.command()
        .args(["-e", "good", "-e", "good2"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains(
            "-> Trying upload with environment 'good'",
        ))
        .stdout(predicate::str::contains("[SUCCESS]"));

    assert_eq!(fx.calls(), vec!["run --target upload --environment good"]);
}

#[test]
fn mismatch_falls_back_to_next_environment() {
    let fx = Fixture::new();
    fx.command()
        .args(["-e", "wrong", "--env", "good"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains(
            "Environment 'wrong' failed due to chip mismatch, trying next option...",
        ))
        .stderr(predicate::str::contains("Wrong --chip argument"));

    assert_eq!(
        fx.calls(),
        vec![
            "run --target upload --environment wrong",
            "run --target upload --environment good",
        ]
    );
}

#[test]
fn all_mismatches_return_last_status() {
    let fx = Fixture::new();
    fx.command()
        .args(["-e", "wrong", "-e", "wrong2"])
        .assert()
        .code(2);

    assert_eq!(fx.calls().len(), 2);
}

#[test]
fn fatal_failure_stops_and_propagates_status() {
    let fx = Fixture::new();
    fx.command()
        .args(["-e", "broken", "-e", "good"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Upload failed: timeout"))
        .stdout(predicate::str::contains("chip mismatch").not());

    assert_eq!(fx.calls(), vec!["run --target upload --environment broken"]);
}

#[test]
fn silent_failure_is_not_retried() {
    let fx = Fixture::new();
    fx.command()
        .args(["-e", "silent", "-e", "good"])
        .assert()
        .code(4);

    assert_eq!(fx.calls().len(), 1);
}

#[test]
fn duplicate_environments_are_tried_once() {
    let fx = Fixture::new();
    fx.command()
        .args(["-e", "wrong", "-e", "wrong", "-e", "", "-e", "good"])
        .assert()
        .code(0);

    assert_eq!(
        fx.calls(),
        vec![
            "run --target upload --environment wrong",
            "run --target upload --environment good",
        ]
    );
}

#[test]
fn port_is_forwarded_to_every_attempt() {
    let fx = Fixture::new();
    fx.command()
        .args(["-e", "wrong", "-e", "good", "--port", "/dev/ttyUSB0"])
        .assert()
        .code(0);

    assert_eq!(
        fx.calls(),
        vec![
            "run --target upload --environment wrong --upload-port /dev/ttyUSB0",
            "run --target upload --environment good --upload-port /dev/ttyUSB0",
        ]
    );
}

#[test]
fn platformio_cmd_env_var_is_used() {
    let fx = Fixture::new();
    let mut cmd = Command::cargo_bin("pioflash-upload").unwrap();
    cmd.env("PIO_FAKE_LOG", &fx.log)
        .env("HOME", fx.dir.path())
        .env("PLATFORMIO_CMD", &fx.pio)
        .args(["--no-progress", "-e", "good"]);
    cmd.assert().code(0);

    assert_eq!(fx.calls().len(), 1);
}

#[test]
fn missing_executable_exits_with_one() {
    let fx = Fixture::new();
    let mut cmd = Command::cargo_bin("pioflash-upload").unwrap();
    cmd.env("HOME", fx.dir.path())
        .env("PATH", fx.dir.path())
        .env_remove("PLATFORMIO_CMD")
        .args(["--platformio", "/nonexistent/platformio", "-e", "good"]);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Could not locate the PlatformIO executable",
        ));

    assert!(fx.calls().is_empty());
}

#[test]
fn empty_environment_list_exits_with_one() {
    let fx = Fixture::new();
    fx.command()
        .args(["-e", ""])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No environments provided."));

    assert!(fx.calls().is_empty());
}

#[test]
fn closed_stdout_is_reported_not_panicked() {
    let fx = Fixture::new();
    let (reader, writer) = nix::unistd::pipe().unwrap();
    drop(reader);

    fx.command()
        .args(["-e", "good"])
        .stdout(Stdio::from(writer))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("panicked").not());
}

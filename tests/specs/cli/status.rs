// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::common::*;

#[test]
fn fresh_state_reports_an_idle_queue() {
    let state = TempDir::new().unwrap();

    courier_in(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("pending:   0"))
        .stdout(predicate::str::contains("syncing:   no"))
        .stdout(predicate::str::contains("last sync: never"));
}

#[test]
fn status_counts_queued_mutations() {
    let state = TempDir::new().unwrap();
    queue_incident(&state);
    queue_incident(&state);

    courier_in(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("pending:   2"));
}

#[test]
fn status_defaults_to_optimistic_online() {
    let state = TempDir::new().unwrap();

    // No probe requested: the missing platform signal reads as online.
    courier_in(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("online:    yes"));
}

#[test]
fn status_probe_detects_the_unreachable_remote() {
    let state = TempDir::new().unwrap();

    courier_in(&state)
        .args(["status", "--probe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("online:    no"));
}

#[test]
fn json_status_has_the_facade_shape() {
    let state = TempDir::new().unwrap();
    queue_incident(&state);

    let output = courier_in(&state).args(["status", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(status["is_online"], true);
    assert_eq!(status["is_syncing"], false);
    assert_eq!(status["pending"], 1);
    assert!(status["last_sync"].is_null());
}

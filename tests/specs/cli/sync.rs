// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::common::*;

#[test]
fn sync_with_an_empty_queue_is_a_noop() {
    let state = TempDir::new().unwrap();

    courier_in(&state)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("queue empty"));
}

#[test]
fn failed_delivery_consumes_one_retry() {
    let state = TempDir::new().unwrap();
    queue_incident(&state);

    // Optimistic sync against the dead port: the attempt fails fast.
    courier_in(&state)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 of 1 mutations still pending"));

    let pending = pending_json(&state);
    assert_eq!(pending.as_array().unwrap()[0]["retry_count"], 1);
}

#[test]
fn retries_accumulate_across_passes() {
    let state = TempDir::new().unwrap();
    queue_incident(&state);

    courier_in(&state).arg("sync").assert().success();
    let pending = pending_json(&state);
    assert_eq!(pending.as_array().unwrap()[0]["retry_count"], 1);

    courier_in(&state).arg("sync").assert().success();
    let pending = pending_json(&state);
    assert_eq!(pending.as_array().unwrap()[0]["retry_count"], 2);
}

#[test]
fn record_is_evicted_after_the_final_attempt() {
    let state = TempDir::new().unwrap();
    queue_incident(&state);

    courier_in(&state).arg("sync").assert().success();
    courier_in(&state).arg("sync").assert().success();
    courier_in(&state)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("dropped"));

    let pending = pending_json(&state);
    assert!(pending.as_array().unwrap().is_empty());

    // Nothing left: a fourth pass has nothing to attempt.
    courier_in(&state)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("queue empty"));
}

#[test]
fn sync_updates_the_last_sync_time() {
    let state = TempDir::new().unwrap();
    queue_incident(&state);

    courier_in(&state).arg("sync").assert().success();

    courier_in(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("last sync: 2"));
}

#[test]
fn probe_skips_the_pass_when_unreachable() {
    let state = TempDir::new().unwrap();
    queue_incident(&state);

    courier_in(&state)
        .args(["sync", "--probe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("remote unreachable, sync skipped"));

    // No attempt was made, so no retry was consumed.
    let pending = pending_json(&state);
    assert_eq!(pending.as_array().unwrap()[0]["retry_count"], 0);
}

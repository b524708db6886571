// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::common::*;

#[test]
fn empty_queue_says_so() {
    let state = TempDir::new().unwrap();

    courier_in(&state)
        .arg("pending")
        .assert()
        .success()
        .stdout(predicate::str::contains("no pending mutations"));
}

#[test]
fn text_output_lists_id_entity_action_and_retries() {
    let state = TempDir::new().unwrap();
    courier_in(&state)
        .args(["queue", "document", "delete", "--target", "doc-3"])
        .assert()
        .success();

    courier_in(&state)
        .arg("pending")
        .assert()
        .success()
        .stdout(predicate::str::contains("document"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("doc-3"))
        .stdout(predicate::str::contains("retries=0"));
}

#[test]
fn queue_survives_process_restarts() {
    let state = TempDir::new().unwrap();

    // Each invocation is a separate process over the same state dir.
    queue_incident(&state);
    let first = pending_json(&state);
    assert_eq!(first.as_array().unwrap().len(), 1);

    queue_incident(&state);
    let second = pending_json(&state);
    let records = second.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], first.as_array().unwrap()[0]["id"]);
}

#[test]
fn json_output_carries_the_full_record() {
    let state = TempDir::new().unwrap();
    queue_incident(&state);

    let pending = pending_json(&state);
    let record = &pending.as_array().unwrap()[0];
    assert!(record["id"].is_string());
    assert!(record["enqueued_at"].is_string());
    assert_eq!(record["mutation"]["body"]["title"], "Spill");
}

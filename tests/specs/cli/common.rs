// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test files,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Loopback discard port with nothing listening: probes fail instantly
/// and every delivery attempt is refused.
pub const DEAD_URL: &str = "http://127.0.0.1:9";

pub fn courier() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("courier").unwrap()
}

/// Command pre-wired to an isolated state dir and an unreachable remote.
pub fn courier_in(state: &TempDir) -> Command {
    let mut cmd = courier();
    cmd.env("COURIER_STATE_DIR", state.path())
        .env("COURIER_REMOTE_URL", DEAD_URL)
        .env("COURIER_CONFIG", state.path().join("no-config.toml"))
        .env_remove("COURIER_TOKEN");
    cmd
}

/// Queues one incident-create mutation in the given state dir.
pub fn queue_incident(state: &TempDir) {
    courier_in(state)
        .args(["queue", "incident", "create", "--body", r#"{"title":"Spill"}"#])
        .assert()
        .success();
}

/// Parses the `pending --format json` output for the given state dir.
pub fn pending_json(state: &TempDir) -> serde_json::Value {
    let output = courier_in(state).args(["pending", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fakes and helpers for engine and service tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use serde_json::json;

use crate::engine::{EngineOptions, SyncEngine};
use crate::net::Connectivity;
use crate::record::{Entity, Mutation, MutationRecord};
use crate::store::MemoryStore;
use crate::transport::{Transport, TransportError, TransportResult};

/// Transport fake that records attempt order and fails on command.
///
/// Clones share state, so a test can keep a handle on the transport it
/// hands to an engine.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<RecordingInner>,
}

#[derive(Default)]
struct RecordingInner {
    attempts: Mutex<Vec<String>>,
    fail_all: AtomicBool,
    fail_ids: Mutex<HashSet<String>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        RecordingTransport::default()
    }

    /// Makes every delivery fail from now on.
    pub fn fail_everything(&self) {
        self.inner.fail_all.store(true, AtomicOrdering::SeqCst);
    }

    /// Makes deliveries of the given record fail from now on.
    pub fn fail_id(&self, id: &str) {
        self.inner.fail_ids.lock().unwrap().insert(id.to_string());
    }

    /// All attempted record ids, in attempt order.
    pub fn attempts(&self) -> Vec<String> {
        self.inner.attempts.lock().unwrap().clone()
    }

    /// How many times the given record was attempted.
    pub fn attempt_count(&self, id: &str) -> usize {
        self.inner.attempts.lock().unwrap().iter().filter(|a| *a == id).count()
    }
}

impl Transport for RecordingTransport {
    fn deliver(&self, record: &MutationRecord) -> TransportResult<()> {
        self.inner.attempts.lock().unwrap().push(record.id.clone());
        let fail = self.inner.fail_all.load(AtomicOrdering::SeqCst)
            || self.inner.fail_ids.lock().unwrap().contains(&record.id);
        if fail {
            Err(TransportError::Network("scripted failure".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Transport fake that parks deliveries until released, for exercising
/// the single-flight guard from a second thread.
#[derive(Clone, Default)]
pub struct GateTransport {
    inner: Arc<GateInner>,
}

#[derive(Default)]
struct GateInner {
    state: Mutex<GateState>,
    cond: Condvar,
}

#[derive(Default)]
struct GateState {
    entered: usize,
    released: bool,
}

impl GateTransport {
    pub fn new() -> Self {
        GateTransport::default()
    }

    /// Blocks until a delivery attempt has entered the gate.
    pub fn wait_until_entered(&self) {
        let mut state = self.inner.state.lock().unwrap();
        while state.entered == 0 {
            state = self.inner.cond.wait(state).unwrap();
        }
    }

    /// Lets parked deliveries complete.
    pub fn release(&self) {
        let mut state = self.inner.state.lock().unwrap();
        state.released = true;
        self.inner.cond.notify_all();
    }

    /// How many deliveries entered the gate.
    pub fn entered_count(&self) -> usize {
        self.inner.state.lock().unwrap().entered
    }
}

impl Transport for GateTransport {
    fn deliver(&self, _record: &MutationRecord) -> TransportResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        state.entered += 1;
        self.inner.cond.notify_all();
        while !state.released {
            state = self.inner.cond.wait(state).unwrap();
        }
        Ok(())
    }
}

/// A mutation creating a small incident document.
pub fn incident_create(title: &str) -> (Entity, Mutation) {
    (Entity::Incident, Mutation::create(json!({ "title": title })))
}

/// A mutation updating a report by remote id.
pub fn report_update(id: &str) -> (Entity, Mutation) {
    (Entity::Report, Mutation::update(id, json!({ "status": "closed" })))
}

/// Engine over shared fakes, plus handles to every collaborator.
pub fn test_engine(
    max_attempts: u32,
) -> (
    SyncEngine<RecordingTransport, MemoryStore>,
    RecordingTransport,
    MemoryStore,
    Arc<Connectivity>,
) {
    let transport = RecordingTransport::new();
    let store = MemoryStore::new();
    let connectivity = Connectivity::new();
    let engine = SyncEngine::new(
        store.clone(),
        transport.clone(),
        Arc::clone(&connectivity),
        EngineOptions { max_attempts },
    );
    (engine, transport, store, connectivity)
}

/// Polls a condition for up to two seconds before failing the test.
pub fn wait_for(what: &str, mut cond: impl FnMut() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("timed out waiting for {what}");
}

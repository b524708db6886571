// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The synchronization engine: drains the queue against a transport.
//!
//! One pass walks a snapshot of the queue in FIFO order and gives every
//! record exactly one delivery attempt. Success removes the record;
//! failure consumes one retry, evicting the record once it reaches the
//! attempt ceiling. The queue is written back after every individual
//! outcome, so a crash mid-pass loses at most one record's transition.
//!
//! Passes never run concurrently: the in-flight flag is checked-and-set
//! in a single atomic step and held by an RAII guard, so it clears even
//! if a delivery attempt unwinds.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::clock::Stamper;
use crate::net::Connectivity;
use crate::record::{Entity, Mutation, MutationRecord};
use crate::store::QueueStore;
use crate::transport::Transport;

/// Tunables for the engine.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Total delivery attempts per record before eviction.
    pub max_attempts: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions { max_attempts: 3 }
    }
}

/// Queue plus its persistence backend, guarded by one lock so every
/// mutation is written back before the lock is released.
struct QueueState<S: QueueStore> {
    records: Vec<MutationRecord>,
    store: S,
}

impl<S: QueueStore> QueueState<S> {
    /// Writes the queue back. Save failures are logged, not propagated:
    /// the in-memory queue stays authoritative until the next save lands.
    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.records) {
            tracing::warn!("failed to persist queue: {e}");
        }
    }

    fn remove(&mut self, id: &str) {
        self.records.retain(|r| r.id != id);
    }
}

/// Offline mutation queue with drain-once synchronization.
///
/// Both dependencies are injected, so tests can substitute fakes and
/// multiple engines can coexist over separate stores.
pub struct SyncEngine<T: Transport, S: QueueStore> {
    state: Mutex<QueueState<S>>,
    transport: T,
    connectivity: Arc<Connectivity>,
    stamper: Stamper,
    in_flight: AtomicBool,
    last_sync: Mutex<Option<DateTime<Utc>>>,
    max_attempts: u32,
}

impl<T: Transport, S: QueueStore> SyncEngine<T, S> {
    /// Creates an engine over the given store and transport, restoring
    /// any queue persisted by a previous session.
    pub fn new(
        mut store: S,
        transport: T,
        connectivity: Arc<Connectivity>,
        options: EngineOptions,
    ) -> Self {
        let stored = store.load();
        if !stored.records.is_empty() {
            tracing::debug!(count = stored.records.len(), "restored pending mutations");
        }
        SyncEngine {
            state: Mutex::new(QueueState { records: stored.records, store }),
            transport,
            connectivity,
            stamper: Stamper::new(),
            in_flight: AtomicBool::new(false),
            last_sync: Mutex::new(stored.last_sync),
            max_attempts: options.max_attempts,
        }
    }

    /// Queues a mutation and returns its assigned id.
    ///
    /// Always succeeds from the caller's point of view: the record is
    /// accepted into the queue, and persistence trouble surfaces in logs
    /// rather than here. Does not wait on delivery.
    pub fn enqueue(&self, entity: Entity, mutation: Mutation) -> String {
        let stamp = self.stamper.next();
        let record = MutationRecord {
            id: stamp.id.clone(),
            entity,
            mutation,
            enqueued_at: stamp.at,
            retry_count: 0,
        };
        let mut state = self.lock_state();
        state.records.push(record);
        state.persist();
        tracing::debug!(id = %stamp.id, entity = %entity, "mutation queued");
        stamp.id
    }

    /// Runs one drain pass over the queue.
    ///
    /// Returns `false` without touching the queue when offline, when a
    /// pass is already running, or when there is nothing to deliver.
    /// Otherwise attempts every record queued at the start of the pass
    /// exactly once, in enqueue order, and returns whether all of them
    /// were delivered. Records queued mid-pass wait for the next trigger.
    pub fn process_queue(&self) -> bool {
        if !self.connectivity.is_online() {
            return false;
        }
        if self
            .in_flight
            .compare_exchange(false, true, AtomicOrdering::SeqCst, AtomicOrdering::SeqCst)
            .is_err()
        {
            return false;
        }
        let _guard = InFlightGuard { flag: &self.in_flight };

        let pass: Vec<String> = self.lock_state().records.iter().map(|r| r.id.clone()).collect();
        if pass.is_empty() {
            return false;
        }
        tracing::debug!(count = pass.len(), "sync pass started");

        let mut clean = true;
        for id in &pass {
            let Some(record) = self.lock_state().records.iter().find(|r| r.id == *id).cloned()
            else {
                continue;
            };
            match self.transport.deliver(&record) {
                Ok(()) => {
                    let mut state = self.lock_state();
                    state.remove(id);
                    state.persist();
                    tracing::debug!(%id, "mutation delivered");
                }
                Err(e) => {
                    clean = false;
                    let mut state = self.lock_state();
                    if let Some(rec) = state.records.iter_mut().find(|r| r.id == *id) {
                        rec.retry_count += 1;
                        let attempts = rec.retry_count;
                        if attempts >= self.max_attempts {
                            tracing::warn!(
                                %id,
                                entity = %record.entity,
                                attempts,
                                error = %e,
                                "dropping mutation after final attempt"
                            );
                            state.remove(id);
                        } else {
                            tracing::debug!(%id, attempts, error = %e, "delivery failed, will retry");
                        }
                    }
                    state.persist();
                }
            }
        }

        let completed = self.stamper.now();
        *self.last_sync.lock().unwrap_or_else(|e| e.into_inner()) = Some(completed);
        let mut state = self.lock_state();
        if let Err(e) = state.store.save_last_sync(completed) {
            tracing::warn!("failed to persist last-sync time: {e}");
        }
        clean
    }

    /// Number of records currently queued.
    pub fn pending_count(&self) -> usize {
        self.lock_state().records.len()
    }

    /// Snapshot of the queued records, in enqueue order.
    pub fn pending(&self) -> Vec<MutationRecord> {
        self.lock_state().records.clone()
    }

    /// When the last pass completed, if one has.
    pub fn last_sync_time(&self) -> Option<DateTime<Utc>> {
        *self.last_sync.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// True while a pass is running.
    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(AtomicOrdering::SeqCst)
    }

    /// The connectivity handle this engine consults before a pass.
    pub fn connectivity(&self) -> &Arc<Connectivity> {
        &self.connectivity
    }

    fn lock_state(&self) -> MutexGuard<'_, QueueState<S>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Clears the in-flight flag when a pass ends, even on unwind.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, AtomicOrdering::SeqCst);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

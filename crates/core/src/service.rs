// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Application-facing facade over the engine and connectivity state.
//!
//! One constructible service object owns the wiring between connectivity
//! transitions and automatic drain passes; everything else delegates to
//! the engine. Callers that need background syncing keep the service
//! alive for the life of the application; short-lived drivers can use
//! [`SyncService::manual_sync`] and never spawn a thread.

use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::SyncEngine;
use crate::net::Connectivity;
use crate::record::{Entity, Mutation, MutationRecord};
use crate::store::QueueStore;
use crate::transport::Transport;

/// Aggregated view of the sync subsystem for display surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    /// Current connectivity state.
    pub is_online: bool,
    /// True while a drain pass is running.
    pub is_syncing: bool,
    /// Number of queued mutations.
    pub pending: usize,
    /// When the last pass completed, if ever.
    pub last_sync: Option<DateTime<Utc>>,
}

/// The interface the rest of the application consumes.
pub struct SyncService<T: Transport, S: QueueStore> {
    engine: Arc<SyncEngine<T, S>>,
    connectivity: Arc<Connectivity>,
}

impl<T, S> SyncService<T, S>
where
    T: Transport + 'static,
    S: QueueStore + 'static,
{
    /// Wraps an engine, wiring the automatic reconnect trigger: an
    /// offline-to-online transition with pending work and no pass in
    /// flight starts exactly one background pass.
    pub fn new(engine: SyncEngine<T, S>) -> Self {
        let connectivity = Arc::clone(engine.connectivity());
        let engine = Arc::new(engine);
        let trigger = Arc::clone(&engine);
        connectivity.on_change(move |online| {
            if online && trigger.pending_count() > 0 && !trigger.is_syncing() {
                tracing::debug!("back online with pending work, starting sync pass");
                spawn_pass(&trigger);
            }
        });
        SyncService { engine, connectivity }
    }

    /// Queues a mutation; when online and idle this also starts a
    /// background pass. Returns the assigned id without waiting on
    /// delivery.
    pub fn queue_action(&self, entity: Entity, mutation: Mutation) -> String {
        let id = self.engine.enqueue(entity, mutation);
        if self.connectivity.is_online() && !self.engine.is_syncing() {
            spawn_pass(&self.engine);
        }
        id
    }

    /// Forces one pass, subject to the usual single-flight guard.
    ///
    /// An empty queue reports `true`: there is nothing left to reconcile.
    pub fn manual_sync(&self) -> bool {
        if self.engine.pending_count() == 0 {
            return true;
        }
        self.engine.process_queue()
    }

    /// Current aggregated state.
    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            is_online: self.connectivity.is_online(),
            is_syncing: self.engine.is_syncing(),
            pending: self.engine.pending_count(),
            last_sync: self.engine.last_sync_time(),
        }
    }

    /// Snapshot of the queued records, in enqueue order.
    pub fn pending(&self) -> Vec<MutationRecord> {
        self.engine.pending()
    }

    /// Connectivity handle, for attaching probes or monitors.
    pub fn connectivity(&self) -> &Arc<Connectivity> {
        &self.connectivity
    }

    /// The underlying engine.
    pub fn engine(&self) -> &Arc<SyncEngine<T, S>> {
        &self.engine
    }
}

fn spawn_pass<T, S>(engine: &Arc<SyncEngine<T, S>>)
where
    T: Transport + 'static,
    S: QueueStore + 'static,
{
    let engine = Arc::clone(engine);
    thread::spawn(move || {
        engine.process_queue();
    });
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

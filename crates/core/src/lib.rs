// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! courier-core: offline mutation queue and synchronization engine.
//!
//! Field work does not stop when the network does. courier records every
//! mutation the application makes as a [`MutationRecord`], keeps the
//! queue in durable local storage, and reconciles it with the remote
//! document API once connectivity returns: at-least-once, in enqueue
//! order, with a bounded number of attempts per record.
//!
//! # Main Components
//!
//! - [`SyncService`] - the facade the application consumes
//! - [`SyncEngine`] - drain-once queue processing with bounded retry
//! - [`QueueStore`] - durable queue persistence ([`SqliteStore`], [`MemoryStore`])
//! - [`Transport`] - delivery of one record ([`HttpTransport`])
//! - [`Connectivity`] - online state and transition notifications

pub mod clock;
pub mod engine;
pub mod error;
pub mod net;
pub mod record;
pub mod service;
pub mod store;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use clock::{ClockSource, Stamper, SystemClock};
pub use engine::{EngineOptions, SyncEngine};
pub use error::{Error, Result};
pub use net::{Connectivity, ConnectivityProbe, HttpProbe, Monitor};
pub use record::{Entity, Mutation, MutationRecord};
pub use service::{SyncService, SyncStatus};
pub use store::{MemoryStore, QueueStore, SqliteStore, StoredState};
pub use transport::{HttpTransport, Transport, TransportError};

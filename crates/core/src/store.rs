// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable storage for the pending-mutation queue.
//!
//! The queue is persisted as one serialized JSON array under a single
//! well-known key and rewritten in full on every mutation, so a crash
//! between operations loses at most the in-flight record's transition.
//! Loading is forgiving: missing or corrupt state degrades to an empty
//! queue with a warning rather than an error, because a client that
//! cannot read its backlog must still be able to accept new work.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::record::MutationRecord;

/// Storage key for the serialized queue.
pub const QUEUE_KEY: &str = "pending_mutations";

/// Storage key for the last completed sync pass.
pub const LAST_SYNC_KEY: &str = "last_sync";

/// SQL schema for the courier state database.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Queue state read back from a store at startup.
#[derive(Debug, Clone, Default)]
pub struct StoredState {
    /// Pending records, in enqueue order.
    pub records: Vec<MutationRecord>,
    /// When the last sync pass completed, if ever.
    pub last_sync: Option<DateTime<Utc>>,
}

/// Persistence backend for the mutation queue.
///
/// One queue per store instance. `load` never fails: unreadable state is
/// logged and treated as empty.
pub trait QueueStore: Send {
    /// Reads the persisted state.
    fn load(&mut self) -> StoredState;

    /// Atomically replaces the persisted queue with `records`.
    fn save(&mut self, records: &[MutationRecord]) -> Result<()>;

    /// Records when the last sync pass completed.
    fn save_last_sync(&mut self, at: DateTime<Utc>) -> Result<()>;
}

fn parse_queue(raw: Option<String>) -> Vec<MutationRecord> {
    match raw {
        Some(json) => match serde_json::from_str(&json) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("discarding corrupt queue state: {e}");
                Vec::new()
            }
        },
        None => Vec::new(),
    }
}

fn parse_last_sync(raw: Option<String>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match raw.parse::<DateTime<Utc>>() {
        Ok(at) => Some(at),
        Err(e) => {
            tracing::warn!("discarding corrupt last-sync state: {e}");
            None
        }
    }
}

/// SQLite-backed store: one key-value table, the queue under [`QUEUE_KEY`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the state database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore { conn })
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute("INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)", params![key, value])?;
        Ok(())
    }
}

impl QueueStore for SqliteStore {
    fn load(&mut self) -> StoredState {
        let records = match self.get(QUEUE_KEY) {
            Ok(raw) => parse_queue(raw),
            Err(e) => {
                tracing::warn!("failed to read queue state: {e}");
                Vec::new()
            }
        };
        let last_sync = match self.get(LAST_SYNC_KEY) {
            Ok(raw) => parse_last_sync(raw),
            Err(e) => {
                tracing::warn!("failed to read last-sync state: {e}");
                None
            }
        };
        StoredState { records, last_sync }
    }

    fn save(&mut self, records: &[MutationRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.put(QUEUE_KEY, &json)
    }

    fn save_last_sync(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.put(LAST_SYNC_KEY, &at.to_rfc3339())
    }
}

/// In-memory store holding the serialized snapshot.
///
/// Round-trips through the same serializer as the durable backend, so
/// tests exercise the real persistence path. Clones share state, which
/// lets a test keep a handle on a store it has handed to an engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    queue: Option<String>,
    last_sync: Option<String>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// The raw serialized queue, as a durable backend would persist it.
    pub fn raw_queue(&self) -> Option<String> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).queue.clone()
    }
}

impl QueueStore for MemoryStore {
    fn load(&mut self) -> StoredState {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        StoredState {
            records: parse_queue(inner.queue.clone()),
            last_sync: parse_last_sync(inner.last_sync.clone()),
        }
    }

    fn save(&mut self, records: &[MutationRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).queue = Some(json);
        Ok(())
    }

    fn save_last_sync(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).last_sync = Some(at.to_rfc3339());
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

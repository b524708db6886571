// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mutation records: the unit of queued work.
//!
//! Every change the application makes while offline is captured as a
//! [`MutationRecord`]: an intent to create, update or delete one document
//! in a remote collection. Records are designed to be:
//!
//! - Serializable: the whole queue round-trips through the store
//! - Self-routing: entity + action determine the remote call exactly
//! - Opaque in content: document bodies are untyped JSON owned by the caller
//!
//! The action is a sum type rather than a string tag so the transport's
//! verb/endpoint mapping is exhaustive and checked at compile time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Remote collection targeted by a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Entity {
    Incident,
    Document,
    CorrectiveAction,
    Report,
    User,
}

impl Entity {
    /// All known entities, in a stable order.
    pub const ALL: [Entity; 5] =
        [Entity::Incident, Entity::Document, Entity::CorrectiveAction, Entity::Report, Entity::User];

    /// REST collection path for this entity on the remote API.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Entity::Incident => "/api/incidents",
            Entity::Document => "/api/documents",
            Entity::CorrectiveAction => "/api/corrective-actions",
            Entity::Report => "/api/reports",
            Entity::User => "/api/users",
        }
    }

    /// The wire/CLI name of this entity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Incident => "incident",
            Entity::Document => "document",
            Entity::CorrectiveAction => "corrective-action",
            Entity::Report => "report",
            Entity::User => "user",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Entity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "incident" => Ok(Entity::Incident),
            "document" => Ok(Entity::Document),
            "corrective-action" => Ok(Entity::CorrectiveAction),
            "report" => Ok(Entity::Report),
            "user" => Ok(Entity::User),
            _ => Err(Error::InvalidEntity(s.to_string())),
        }
    }
}

/// The action carried by a queued mutation.
///
/// Update and delete address one remote document by id; create carries
/// only the new document's body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Mutation {
    /// Create a new document in the target collection.
    Create { body: Value },

    /// Replace the document with the given remote id.
    Update { id: String, body: Value },

    /// Delete the document with the given remote id.
    Delete { id: String },
}

impl Mutation {
    /// Creates a Create mutation.
    pub fn create(body: Value) -> Self {
        Mutation::Create { body }
    }

    /// Creates an Update mutation.
    pub fn update(id: impl Into<String>, body: Value) -> Self {
        Mutation::Update { id: id.into(), body }
    }

    /// Creates a Delete mutation.
    pub fn delete(id: impl Into<String>) -> Self {
        Mutation::Delete { id: id.into() }
    }

    /// The remote document id this mutation addresses, if any.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Mutation::Create { .. } => None,
            Mutation::Update { id, .. } | Mutation::Delete { id } => Some(id),
        }
    }

    /// The wire name of this action.
    pub fn action_name(&self) -> &'static str {
        match self {
            Mutation::Create { .. } => "create",
            Mutation::Update { .. } => "update",
            Mutation::Delete { .. } => "delete",
        }
    }
}

/// One queued intent to mutate a remote document.
///
/// Records are created by the engine's enqueue operation and mutated only
/// by the engine itself (retry count increments); they leave the queue
/// either by successful delivery or by retry-ceiling eviction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    /// Unique within the owning store's lifetime.
    pub id: String,
    /// Target collection.
    pub entity: Entity,
    /// The mutation to deliver.
    pub mutation: Mutation,
    /// When the record was queued. Non-decreasing within a session.
    pub enqueued_at: DateTime<Utc>,
    /// Failed delivery attempts so far. Never decreases.
    pub retry_count: u32,
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for courier-core operations.

use thiserror::Error;

/// All possible errors that can occur in courier-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "unknown entity: '{0}'\n  hint: valid entities are: incident, document, corrective-action, report, user"
    )]
    InvalidEntity(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for courier-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery of mutation records to the remote document API.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP delivery for production
//! - Fake transports for unit testing
//!
//! Routing is a pure function of the record's entity and action, built
//! from an exhaustive match: adding an entity or action fails to compile
//! until it is routed.

use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::record::{Mutation, MutationRecord};

/// Error type for delivery attempts.
///
/// The engine treats every variant identically: one consumed attempt.
/// The variants exist for logs, not for retry policy.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to reach the remote at all.
    #[error("network error: {0}")]
    Network(String),

    /// The remote answered with a non-success status.
    #[error("remote returned status {0}")]
    Status(u16),

    /// The HTTP client could not be constructed or the request was invalid.
    #[error("client error: {0}")]
    Client(String),
}

/// Result type for delivery attempts.
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport trait for delivering mutation records.
///
/// This trait abstracts over the actual delivery mechanism, allowing
/// for easy testing with fake implementations.
pub trait Transport: Send + Sync {
    /// Attempts to deliver one record. Any error counts as a failed attempt.
    fn deliver(&self, record: &MutationRecord) -> TransportResult<()>;
}

/// HTTP verb used for a routed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Post,
    Put,
    Delete,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        })
    }
}

/// A fully resolved remote call for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub verb: Verb,
    pub url: String,
    pub body: Option<Value>,
}

/// Maps a record onto its remote call.
///
/// Create posts to the collection; update and delete address one document
/// by its remote id.
pub fn route(base_url: &str, record: &MutationRecord) -> Route {
    let base = base_url.trim_end_matches('/');
    let endpoint = record.entity.endpoint();
    match &record.mutation {
        Mutation::Create { body } => Route {
            verb: Verb::Post,
            url: format!("{base}{endpoint}"),
            body: Some(body.clone()),
        },
        Mutation::Update { id, body } => Route {
            verb: Verb::Put,
            url: format!("{base}{endpoint}/{id}"),
            body: Some(body.clone()),
        },
        Mutation::Delete { id } => Route {
            verb: Verb::Delete,
            url: format!("{base}{endpoint}/{id}"),
            body: None,
        },
    }
}

/// Whole-request ceiling for one delivery attempt.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection-establishment ceiling.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Delivery over HTTP with bearer authentication.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    /// Creates a transport for the given API base URL.
    pub fn new(base_url: &str, token: Option<String>) -> TransportResult<Self> {
        Self::with_timeout(base_url, token, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a transport with a custom per-request timeout.
    pub fn with_timeout(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> TransportResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(HttpTransport { client, base_url: base_url.to_string(), token })
    }
}

impl Transport for HttpTransport {
    fn deliver(&self, record: &MutationRecord) -> TransportResult<()> {
        let route = route(&self.base_url, record);
        let mut request = match route.verb {
            Verb::Post => self.client.post(&route.url),
            Verb::Put => self.client.put(&route.url),
            Verb::Delete => self.client.delete(&route.url),
        };
        if let Some(body) = &route.body {
            request = request.json(body);
        }
        // A missing token is not special-cased: the request goes out bare
        // and fails through the normal status path.
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| TransportError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;

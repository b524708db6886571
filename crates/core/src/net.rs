// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity tracking.
//!
//! The engine needs a boolean "online" signal plus transition
//! notifications. With no signal source attached the state is optimistic
//! (online): delivery failures are already absorbed by the retry path, so
//! a missing signal must never stall the queue.

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

type Watcher = Box<dyn Fn(bool) + Send + Sync>;

/// Shared online/offline state with transition notifications.
pub struct Connectivity {
    online: AtomicBool,
    watchers: Mutex<Vec<Watcher>>,
}

impl Connectivity {
    /// Creates a handle in the optimistic (online) state.
    pub fn new() -> Arc<Self> {
        Arc::new(Connectivity { online: AtomicBool::new(true), watchers: Mutex::new(Vec::new()) })
    }

    /// Current online state.
    pub fn is_online(&self) -> bool {
        self.online.load(AtomicOrdering::SeqCst)
    }

    /// Updates the online state, notifying watchers on transitions only.
    pub fn set_online(&self, online: bool) {
        let previous = self.online.swap(online, AtomicOrdering::SeqCst);
        if previous == online {
            return;
        }
        tracing::debug!(online, "connectivity changed");
        let watchers = self.watchers.lock().unwrap_or_else(|e| e.into_inner());
        for watcher in watchers.iter() {
            watcher(online);
        }
    }

    /// Registers a callback invoked with the new state on every transition.
    pub fn on_change(&self, watcher: impl Fn(bool) + Send + Sync + 'static) {
        self.watchers.lock().unwrap_or_else(|e| e.into_inner()).push(Box::new(watcher));
    }
}

/// Reachability check against the remote.
pub trait ConnectivityProbe: Send + Sync {
    /// Returns true if the remote currently looks reachable.
    fn check(&self) -> bool;
}

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Probes the remote's health endpoint over HTTP.
pub struct HttpProbe {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpProbe {
    /// Builds a probe for `{base_url}/health`.
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        HttpProbe { client, url: format!("{}/health", base_url.trim_end_matches('/')) }
    }
}

impl ConnectivityProbe for HttpProbe {
    fn check(&self) -> bool {
        match self.client.get(&self.url).send() {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Background monitor feeding probe results into a [`Connectivity`] handle.
///
/// The systems counterpart of a platform's online/offline events, for
/// long-running hosts. Short-lived callers can run a single probe shot
/// through [`Connectivity::set_online`] instead.
pub struct Monitor {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Monitor {
    /// Spawns a polling thread that probes every `interval`.
    pub fn spawn(
        connectivity: Arc<Connectivity>,
        probe: impl ConnectivityProbe + 'static,
        interval: Duration,
    ) -> Monitor {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let thread = thread::spawn(move || {
            while !stop_flag.load(AtomicOrdering::SeqCst) {
                connectivity.set_online(probe.check());
                thread::sleep(interval);
            }
        });
        Monitor { stop, thread: Some(thread) }
    }

    /// Stops the polling thread and waits for it to exit.
    pub fn stop(mut self) {
        self.stop.store(true, AtomicOrdering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.stop.store(true, AtomicOrdering::SeqCst);
    }
}

#[cfg(test)]
#[path = "net_tests.rs"]
mod tests;

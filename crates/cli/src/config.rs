// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI configuration management.
//!
//! Configuration lives in `config.toml` under the platform config dir
//! (override with `COURIER_CONFIG`) and covers the remote endpoint and
//! queue policy. Flags and `COURIER_*` environment variables take
//! precedence over the file; everything has a usable default, so a
//! missing file is not an error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "queue.db";

/// CLI configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote API settings.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Queue policy settings.
    #[serde(default)]
    pub queue: QueueConfig,
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the remote document API.
    #[serde(default = "default_url")]
    pub url: String,
    /// Bearer token attached to requests. Absent tokens are sent bare and
    /// fail through the normal delivery path.
    #[serde(default)]
    pub token: Option<String>,
    /// Ceiling for one delivery attempt, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig { url: default_url(), token: None, timeout_secs: default_timeout_secs() }
    }
}

/// Queue policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Total delivery attempts per record before eviction.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig { max_attempts: default_max_attempts() }
    }
}

fn default_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

impl Config {
    /// Loads the configuration from the given path, or defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("courier").join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }
}

/// Default directory for queue state.
pub fn default_state_dir() -> PathBuf {
    if let Some(dir) = dirs::state_dir() {
        return dir.join("courier");
    }
    dirs::home_dir()
        .map(|h| h.join(".local/state/courier"))
        .unwrap_or_else(|| PathBuf::from(".local/state/courier"))
}

/// Path of the state database within a state directory.
pub fn db_path(state_dir: &Path) -> PathBuf {
    state_dir.join(DB_FILE_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

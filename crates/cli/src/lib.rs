// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! courier - CLI driver for the offline mutation queue.
//!
//! The binary is a thin driver over [`courier_core`]: it resolves
//! configuration, opens the queue's state database, and exposes the sync
//! facade as subcommands:
//!
//! - `queue` - record a mutation, delivering immediately when reachable
//! - `pending` - list queued mutations
//! - `status` - queue and connectivity state
//! - `sync` - run one delivery pass

mod cli;
mod commands;

pub mod config;
pub mod error;

pub use cli::{Action, Cli, Command, OutputFormat};
pub use config::Config;
pub use error::{Error, Result};

use std::path::PathBuf;
use std::time::Duration;

/// Resolved settings for one CLI invocation: flags and environment take
/// precedence over the config file, which takes precedence over defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Remote API base URL.
    pub url: String,
    /// Bearer token for remote requests.
    pub token: Option<String>,
    /// Directory holding the state database.
    pub state_dir: PathBuf,
    /// Total delivery attempts per record before eviction.
    pub max_attempts: u32,
    /// Ceiling for one delivery attempt.
    pub timeout: Duration,
}

impl Settings {
    fn resolve(cli: &Cli, config: Config) -> Settings {
        Settings {
            url: cli.url.clone().unwrap_or(config.remote.url),
            token: cli.token.clone().or(config.remote.token),
            state_dir: cli.state_dir.clone().unwrap_or_else(config::default_state_dir),
            max_attempts: config.queue.max_attempts,
            timeout: Duration::from_secs(config.remote.timeout_secs),
        }
    }
}

/// Installs the stderr tracing subscriber.
///
/// Defaults to "warn" so dropped-mutation and persistence warnings are
/// visible; `RUST_LOG` overrides.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one parsed CLI invocation.
pub fn run(cli: Cli) -> Result<()> {
    let config_path = std::env::var_os("COURIER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)?;
    let settings = Settings::resolve(&cli, config);
    tracing::debug!(
        url = %settings.url,
        state_dir = %settings.state_dir.display(),
        "settings resolved"
    );

    match cli.command {
        Command::Queue { entity, action, body, target, no_sync } => {
            commands::queue(&settings, &entity, action, body, target, no_sync)
        }
        Command::Pending { format } => commands::pending(&settings, format),
        Command::Status { format, probe } => commands::status(&settings, format, probe),
        Command::Sync { probe } => commands::sync(&settings, probe),
    }
}

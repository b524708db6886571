// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Mutation kind accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Create,
    Update,
    Delete,
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "courier")]
#[command(about = "Offline-first mutation queue for the compliance document API")]
#[command(
    long_about = "Offline-first mutation queue for the compliance document API.\n\n\
    Mutations made while disconnected are recorded locally and delivered\n\
    to the remote API, in order, once connectivity returns."
)]
pub struct Cli {
    /// Directory for queue state (defaults to the platform state dir).
    #[arg(long, global = true, env = "COURIER_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Remote API base URL.
    #[arg(long, global = true, env = "COURIER_REMOTE_URL")]
    pub url: Option<String>,

    /// Bearer token attached to remote requests.
    #[arg(long, global = true, env = "COURIER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Queue a mutation for delivery
    Queue {
        /// Target collection (incident, document, corrective-action, report, user)
        entity: String,

        /// Mutation kind
        #[arg(value_enum)]
        action: Action,

        /// JSON document for create/update
        #[arg(long)]
        body: Option<String>,

        /// Remote document id for update/delete
        #[arg(long)]
        target: Option<String>,

        /// Leave the mutation queued even when the remote is reachable
        #[arg(long)]
        no_sync: bool,
    },

    /// List queued mutations
    Pending {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show queue and connectivity state
    Status {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Probe the remote's health endpoint instead of assuming online
        #[arg(long)]
        probe: bool,
    },

    /// Run one delivery pass over the queue
    Sync {
        /// Probe the remote's health endpoint first; skip the pass when unreachable
        #[arg(long)]
        probe: bool,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command handlers for the courier CLI.
//!
//! Each invocation is short-lived: the handler opens the state database,
//! does its work synchronously, and exits. Connectivity starts optimistic;
//! commands that care run a single probe shot against the remote's health
//! endpoint instead of keeping a monitor thread alive.

use courier_core::{
    Connectivity, ConnectivityProbe, EngineOptions, Entity, HttpProbe, HttpTransport, Mutation,
    SqliteStore, SyncEngine, SyncService,
};
use serde_json::Value;

use crate::cli::{Action, OutputFormat};
use crate::config::db_path;
use crate::error::{Error, Result};
use crate::Settings;

type Service = SyncService<HttpTransport, SqliteStore>;

fn open_service(settings: &Settings) -> Result<Service> {
    let store = SqliteStore::open(&db_path(&settings.state_dir))?;
    let transport =
        HttpTransport::with_timeout(&settings.url, settings.token.clone(), settings.timeout)?;
    let connectivity = Connectivity::new();
    let engine = SyncEngine::new(
        store,
        transport,
        connectivity,
        EngineOptions { max_attempts: settings.max_attempts },
    );
    Ok(SyncService::new(engine))
}

fn probe_remote(settings: &Settings) -> bool {
    HttpProbe::new(&settings.url).check()
}

/// Builds the mutation from the action and its flags.
fn build_mutation(action: Action, body: Option<String>, target: Option<String>) -> Result<Mutation> {
    match action {
        Action::Create => Ok(Mutation::create(parse_body(body, "create")?)),
        Action::Update => {
            let id = target
                .ok_or_else(|| Error::InvalidInput("update requires --target <id>".to_string()))?;
            Ok(Mutation::update(id, parse_body(body, "update")?))
        }
        Action::Delete => {
            let id = target
                .ok_or_else(|| Error::InvalidInput("delete requires --target <id>".to_string()))?;
            Ok(Mutation::delete(id))
        }
    }
}

fn parse_body(body: Option<String>, action: &str) -> Result<Value> {
    let raw =
        body.ok_or_else(|| Error::InvalidInput(format!("{action} requires --body <json>")))?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn queue(
    settings: &Settings,
    entity: &str,
    action: Action,
    body: Option<String>,
    target: Option<String>,
    no_sync: bool,
) -> Result<()> {
    let entity: Entity = entity.parse()?;
    let mutation = build_mutation(action, body, target)?;

    let service = open_service(settings)?;
    let id = service.engine().enqueue(entity, mutation);
    println!("{id}");

    if !no_sync {
        // One probe shot stands in for the platform connectivity signal.
        service.connectivity().set_online(probe_remote(settings));
        service.manual_sync();
    }
    Ok(())
}

pub fn pending(settings: &Settings, format: OutputFormat) -> Result<()> {
    let service = open_service(settings)?;
    let records = service.pending();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Text => {
            if records.is_empty() {
                println!("no pending mutations");
                return Ok(());
            }
            for record in &records {
                let target = record.mutation.target_id().unwrap_or("-");
                println!(
                    "{}  {}  {}  {}  retries={}",
                    record.id,
                    record.entity,
                    record.mutation.action_name(),
                    target,
                    record.retry_count
                );
            }
        }
    }
    Ok(())
}

pub fn status(settings: &Settings, format: OutputFormat, probe: bool) -> Result<()> {
    let service = open_service(settings)?;
    if probe {
        service.connectivity().set_online(probe_remote(settings));
    }
    let status = service.status();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Text => {
            println!("online:    {}", if status.is_online { "yes" } else { "no" });
            println!("syncing:   {}", if status.is_syncing { "yes" } else { "no" });
            println!("pending:   {}", status.pending);
            match status.last_sync {
                Some(at) => println!("last sync: {}", at.to_rfc3339()),
                None => println!("last sync: never"),
            }
        }
    }
    Ok(())
}

pub fn sync(settings: &Settings, probe: bool) -> Result<()> {
    let service = open_service(settings)?;
    if probe && !probe_remote(settings) {
        service.connectivity().set_online(false);
        println!("remote unreachable, sync skipped");
        return Ok(());
    }

    let before = service.status().pending;
    if before == 0 {
        println!("queue empty");
        return Ok(());
    }

    let clean = service.manual_sync();
    let after = service.status().pending;
    if clean {
        println!("delivered {before} mutations");
    } else if after == 0 {
        println!("queue drained, some mutations were dropped");
    } else {
        println!("{after} of {before} mutations still pending");
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

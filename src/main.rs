//! stackyard - Main entry point
//!
//! A command-line yard inventory tracker: containers arrive on an inbound
//! queue, get placed into fixed-capacity grid slots, and every rearrangement
//! is visible until explicitly acknowledged.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use tracing::debug;

use stackyard::cli::{Cli, Commands};
use stackyard::config_file::YardConfig;
use stackyard::container::{ContainerId, IngestRecord};
use stackyard::engine::YardEngine;
use stackyard::grid::SlotId;
use stackyard::persist::JsonFileStore;

/// Initialize the tracing subscriber with env-filter support
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if let Commands::Init { force } = &cli.command {
        return init_config(&cli, *force);
    }

    let config = YardConfig::load_from_file(&cli.config)
        .with_context(|| format!("no yard configuration at {:?} (run `stackyard init`)", cli.config))?;
    config.validate().context("invalid yard configuration")?;

    let store = JsonFileStore::open(&config.data_dir)
        .with_context(|| format!("failed to open state directory {:?}", config.data_dir))?;
    let mut engine = YardEngine::load(config.grid(), Box::new(store));
    debug!(slots = engine.grid().slot_count(), "engine loaded");

    match cli.command {
        Commands::Init { .. } => unreachable!("handled above"),
        Commands::Ingest {
            file,
            company,
            owner,
            size,
            kind,
            priority,
        } => {
            let records = match file {
                Some(path) => {
                    let content = fs::read_to_string(&path)
                        .with_context(|| format!("failed to read intake file {path:?}"))?;
                    serde_json::from_str::<Vec<IngestRecord>>(&content)
                        .context("intake file must be a JSON array of records")?
                }
                None => vec![IngestRecord {
                    size: size.parse().map_err(|_| anyhow::anyhow!("unknown size: {size}"))?,
                    kind: kind.parse().map_err(|_| anyhow::anyhow!("unknown kind: {kind}"))?,
                    priority: priority
                        .parse()
                        .map_err(|_| anyhow::anyhow!("unknown priority: {priority}"))?,
                    owner_company: company,
                    owner_name: owner,
                }],
            };

            let ids = engine.ingest(records);
            for id in &ids {
                println!("{id}");
            }
        }
        Commands::Place { count } => {
            let placed = engine.auto_place(count);
            println!("placed {placed} container(s)");
        }
        Commands::Move { container, slot } => {
            engine.move_container(&ContainerId::from_raw(container), &SlotId::from_raw(slot))?;
            println!("ok");
        }
        Commands::Reorder { slot, from, to } => {
            engine.reorder(&SlotId::from_raw(slot), from, to)?;
            println!("ok");
        }
        Commands::Evict { slot, container } => {
            engine.evict(&SlotId::from_raw(slot), &ContainerId::from_raw(container))?;
            println!("ok");
        }
        Commands::Changed => {
            for slot_id in engine.changed_slots() {
                println!("{slot_id}");
            }
        }
        Commands::Ack => {
            engine.acknowledge();
            println!("baseline acknowledged");
        }
        Commands::Status => print_status(&engine),
        Commands::Slots => print_slots(&engine),
        Commands::Find { query } => print_matches(&engine, &query),
    }

    Ok(())
}

fn init_config(cli: &Cli, force: bool) -> Result<()> {
    if cli.config.exists() && !force {
        bail!(
            "configuration already exists at {:?} (use --force to overwrite)",
            cli.config
        );
    }
    let config = YardConfig::default();
    config.save_to_file(&cli.config)?;
    println!("wrote default configuration to {:?}", cli.config);
    Ok(())
}

fn print_status(engine: &YardEngine) {
    let grid = engine.grid();
    println!("slots:       {}", grid.slot_count());
    println!("capacity:    {}", grid.total_capacity());
    println!("in yard:     {}", engine.in_yard_count());
    println!("inbound:     {}", engine.inbound_count());
    println!("utilization: {}%", engine.utilization_percent());
    println!("changed:     {}", engine.changed_slots().len());
    for (zone, free) in engine.zone_remaining() {
        println!("zone {zone}: {free} free");
    }
}

fn print_slots(engine: &YardEngine) {
    for (slot_id, slot) in engine.layout().iter() {
        let stack: Vec<&str> = slot.iter().map(|id| id.as_str()).collect();
        println!("{slot_id}: [{}]", stack.join(", "));
    }
}

/// Exact, case-insensitive match against container id, owning company, or
/// owner name. Search state lives out here with the caller; the engine only
/// provides enumerable read access.
fn print_matches(engine: &YardEngine, query: &str) {
    let needle = query.to_lowercase();
    for container in engine.containers() {
        let hit = container.id.as_str().to_lowercase() == needle
            || container.owner_company.to_lowercase() == needle
            || container.owner_name.to_lowercase() == needle;
        if hit {
            let location = match &container.slot {
                Some(slot) => slot.to_string(),
                None => "inbound".to_string(),
            };
            println!(
                "{} {} {} {} [{}] @ {}",
                container.id,
                container.size,
                container.kind,
                container.priority,
                container.owner_company,
                location
            );
        }
    }
}

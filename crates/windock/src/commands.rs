use std::thread;
use std::time::Duration;

use clap::ArgMatches;
use tracing::{error, info};

use windock_core::affinity::AffinityStore;
use windock_core::events;
use windock_core::{WindockConfig, WindowInfo, WindowInventory, render_report};

use crate::table;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    let result = match matches.subcommand() {
        Some(("snapshot", sub_matches)) => handle_snapshot_command(sub_matches),
        Some(("displays", sub_matches)) => handle_displays_command(sub_matches),
        Some(("watch", sub_matches)) => handle_watch_command(sub_matches),
        Some(("cache", sub_matches)) => handle_cache_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_app_shutdown();
    result
}

/// Load the config hierarchy, applying the `--no-cache` CLI override.
fn load_config(matches: &ArgMatches) -> Result<WindockConfig, Box<dyn std::error::Error>> {
    let mut config = match WindockConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            error!(event = "cli.config_load_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };

    let no_cache = matches
        .try_get_one::<bool>("no-cache")
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false);
    if no_cache {
        config.cache.enabled = Some(false);
    }

    Ok(config)
}

fn handle_snapshot_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    info!(event = "cli.snapshot_started", json_output = json_output);

    let config = load_config(matches)?;
    let mut inventory = WindowInventory::system(&config);
    let snapshot = inventory.snapshot_with_layout();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&snapshot.windows)?);
    } else if snapshot.windows.is_empty() && snapshot.layout.is_empty() {
        println!("No windows or displays found.");
    } else {
        print!("{}", render_report(&snapshot));
    }

    inventory.flush_persistence();
    info!(event = "cli.snapshot_completed", count = snapshot.windows.len());
    Ok(())
}

fn handle_displays_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    info!(event = "cli.displays_started", json_output = json_output);

    let mut config = load_config(matches)?;
    // Display enumeration never touches the cache.
    config.cache.enabled = Some(false);
    let layout = WindowInventory::system(&config).displays();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&layout.displays)?);
    } else if layout.is_empty() {
        println!("No displays found.");
    } else {
        println!("Displays:");
        table::print_displays_table(&layout.displays);
    }

    info!(event = "cli.displays_completed", count = layout.displays.len());
    Ok(())
}

fn handle_watch_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let interval_ms = matches.get_one::<u64>("interval-ms").copied().unwrap_or(1000);
    let count = matches.get_one::<u64>("count").copied();

    info!(
        event = "cli.watch_started",
        interval_ms = interval_ms,
        count = ?count,
        json_output = json_output
    );

    let config = load_config(matches)?;
    let mut inventory = WindowInventory::system(&config);
    let mut previous: Option<Vec<WindowInfo>> = None;
    let mut taken = 0u64;
    let mut changes = 0u64;

    loop {
        let snapshot = inventory.snapshot_with_layout();
        taken += 1;

        if previous.as_ref() != Some(&snapshot.windows) {
            changes += 1;
            if json_output {
                println!("{}", serde_json::to_string(&snapshot.windows)?);
            } else {
                println!("--- snapshot {} ---", taken);
                print!("{}", render_report(&snapshot));
            }
            previous = Some(snapshot.windows);
        }

        if count.is_some_and(|limit| taken >= limit) {
            break;
        }
        thread::sleep(Duration::from_millis(interval_ms));
    }

    inventory.flush_persistence();
    info!(
        event = "cli.watch_completed",
        snapshots = taken,
        changes = changes
    );
    Ok(())
}

fn handle_cache_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("show", sub_matches)) => handle_cache_show(sub_matches),
        Some(("clear", sub_matches)) => handle_cache_clear(sub_matches),
        _ => {
            error!(event = "cli.cache_subcommand_unknown");
            Err("Unknown cache subcommand".into())
        }
    }
}

fn handle_cache_show(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    info!(event = "cli.cache_show_started", json_output = json_output);

    let config = load_config(matches)?;
    let store = AffinityStore::from_config(&config.cache);
    let cache = store.load();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&cache)?);
    } else {
        println!("Affinity cache: {}", store.path().display());
        if let Some(updated_at) = cache.updated_at() {
            println!("Updated: {}", updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        if cache.is_empty() {
            println!("No cached affinities.");
        } else {
            table::print_affinity_table(&cache);
        }
    }

    info!(event = "cli.cache_show_completed", entries = cache.len());
    Ok(())
}

fn handle_cache_clear(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.cache_clear_started");

    let config = load_config(matches)?;
    let store = AffinityStore::from_config(&config.cache);

    match store.clear() {
        Ok(true) => println!("Removed affinity cache: {}", store.path().display()),
        Ok(false) => println!("No affinity cache at {}", store.path().display()),
        Err(e) => {
            eprintln!("Failed to clear affinity cache: {}", e);
            error!(event = "cli.cache_clear_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    }

    info!(event = "cli.cache_clear_completed");
    Ok(())
}

//! # hslinkd — hslink console daemon
//!
//! Composition root that wires the device table to a hub and drives it from
//! the console.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Load a hub snapshot (saved `getstatus`/`getcontrol` bodies, or the demo set)
//! - Seed the virtual hub and build the device table from the snapshot
//! - Apply push updates in arrival order while reading console commands
//! - Exit on `quit`, end of input or Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod command;
mod config;
mod snapshot;

use std::sync::Arc;

use anyhow::Context;
use hslink_adapter_virtual::VirtualHub;
use hslink_app::ports::RequestSender;
use hslink_app::registry::DeviceTable;
use hslink_app::update::Delivery;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use command::Command;
use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        json_api = %config.json_api_url(),
        ascii = %config.ascii_addr(),
        username = %config.hub.username,
        password_set = !config.hub.password.is_empty(),
        "hub configured, driving the virtual hub"
    );

    let (records, controls) =
        snapshot::load(&config.snapshot).context("failed to load hub snapshot")?;
    let (hub, mut updates) = VirtualHub::from_snapshot(records.clone(), &controls);
    let mut table = DeviceTable::from_snapshot(Arc::new(hub), records, &controls);

    log_inventory(&table);

    let delivery = if config.listener.suppress_on_connection {
        Delivery::DataOnly
    } else {
        Delivery::AllEvents
    };
    for device in table.devices_mut() {
        device.subscribe(delivery, |device, kind| {
            tracing::info!(
                device_ref = %device.device_ref(),
                name = device.name(),
                value = %device.value(),
                status = device.status(),
                ?kind,
                "device changed"
            );
        });
    }
    table.notify_connection();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(update) = updates.recv() => {
                table.apply_update(update);
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read console input")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(Command::List) => print_devices(&table),
                    Ok(parsed) => {
                        if let Err(err) = command::execute(&table, parsed).await {
                            tracing::warn!(error = %err, command = parsed.name(), "command failed");
                        }
                    }
                    Err(err) => tracing::warn!(error = %err, "invalid command"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    table.notify_connection();
    tracing::info!("hslinkd stopped");
    Ok(())
}

fn log_inventory<S: RequestSender>(table: &DeviceTable<S>) {
    tracing::info!(
        devices = table.len(),
        unrecognized = table.diagnostics().len(),
        "device table built"
    );
    for diagnostic in table.diagnostics() {
        tracing::info!(device_ref = %diagnostic.device_ref, "{diagnostic}");
    }
    for thermostat in table.thermostats() {
        let layout = thermostat.layout();
        tracing::info!(
            root = %layout.root,
            mode = ?thermostat.hvac_mode(),
            current = ?thermostat.current_temperature(),
            target = ?thermostat.target_temperature(),
            "thermostat found"
        );
    }
}

fn print_devices<S: RequestSender>(table: &DeviceTable<S>) {
    for device in table.devices() {
        let device = device.device();
        println!(
            "{:>5}  {:<10}  {:<28}  {:>6}  {}",
            device.device_ref(),
            device.kind().name(),
            device.name(),
            device.value(),
            device.status()
        );
    }
}

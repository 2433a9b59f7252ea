//! CLI Command Implementations
//!
//! Implements the logic for each CLI command.

use std::path::Path;

use anyhow::Context;
use tracing::info;

use super::TargetArgs;
use crate::{bed_size, list_ports, open_device, send_job, Config, Job, TransportKind};
use ruidakit_core::codec::{bytes_to_hex, hex_to_bytes};

/// Load the configuration and apply command-line transport overrides
pub fn load_config(path: Option<&Path>, target: &TargetArgs) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => match Config::default_path() {
            Ok(path) => Config::load_or_default(&path)
                .with_context(|| format!("loading {}", path.display()))?,
            Err(e) => {
                tracing::debug!("{}; using defaults", e);
                Config::default()
            }
        },
    };

    if let Some(output) = &target.output {
        config.connection.kind = TransportKind::File;
        config.connection.target = output.display().to_string();
    } else if let Some(device) = &target.serial {
        config.connection.kind = TransportKind::Serial;
        config.connection.target = device.clone();
    } else if let Some(host) = &target.host {
        config.connection.kind = TransportKind::Network;
        config.connection.target = host.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Encode and send a job file.
pub fn send(config: &Config, job_path: &Path, name: Option<&str>) -> anyhow::Result<()> {
    info!("Loading job: {}", job_path.display());
    let text = std::fs::read_to_string(job_path)
        .with_context(|| format!("reading {}", job_path.display()))?;
    let mut job =
        Job::from_json(&text).with_context(|| format!("parsing {}", job_path.display()))?;
    if let Some(name) = name {
        job.name = name.to_string();
    }

    let summary = send_job(config, &job)?;
    println!(
        "Sent '{}' to {} {}: {} layers from {} parts",
        summary.name,
        config.connection.kind,
        config.connection.target,
        summary.layers,
        summary.parts
    );
    Ok(())
}

/// Print the bed size.
pub fn show_bed_size(config: &Config) -> anyhow::Result<()> {
    let size = bed_size(config);
    println!(
        "{:.1} x {:.1} mm ({})",
        size.width_mm, size.height_mm, size.source
    );
    Ok(())
}

/// Print the controller model.
pub fn show_model(config: &Config) -> anyhow::Result<()> {
    let mut session = open_device(config)?;
    let model = session.model_name()?;
    session.close()?;
    println!("{}", model);
    Ok(())
}

/// Print candidate serial ports.
pub fn show_ports() -> anyhow::Result<()> {
    let ports = list_ports()?;
    if ports.is_empty() {
        println!("No serial ports found");
    }
    for port in ports {
        match (port.vid, port.pid) {
            (Some(vid), Some(pid)) => println!(
                "{}  {} [{:04x}:{:04x}]",
                port.port_name, port.description, vid, pid
            ),
            _ => println!("{}  {}", port.port_name, port.description),
        }
    }
    Ok(())
}

/// Send a raw query and print the response payload.
pub fn raw_query(config: &Config, opcode: &str) -> anyhow::Result<()> {
    let request = hex_to_bytes(opcode)?;
    let mut session = open_device(config)?;
    let payload = session.query_raw(&request)?;
    session.close()?;
    println!("{}", bytes_to_hex(&payload));
    Ok(())
}

//! # RuidaKit
//!
//! Job encoder and uploader for Ruida-compatible laser controllers:
//! - Compact vector encoding of cut and move paths, grouped into layers
//! - File, Serial (USB) and UDP delivery
//! - Bed size and model queries over serial
//!
//! ## Architecture
//!
//! RuidaKit is organized as a workspace with multiple crates:
//!
//! 1. **ruidakit-core** - Codec, opcodes, layers, job description, errors
//! 2. **ruidakit-communication** - Transports, job session, device queries
//! 3. **ruidakit-settings** - Configuration files and validation
//! 4. **ruidakit** - Glue and the command-line binary

pub mod cli;

pub use ruidakit_communication::{
    list_ports, ConnectionParams, DeviceQuery, SerialPortInfo, Session, Transport, TransportKind,
};
pub use ruidakit_core::{
    Color, Error, Job, JobCommand, JobPart, Layer, LayerId, LayerProperty, Result,
};
pub use ruidakit_settings::{Config, ConfigError, SettingsError};

use ruidakit_core::TransportError;
use std::fmt;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging at INFO
///
/// `RUST_LOG` directives are honoured on top of the default level. Output
/// goes to stderr so stdout stays clean for command results.
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with_level(tracing::Level::INFO)
}

/// Initialize logging with a default `level`
pub fn init_logging_with_level(level: tracing::Level) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// What a job send produced
#[derive(Debug, Clone, PartialEq)]
pub struct SendSummary {
    /// Name uploaded with the job
    pub name: String,
    /// Parts in the job
    pub parts: usize,
    /// Parts that carried motion and were written as layers
    pub layers: usize,
}

/// Build a session for `job`, clamping power to the machine limit
///
/// The session is not opened; the caller picks the transport.
pub fn build_session(config: &Config, job: &Job) -> Result<Session> {
    let name = if job.name.is_empty() {
        config.job.name.clone()
    } else {
        job.name.clone()
    };
    let max_power = config.machine.max_power;

    let mut session = Session::new(name);
    session.set_connection(config.connection_params());
    for part in &job.parts {
        let clamped = JobPart {
            commands: part.commands().map(|c| c.clamped(max_power)).collect(),
            ..part.clone()
        };
        session.add_part(&clamped)?;
    }
    Ok(session)
}

/// Encode `job` and deliver it over the configured transport
pub fn send_job(config: &Config, job: &Job) -> Result<SendSummary> {
    let mut session = build_session(config, job)?;
    session.open()?;

    let summary = SendSummary {
        name: session.name().to_string(),
        parts: session.layers().len(),
        layers: session.layers().iter().filter(|l| l.has_vectors()).count(),
    };

    let written = session.write();
    // close even when the write failed, then report the first error
    let closed = session.close();
    written?;
    closed?;

    tracing::info!(
        "Sent '{}' to {} ({} of {} parts with motion)",
        summary.name,
        config.connection.target,
        summary.layers,
        summary.parts
    );
    Ok(summary)
}

/// Where a bed size came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedSizeSource {
    /// Set in the configuration
    Configured,
    /// Reported by the controller
    Device,
    /// Built-in fallback
    Fallback,
}

impl fmt::Display for BedSizeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured => write!(f, "configured"),
            Self::Device => write!(f, "device"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Bed dimensions in mm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BedSize {
    /// Width in mm
    pub width_mm: f64,
    /// Height in mm
    pub height_mm: f64,
    /// Origin of the numbers
    pub source: BedSizeSource,
}

/// Resolve the bed size: configuration first, then the controller, then the fallback
pub fn bed_size(config: &Config) -> BedSize {
    if let Some((width_mm, height_mm)) = config.machine.configured_bed_size() {
        return BedSize {
            width_mm,
            height_mm,
            source: BedSizeSource::Configured,
        };
    }

    match query_bed_size(config) {
        Ok((width_mm, height_mm)) => BedSize {
            width_mm,
            height_mm,
            source: BedSizeSource::Device,
        },
        Err(e) => {
            tracing::warn!("Could not read bed size from the controller: {}", e);
            let (width_mm, height_mm) = config.machine.fallback_bed_size();
            BedSize {
                width_mm,
                height_mm,
                source: BedSizeSource::Fallback,
            }
        }
    }
}

fn query_bed_size(config: &Config) -> Result<(f64, f64)> {
    let mut session = open_device(config)?;
    let width = session.bed_width_mm()?;
    let height = session.bed_height_mm()?;
    session.close()?;
    Ok((width, height))
}

/// Open a session for device queries
///
/// Only the serial link answers queries; other transports are refused
/// before anything is opened, so a file target is never truncated.
pub fn open_device(config: &Config) -> Result<Session> {
    if config.connection.kind != TransportKind::Serial {
        return Err(TransportError::Unsupported {
            transport: config.connection.kind.to_string(),
            operation: "query".to_string(),
        }
        .into());
    }
    let mut session = Session::new(config.job.name.clone());
    session.set_connection(config.connection_params());
    session.open()?;
    Ok(session)
}

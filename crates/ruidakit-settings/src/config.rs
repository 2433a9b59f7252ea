//! Configuration for RuidaKit
//!
//! Supports JSON and TOML files, by extension, stored in the platform
//! config directory by default.
//!
//! Configuration is organized into sections:
//! - Connection (transport kind, target, serial timing)
//! - Network (UDP ports)
//! - Machine (bed size, power limit)
//! - Job defaults

use crate::error::{ConfigError, SettingsError, SettingsResult};
use ruidakit_communication::communication::{
    DEFAULT_BAUD_RATE, DEFAULT_DEST_PORT, DEFAULT_POLL_INTERVAL_MS, DEFAULT_QUERY_TIMEOUT_TENTHS,
    DEFAULT_SOURCE_PORT,
};
use ruidakit_communication::{ConnectionParams, TransportKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Transport to use
    pub kind: TransportKind,
    /// File path, serial device or hostname
    pub target: String,
    /// Baud rate for serial connections
    pub baud_rate: u32,
    /// Serial query timeout in tenths of a second
    pub query_timeout_tenths: u32,
    /// Serial poll interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            kind: TransportKind::File,
            target: "thunder.rd".to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            query_timeout_tenths: DEFAULT_QUERY_TIMEOUT_TENTHS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// UDP port settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Local port datagrams are sent from
    pub source_port: u16,
    /// Controller port
    pub dest_port: u16,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            source_port: DEFAULT_SOURCE_PORT,
            dest_port: DEFAULT_DEST_PORT,
        }
    }
}

/// Machine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// Bed width in mm; 0 asks the controller
    pub bed_width_mm: f64,
    /// Bed height in mm; 0 asks the controller
    pub bed_height_mm: f64,
    /// Bed width used when the controller cannot be asked
    pub fallback_width_mm: f64,
    /// Bed height used when the controller cannot be asked
    pub fallback_height_mm: f64,
    /// Power percentages in a job are clamped to this
    pub max_power: u8,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            bed_width_mm: 0.0,
            bed_height_mm: 0.0,
            fallback_width_mm: 900.0,
            fallback_height_mm: 600.0,
            max_power: 70,
        }
    }
}

impl MachineSettings {
    /// Bed size from the configuration, if one is set
    pub fn configured_bed_size(&self) -> Option<(f64, f64)> {
        (self.bed_width_mm > 0.0 && self.bed_height_mm > 0.0)
            .then_some((self.bed_width_mm, self.bed_height_mm))
    }

    /// Bed size used when neither configuration nor controller provide one
    pub fn fallback_bed_size(&self) -> (f64, f64) {
        (self.fallback_width_mm, self.fallback_height_mm)
    }
}

/// Job defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    /// Name uploaded with jobs that do not carry one
    pub name: String,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            name: "thunder.rd".to_string(),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Connection settings
    #[serde(default)]
    pub connection: ConnectionSettings,
    /// UDP settings
    #[serde(default)]
    pub network: NetworkSettings,
    /// Machine settings
    #[serde(default)]
    pub machine: MachineSettings,
    /// Job defaults
    #[serde(default)]
    pub job: JobSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

impl Config {
    /// Create a default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location
    pub fn default_path() -> SettingsResult<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory(
                "no configuration directory on this platform".to_string(),
            )
        })?;
        Ok(base.join("ruidakit").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load config from `path`, or the defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::SaveError(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let out_of_range = |key: &str, value: String| ConfigError::ValueOutOfRange {
            key: key.to_string(),
            value,
        };

        if self.connection.target.trim().is_empty() {
            return Err(ConfigError::MissingKey("connection.target".to_string()));
        }
        if self.connection.baud_rate == 0 {
            return Err(out_of_range("connection.baud_rate", "0".to_string()));
        }
        if self.connection.query_timeout_tenths == 0 {
            return Err(out_of_range("connection.query_timeout_tenths", "0".to_string()));
        }
        if self.connection.poll_interval_ms == 0 {
            return Err(out_of_range("connection.poll_interval_ms", "0".to_string()));
        }
        if self.machine.max_power > 100 {
            return Err(out_of_range(
                "machine.max_power",
                self.machine.max_power.to_string(),
            ));
        }
        if self.machine.bed_width_mm < 0.0 || self.machine.bed_height_mm < 0.0 {
            return Err(out_of_range(
                "machine.bed_size",
                format!("{} x {}", self.machine.bed_width_mm, self.machine.bed_height_mm),
            ));
        }
        if self.machine.fallback_width_mm <= 0.0 || self.machine.fallback_height_mm <= 0.0 {
            return Err(out_of_range(
                "machine.fallback_size",
                format!(
                    "{} x {}",
                    self.machine.fallback_width_mm, self.machine.fallback_height_mm
                ),
            ));
        }
        if self.job.name.is_empty() {
            return Err(ConfigError::MissingKey("job.name".to_string()));
        }
        Ok(())
    }

    /// Connection parameters for the configured transport
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams {
            kind: self.connection.kind,
            target: self.connection.target.clone(),
            baud_rate: self.connection.baud_rate,
            query_timeout_tenths: self.connection.query_timeout_tenths,
            poll_interval_ms: self.connection.poll_interval_ms,
            source_port: self.network.source_port,
            dest_port: self.network.dest_port,
        }
    }
}

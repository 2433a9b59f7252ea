//! RuidaKit Settings Crate
//!
//! Handles configuration loading, saving and validation.

pub mod config;
pub mod error;

pub use config::{Config, ConnectionSettings, JobSettings, MachineSettings, NetworkSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

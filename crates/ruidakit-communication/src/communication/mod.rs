//! Byte transports
//!
//! A [`Transport`] is a byte sink (and, for serial links, a query source)
//! that the session writes a finished job into. Three bindings exist:
//! - [`file::FileTransport`]: sequential dump into a new file
//! - [`serial::SerialTransport`]: USB serial link with identify handshake and queries
//! - [`udp::UdpTransport`]: connectionless datagrams to the controller's UDP port

pub mod file;
pub mod serial;
pub mod udp;

use ruidakit_core::{Result, TransportError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serial line speed used by the controller
pub const DEFAULT_BAUD_RATE: u32 = 921_600;
/// Controller UDP port
pub const DEFAULT_DEST_PORT: u16 = 50200;
/// Local UDP port the controller expects replies to come from
pub const DEFAULT_SOURCE_PORT: u16 = 40200;
/// Default query timeout, in tenths of a second
pub const DEFAULT_QUERY_TIMEOUT_TENTHS: u32 = 10;
/// Default interval between serial input polls
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

/// Transport kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Plain file on disk
    File,
    /// USB serial device
    Serial,
    /// UDP over the network
    Network,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Serial => write!(f, "serial"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// Parameters for opening a transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Which transport to open
    pub kind: TransportKind,
    /// File path, serial device path or hostname
    pub target: String,
    /// Serial baud rate
    pub baud_rate: u32,
    /// Serial query timeout in tenths of a second
    pub query_timeout_tenths: u32,
    /// Serial poll interval in milliseconds
    pub poll_interval_ms: u64,
    /// Local UDP port
    pub source_port: u16,
    /// Controller UDP port
    pub dest_port: u16,
}

impl ConnectionParams {
    fn with_kind(kind: TransportKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            query_timeout_tenths: DEFAULT_QUERY_TIMEOUT_TENTHS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            source_port: DEFAULT_SOURCE_PORT,
            dest_port: DEFAULT_DEST_PORT,
        }
    }

    /// Write the job into a new file at `path`
    pub fn file(path: impl Into<String>) -> Self {
        Self::with_kind(TransportKind::File, path)
    }

    /// Talk to the controller on a serial device
    pub fn serial(device: impl Into<String>) -> Self {
        Self::with_kind(TransportKind::Serial, device)
    }

    /// Talk to the controller over UDP
    pub fn network(hostname: impl Into<String>) -> Self {
        Self::with_kind(TransportKind::Network, hostname)
    }

    /// Set the query timeout in tenths of a second
    pub fn with_query_timeout_tenths(mut self, tenths: u32) -> Self {
        self.query_timeout_tenths = tenths;
        self
    }

    /// Set the UDP ports
    pub fn with_ports(mut self, source_port: u16, dest_port: u16) -> Self {
        self.source_port = source_port;
        self.dest_port = dest_port;
        self
    }

    /// Query timeout in milliseconds
    pub fn query_timeout_ms(&self) -> u64 {
        u64::from(self.query_timeout_tenths) * 100
    }

    /// Open the transport these parameters describe
    pub fn open(&self) -> Result<Box<dyn Transport>> {
        if self.target.trim().is_empty() {
            return Err(TransportError::NotConfigured.into());
        }
        tracing::info!("Opening {} transport to {}", self.kind, self.target);

        let transport: Box<dyn Transport> = match self.kind {
            TransportKind::File => Box::new(file::FileTransport::create(&self.target)?),
            TransportKind::Serial => Box::new(serial::SerialTransport::open(self)?),
            TransportKind::Network => Box::new(udp::UdpTransport::open(
                &self.target,
                self.source_port,
                self.dest_port,
            )?),
        };
        Ok(transport)
    }
}

/// Byte sink (and optional query source) for a controller job
pub trait Transport: Send {
    /// Transport kind
    fn kind(&self) -> TransportKind;

    /// File path, device path or hostname
    fn target(&self) -> &str;

    /// Write a single byte; transports may buffer it
    fn write_byte(&mut self, byte: u8) -> Result<()>;

    /// Write a block of bytes
    fn write_bytes(&mut self, data: &[u8]) -> Result<()>;

    /// Send a query opcode and return the response payload
    fn query(&mut self, _request: &[u8]) -> Result<Vec<u8>> {
        Err(TransportError::Unsupported {
            transport: self.kind().to_string(),
            operation: "query".to_string(),
        }
        .into())
    }

    /// Flush anything pending and release the underlying resource
    fn close(&mut self) -> Result<()>;
}

/// Map an I/O failure on `target` into a transport error
pub(crate) fn io_error(target: &str, err: std::io::Error) -> ruidakit_core::Error {
    tracing::warn!("I/O error on {}: {}", target, err);
    TransportError::Io {
        target: target.to_string(),
        reason: err.to_string(),
    }
    .into()
}

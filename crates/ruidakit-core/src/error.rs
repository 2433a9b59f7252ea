//! Error handling for RuidaKit
//!
//! Provides error types for all layers of the encoder:
//! - Codec errors (numeric field encodes, hex literals)
//! - Job errors (part geometry, layer bookkeeping)
//! - Transport errors (file, serial and network delivery)
//! - Protocol errors (device responses)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Codec error type
///
/// Raised by the fixed-width wire encodings. An `OutOfRange` coming out of
/// the layer compaction path is a defect: motion encoding switches to the
/// absolute form before a relative field can overflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A value does not fit the field it is being encoded into
    #[error("Value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// The value that was rejected.
        value: i64,
        /// Smallest representable value.
        min: i64,
        /// Largest representable value.
        max: i64,
    },

    /// A hex literal could not be parsed
    #[error("Invalid hex string '{input}'")]
    InvalidHex {
        /// The offending input.
        input: String,
    },

    /// Not enough bytes to decode a field
    #[error("Insufficient data: need {needed} bytes, have {available}")]
    InsufficientData {
        /// Bytes required by the field.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },
}

/// Job error type
///
/// Represents misuse of the job-building API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobError {
    /// The job has no parts to write
    #[error("Job has no parts")]
    NoParts,

    /// A motion or property call arrived before any part was started
    #[error("No active part; call start_part first")]
    NoActivePart,

    /// A part rectangle is unusable
    #[error("Invalid part dimensions: {reason}")]
    InvalidDimensions {
        /// Why the rectangle was rejected.
        reason: String,
    },

    /// More layers carry vectors than a one-byte id can address
    #[error("Too many layers: {count} (at most 256 are addressable)")]
    TooManyLayers {
        /// Number of layers with vectors.
        count: usize,
    },

    /// Motion was sent to the frame layer
    #[error("The frame layer carries no vectors")]
    FrameLayerVectors,

    /// A coordinate is not finite or does not fit the absolute field
    #[error("Coordinate {value_mm} mm is out of range")]
    CoordinateOutOfRange {
        /// The rejected coordinate in millimeters.
        value_mm: f64,
    },
}

/// Transport error type
///
/// Represents errors delivering bytes to, or reading bytes from, a controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// No transport target was configured before opening or writing
    #[error("No output configured")]
    NotConfigured,

    /// The transport has not been opened, or was already closed
    #[error("Transport not open")]
    NotOpen,

    /// Failed to open the transport
    #[error("Failed to open {target}: {reason}")]
    FailedToOpen {
        /// The file path, device or host that failed to open.
        target: String,
        /// The reason it failed.
        reason: String,
    },

    /// I/O failure while talking to the device
    #[error("I/O error on {target}: {reason}")]
    Io {
        /// The file path, device or host.
        target: String,
        /// The reason for the failure.
        reason: String,
    },

    /// The device did not answer in time
    #[error("Device did not respond within {timeout_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The transport cannot perform the operation
    #[error("{transport} transport does not support {operation}")]
    Unsupported {
        /// The transport kind.
        transport: String,
        /// The requested operation.
        operation: String,
    },
}

/// Protocol error type
///
/// Represents malformed answers from the controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A query response is shorter than its fixed header
    #[error("Response of {length} bytes is shorter than the {header}-byte header")]
    ShortResponse {
        /// Bytes received.
        length: usize,
        /// Header length expected.
        header: usize,
    },
}

/// Main error type for RuidaKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Codec error
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Job error
    #[error(transparent)]
    Job(#[from] JobError),

    /// Transport error
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Protocol error
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(TransportError::Timeout { .. }))
    }

    /// Check if this is a field or coordinate range violation
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            Error::Codec(CodecError::OutOfRange { .. })
                | Error::Job(JobError::CoordinateOutOfRange { .. })
        )
    }

    /// Check if this is a missing-configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Transport(TransportError::NotConfigured))
    }

    /// Check if this is a transport error
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Io(_))
    }

    /// Check if this is a protocol error
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Error::Protocol(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

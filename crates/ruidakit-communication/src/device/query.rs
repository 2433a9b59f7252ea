//! Device queries
//!
//! Fixed four-byte request opcodes answered over the serial link. Payload
//! decoding lives here so it can be tested without a device.

use ruidakit_core::codec::decode_abs;
use ruidakit_core::protocol::query;
use ruidakit_core::units::um_to_mm;
use ruidakit_core::Result;
use std::fmt;

/// A query the controller answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceQuery {
    /// Identify handshake
    Identify,
    /// Bed width in µm
    BedWidth,
    /// Bed height in µm
    BedHeight,
    /// Firmware version string
    Version,
}

impl DeviceQuery {
    /// Request opcode, unscrambled
    pub fn opcode(&self) -> [u8; 4] {
        match self {
            Self::Identify => query::IDENTIFY,
            Self::BedWidth => query::BED_WIDTH,
            Self::BedHeight => query::BED_HEIGHT,
            Self::Version => query::VERSION,
        }
    }
}

impl fmt::Display for DeviceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identify => write!(f, "identify"),
            Self::BedWidth => write!(f, "bed width"),
            Self::BedHeight => write!(f, "bed height"),
            Self::Version => write!(f, "version"),
        }
    }
}

/// Decode a bed dimension payload into millimeters
pub fn parse_dimension_mm(payload: &[u8]) -> Result<f64> {
    Ok(um_to_mm(decode_abs(payload, 0)?))
}

/// Decode a version payload; trailing NULs and whitespace are dropped
pub fn parse_model_name(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload)
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

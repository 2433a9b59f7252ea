//! # RuidaKit Core
//!
//! Core types and pure encoders for RuidaKit.
//! Provides the wire codec, the opcode tables, layer buffering with motion
//! compaction, and the job description handed to a session.

pub mod codec;
pub mod error;
pub mod job;
pub mod layer;
pub mod protocol;
pub mod units;

pub use error::{CodecError, Error, JobError, ProtocolError, Result, TransportError};
pub use job::{Job, JobCommand, JobPart, LayerProperty};
pub use layer::{Color, Layer, LayerId};
pub use units::{mm_to_um, um_to_mm, Micrometers, Point, Rect};

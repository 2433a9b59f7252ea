//! # RuidaKit Communication
//!
//! Transports and the job session for Ruida laser controllers.
//! Supports file output, Serial/USB and UDP connections, plus the
//! device query sub-protocol over serial.

pub mod communication;
pub mod device;

pub use communication::{
    file::FileTransport,
    serial::{list_ports, SerialLink, SerialPortInfo, SerialTransport},
    udp::UdpTransport,
    ConnectionParams, Transport, TransportKind,
};

pub use device::{DeviceQuery, Session, PSEUDO_COLORS};

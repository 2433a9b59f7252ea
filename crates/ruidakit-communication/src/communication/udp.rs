//! UDP transport
//!
//! The controller listens on a fixed UDP port and expects each record block
//! in its own datagram. Single-byte writes are collected and go out as one
//! datagram ahead of the next block write, or on close.

use super::{io_error, Transport, TransportKind};
use ruidakit_core::{Result, TransportError};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

const SEND_TIMEOUT: Duration = Duration::from_secs(3);

/// Datagram transport to a networked controller
pub struct UdpTransport {
    socket: Option<UdpSocket>,
    destination: SocketAddr,
    target: String,
    pending: Vec<u8>,
}

impl UdpTransport {
    /// Resolve `hostname`, bind `source_port` locally and aim at `dest_port`
    pub fn open(hostname: &str, source_port: u16, dest_port: u16) -> Result<Self> {
        let failed = |reason: String| {
            tracing::warn!("Failed to open UDP link to {}: {}", hostname, reason);
            TransportError::FailedToOpen {
                target: hostname.to_string(),
                reason,
            }
        };

        let destination = (hostname, dest_port)
            .to_socket_addrs()
            .map_err(|e| failed(e.to_string()))?
            .next()
            .ok_or_else(|| failed("hostname did not resolve".to_string()))?;

        let local: SocketAddr = if destination.is_ipv6() {
            (Ipv6Addr::UNSPECIFIED, source_port).into()
        } else {
            (Ipv4Addr::UNSPECIFIED, source_port).into()
        };
        let socket = UdpSocket::bind(local).map_err(|e| failed(e.to_string()))?;
        socket
            .set_write_timeout(Some(SEND_TIMEOUT))
            .map_err(|e| failed(e.to_string()))?;

        tracing::debug!("UDP link {} -> {}", local, destination);
        Ok(Self {
            socket: Some(socket),
            destination,
            target: hostname.to_string(),
            pending: Vec::new(),
        })
    }

    /// Resolved controller address
    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    /// Locally bound address
    pub fn local_addr(&self) -> Result<SocketAddr> {
        let socket = self.socket.as_ref().ok_or(TransportError::NotOpen)?;
        socket.local_addr().map_err(|e| io_error(&self.target, e))
    }

    fn send(&self, datagram: &[u8]) -> Result<()> {
        if datagram.is_empty() {
            return Ok(());
        }
        let socket = self.socket.as_ref().ok_or(TransportError::NotOpen)?;
        socket
            .send_to(datagram, self.destination)
            .map_err(|e| io_error(&self.target, e))?;
        Ok(())
    }

    fn flush_pending(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending);
        self.send(&pending)
    }
}

impl Transport for UdpTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Network
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        if self.socket.is_none() {
            return Err(TransportError::NotOpen.into());
        }
        self.pending.push(byte);
        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.flush_pending()?;
        self.send(data)
    }

    fn close(&mut self) -> Result<()> {
        if self.socket.is_some() {
            self.flush_pending()?;
            self.socket = None;
            tracing::debug!("Closed UDP link to {}", self.target);
        }
        Ok(())
    }
}

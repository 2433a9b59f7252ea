//! Serial port communication implementation
//!
//! The controller's USB port enumerates as a plain serial device running at
//! 921600 baud, 8N1, no flow control. Supports:
//! - Port enumeration and discovery
//! - Identify handshake on open
//! - Polled request/response queries with a bounded timeout

use super::{io_error, ConnectionParams, Transport, TransportKind};
use ruidakit_core::codec::{scramble, unscramble};
use ruidakit_core::protocol::query::{IDENTIFY, RESPONSE_HEADER_LEN};
use ruidakit_core::{Error, ProtocolError, Result, TransportError};
use std::io::{self, Read, Write};
use std::thread;
use std::time::Duration;

/// Bytes the controller answers the identify request with
pub const IDENTIFY_RESPONSE_LEN: usize = 16;
/// Largest query response read back
pub const MAX_RESPONSE_LEN: usize = 32;

/// Delay after dropping RTS
const RTS_SETTLE: Duration = Duration::from_millis(5);
/// Delay after dropping DTR
const DTR_SETTLE: Duration = Duration::from_millis(100);
/// Blocking read timeout on the native port
const READ_TIMEOUT: Duration = Duration::from_millis(100);
/// Silence that ends a response
const RESPONSE_GAP: Duration = READ_TIMEOUT;

/// Information about an available serial port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialPortInfo {
    /// Port name (e.g., "/dev/ttyUSB0", "COM3")
    pub port_name: String,

    /// Port description (e.g., "USB Serial Port")
    pub description: String,

    /// USB vendor ID if applicable
    pub vid: Option<u16>,

    /// USB product ID if applicable
    pub pid: Option<u16>,
}

impl SerialPortInfo {
    /// Create a new port info
    pub fn new(port_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            description: description.into(),
            vid: None,
            pid: None,
        }
    }

    /// Set USB IDs
    pub fn with_usb_ids(mut self, vid: u16, pid: u16) -> Self {
        self.vid = Some(vid);
        self.pid = Some(pid);
        self
    }
}

/// List serial ports a controller could be attached to
///
/// Filters to USB serial patterns:
/// - Windows: COM*
/// - Linux: /dev/ttyUSB*, /dev/ttyACM*
/// - macOS: /dev/cu.usbserial-*, /dev/cu.usbmodem*
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    let ports = serialport::available_ports().map_err(|e| {
        tracing::error!("Failed to enumerate serial ports: {}", e);
        Error::other(format!("Failed to enumerate ports: {}", e))
    })?;

    Ok(ports
        .iter()
        .filter(|port| is_controller_port(&port.port_name))
        .map(|port| {
            let info = SerialPortInfo::new(&port.port_name, describe_port(port));
            match &port.port_type {
                serialport::SerialPortType::UsbPort(usb) => info.with_usb_ids(usb.vid, usb.pid),
                _ => info,
            }
        })
        .collect())
}

fn is_controller_port(port_name: &str) -> bool {
    if let Some(number) = port_name.strip_prefix("COM") {
        return !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
    }
    port_name.starts_with("/dev/ttyUSB")
        || port_name.starts_with("/dev/ttyACM")
        || port_name.starts_with("/dev/cu.usbserial-")
        || port_name.starts_with("/dev/cu.usbmodem")
}

fn describe_port(port: &serialport::SerialPortInfo) -> String {
    match &port.port_type {
        serialport::SerialPortType::UsbPort(usb) => format!(
            "USB {} {}",
            usb.manufacturer.as_deref().unwrap_or("Device"),
            usb.product.as_deref().unwrap_or("Serial Port")
        ),
        serialport::SerialPortType::BluetoothPort => "Bluetooth Serial".to_string(),
        serialport::SerialPortType::PciPort => "PCI Serial".to_string(),
        _ => "Serial Port".to_string(),
    }
}

/// Byte link under a [`SerialTransport`]
///
/// Implemented for the native serial port; tests substitute a scripted link.
pub trait SerialLink: Read + Write + Send {
    /// Number of bytes waiting to be read
    fn bytes_to_read(&mut self) -> io::Result<u32>;
}

impl SerialLink for Box<dyn serialport::SerialPort> {
    fn bytes_to_read(&mut self) -> io::Result<u32> {
        serialport::SerialPort::bytes_to_read(self.as_ref()).map_err(io::Error::from)
    }
}

/// Open the native port and drop the modem control lines
fn open_port(params: &ConnectionParams) -> Result<Box<dyn serialport::SerialPort>> {
    let builder = serialport::new(&params.target, params.baud_rate)
        .data_bits(serialport::DataBits::Eight)
        .stop_bits(serialport::StopBits::One)
        .parity(serialport::Parity::None)
        .flow_control(serialport::FlowControl::None)
        .timeout(READ_TIMEOUT);

    let failed = |e: &dyn std::fmt::Display| -> Error {
        tracing::warn!("Failed to open serial port {}: {}", params.target, e);
        TransportError::FailedToOpen {
            target: params.target.clone(),
            reason: e.to_string(),
        }
        .into()
    };

    let mut port = builder.open().map_err(|e| failed(&e))?;
    port.write_request_to_send(false).map_err(|e| failed(&e))?;
    thread::sleep(RTS_SETTLE);
    port.write_data_terminal_ready(false)
        .map_err(|e| failed(&e))?;
    thread::sleep(DTR_SETTLE);
    Ok(port)
}

/// Serial transport with query support
pub struct SerialTransport<L: SerialLink> {
    link: Option<L>,
    target: String,
    query_timeout: Duration,
    poll_interval: Duration,
}

impl SerialTransport<Box<dyn serialport::SerialPort>> {
    /// Open the device named in `params` and run the identify handshake
    pub fn open(params: &ConnectionParams) -> Result<Self> {
        let port = open_port(params)?;
        Self::connect(
            port,
            &params.target,
            Duration::from_millis(params.query_timeout_ms()),
            Duration::from_millis(params.poll_interval_ms),
        )
    }
}

impl<L: SerialLink> SerialTransport<L> {
    /// Wrap an already open link and run the identify handshake
    pub fn connect(
        link: L,
        target: impl Into<String>,
        query_timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Self> {
        let mut transport = Self {
            link: Some(link),
            target: target.into(),
            query_timeout,
            poll_interval: poll_interval.max(Duration::from_millis(1)),
        };

        // The identify answer carries nothing we use, but it must be drained.
        transport.send(&scramble(&IDENTIFY))?;
        let answer = transport.read_response(IDENTIFY_RESPONSE_LEN)?;
        tracing::debug!(
            "Identify handshake on {} returned {} bytes",
            transport.target,
            answer.len()
        );
        Ok(transport)
    }

    fn link(&mut self) -> Result<&mut L> {
        self.link
            .as_mut()
            .ok_or_else(|| TransportError::NotOpen.into())
    }

    fn send(&mut self, data: &[u8]) -> Result<()> {
        let target = self.target.clone();
        let link = self.link()?;
        link.write_all(data).map_err(|e| io_error(&target, e))?;
        link.flush().map_err(|e| io_error(&target, e))
    }

    /// Drop whatever is still buffered from an earlier answer
    fn discard_input(&mut self) -> Result<()> {
        let target = self.target.clone();
        let link = self.link()?;
        let mut discarded = 0;
        loop {
            let available = link.bytes_to_read().map_err(|e| io_error(&target, e))? as usize;
            if available == 0 {
                break;
            }
            let mut chunk = vec![0u8; available];
            let read = link.read(&mut chunk).map_err(|e| io_error(&target, e))?;
            if read == 0 {
                break;
            }
            discarded += read;
        }
        if discarded > 0 {
            tracing::debug!("Discarded {} stale bytes from {}", discarded, target);
        }
        Ok(())
    }

    /// Poll until input shows up, then read up to `max` bytes
    ///
    /// The answer may arrive in pieces; reading stops at `max` bytes or once
    /// the line has been quiet for [`RESPONSE_GAP`].
    fn read_response(&mut self, max: usize) -> Result<Vec<u8>> {
        let target = self.target.clone();
        let timeout = self.query_timeout;
        let poll = self.poll_interval;
        let link = self.link()?;

        let attempts = (timeout.as_millis() / poll.as_millis()).max(1);
        let mut ready = false;
        for _ in 0..attempts {
            if link.bytes_to_read().map_err(|e| io_error(&target, e))? > 0 {
                ready = true;
                break;
            }
            thread::sleep(poll);
        }
        if !ready {
            tracing::warn!("No response from {} within {:?}", target, timeout);
            return Err(TransportError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            }
            .into());
        }

        let mut response = Vec::with_capacity(max);
        let mut quiet = Duration::ZERO;
        while response.len() < max {
            let available = link.bytes_to_read().map_err(|e| io_error(&target, e))? as usize;
            if available == 0 {
                if quiet >= RESPONSE_GAP {
                    break;
                }
                thread::sleep(poll);
                quiet += poll;
                continue;
            }
            quiet = Duration::ZERO;
            let mut chunk = vec![0u8; available.min(max - response.len())];
            let read = link.read(&mut chunk).map_err(|e| io_error(&target, e))?;
            if read == 0 {
                break;
            }
            response.extend_from_slice(&chunk[..read]);
        }
        Ok(response)
    }
}

impl<L: SerialLink> Transport for SerialTransport<L> {
    fn kind(&self) -> TransportKind {
        TransportKind::Serial
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write_bytes(&[byte])
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        let target = self.target.clone();
        self.link()?
            .write_all(data)
            .map_err(|e| io_error(&target, e))
    }

    fn query(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        self.discard_input()?;
        self.send(&scramble(request))?;
        let response = unscramble(&self.read_response(MAX_RESPONSE_LEN)?);
        if response.len() < RESPONSE_HEADER_LEN {
            tracing::warn!(
                "Short response from {}: {} bytes",
                self.target,
                response.len()
            );
            return Err(ProtocolError::ShortResponse {
                length: response.len(),
                header: RESPONSE_HEADER_LEN,
            }
            .into());
        }
        Ok(response[RESPONSE_HEADER_LEN..].to_vec())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut link) = self.link.take() {
            link.flush().map_err(|e| io_error(&self.target, e))?;
            tracing::debug!("Closed serial port {}", self.target);
        }
        Ok(())
    }
}

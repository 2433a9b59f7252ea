//! File transport
//!
//! Dumps the job into a new file on disk. The result is the same byte
//! stream a controller receives and can be loaded from a USB stick.

use super::{io_error, Transport, TransportKind};
use ruidakit_core::{Result, TransportError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Sequential writer into a freshly created file
pub struct FileTransport {
    target: String,
    writer: Option<BufWriter<File>>,
}

impl FileTransport {
    /// Create (or truncate) the file at `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let target = path.display().to_string();
        match File::create(path) {
            Ok(file) => Ok(Self {
                target,
                writer: Some(BufWriter::new(file)),
            }),
            Err(e) => {
                tracing::warn!("Failed to create {}: {}", target, e);
                Err(TransportError::FailedToOpen {
                    target,
                    reason: e.to_string(),
                }
                .into())
            }
        }
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>> {
        self.writer
            .as_mut()
            .ok_or_else(|| TransportError::NotOpen.into())
    }
}

impl Transport for FileTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::File
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write_bytes(&[byte])
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        let target = self.target.clone();
        self.writer()?
            .write_all(data)
            .map_err(|e| io_error(&target, e))
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| io_error(&self.target, e))?;
            tracing::debug!("Closed {}", self.target);
        }
        Ok(())
    }
}

impl Drop for FileTransport {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("Failed to flush {} on drop: {}", self.target, e);
        }
    }
}

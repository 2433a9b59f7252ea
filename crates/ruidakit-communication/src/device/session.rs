//! Job session
//!
//! A [`Session`] owns the layers of one job and the transport the job is
//! written to. Callers start a part, set its properties, feed it motion in
//! millimeters and then write the whole job in one pass:
//!
//! 1. upload the file name
//! 2. header: raw magic, start, light, feed to the origin
//! 3. frame block with the job extents
//! 4. property blocks for every layer that carries vectors
//! 5. layer count
//! 6. vector blocks, in the same order
//! 7. footer with the total travel distance

use super::query::{parse_dimension_mm, parse_model_name, DeviceQuery};
use crate::communication::{ConnectionParams, Transport};
use ruidakit_core::codec::{encode_abs, int_to_byte};
use ruidakit_core::protocol::{self, job, record};
use ruidakit_core::units::UM_PER_MM;
use ruidakit_core::{
    Color, JobCommand, JobError, JobPart, Layer, LayerProperty, Point, Rect, Result,
    TransportError,
};

/// Preview colours handed out by part index, modulo the table length
pub const PSEUDO_COLORS: [Color; 8] = [
    Color::new(0, 0, 0),
    Color::new(100, 0, 0),
    Color::new(0, 100, 0),
    Color::new(0, 0, 100),
    Color::new(100, 100, 0),
    Color::new(100, 0, 100),
    Color::new(0, 100, 100),
    Color::new(100, 100, 100),
];

/// Largest number of layers a one-byte id can address
const MAX_LAYERS: usize = 256;

/// The part whose rectangle seeds the job extents, with the size it was
/// started with in millimeters
#[derive(Debug, Clone, Copy)]
struct Frame {
    index: usize,
    width: f64,
    height: f64,
}

/// One job being built and written to a controller
pub struct Session {
    name: String,
    layers: Vec<Layer>,
    current: Option<usize>,
    frame: Option<Frame>,
    params: Option<ConnectionParams>,
    transport: Option<Box<dyn Transport>>,
}

impl Session {
    /// Create a session for a job called `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: Vec::new(),
            current: None,
            frame: None,
            params: None,
            transport: None,
        }
    }

    /// Job name uploaded to the controller
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the connection used by [`Session::open`]
    pub fn set_connection(&mut self, params: ConnectionParams) {
        self.params = Some(params);
    }

    /// Open the configured transport
    pub fn open(&mut self) -> Result<()> {
        let params = self.params.as_ref().ok_or(TransportError::NotConfigured)?;
        let transport = params.open()?;
        self.open_with(transport);
        Ok(())
    }

    /// Use an already opened transport
    pub fn open_with(&mut self, transport: Box<dyn Transport>) {
        tracing::info!(
            "Session '{}' using {} transport {}",
            self.name,
            transport.kind(),
            transport.target()
        );
        self.transport = Some(transport);
    }

    /// Whether a transport is open
    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    /// Start a new part and make it current
    ///
    /// Returns the part's insertion index. The part replaces the frame layer
    /// when it is wider *or* taller than the current frame, comparing the
    /// millimeter sizes as given.
    pub fn start_part(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<usize> {
        let rect = Rect::new(
            Point::try_from_mm(x, y)?,
            Point::try_from_mm(x + width, y + height)?,
        );
        let mut layer = Layer::new(rect)?;
        let index = self.layers.len();
        if index > 0 {
            layer.set_color(PSEUDO_COLORS[index % PSEUDO_COLORS.len()]);
        }

        let replaces_frame = match self.frame {
            Some(frame) => width > frame.width || height > frame.height,
            None => true,
        };
        if replaces_frame {
            tracing::debug!("Part {} becomes the frame layer", index);
            self.frame = Some(Frame {
                index,
                width,
                height,
            });
        }

        self.layers.push(layer);
        self.current = Some(index);
        Ok(index)
    }

    /// Finish the current part
    pub fn end_part(&mut self) {}

    fn current_layer(&mut self) -> Result<&mut Layer> {
        let index = self.current.ok_or(JobError::NoActivePart)?;
        Ok(&mut self.layers[index])
    }

    /// Set the current layer's speed
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        self.current_layer()?.set_speed(speed);
        Ok(())
    }

    /// Set the current layer's minimum power in percent
    pub fn set_min_power(&mut self, percent: u8) -> Result<()> {
        self.current_layer()?.set_min_power(percent)
    }

    /// Set the current layer's maximum power in percent
    pub fn set_max_power(&mut self, percent: u8) -> Result<()> {
        self.current_layer()?.set_max_power(percent)
    }

    /// Set the current layer's pulse frequency
    pub fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        self.current_layer()?.set_frequency(frequency);
        Ok(())
    }

    /// Set the current layer's focus offset
    pub fn set_focus(&mut self, focus: f64) -> Result<()> {
        self.current_layer()?.set_focus(focus);
        Ok(())
    }

    /// Apply a typed property to the current layer
    pub fn set_property(&mut self, property: LayerProperty) -> Result<()> {
        match property {
            LayerProperty::MinPower(p) => self.set_min_power(p),
            LayerProperty::MaxPower(p) => self.set_max_power(p),
            LayerProperty::Speed(s) => self.set_speed(s),
            LayerProperty::Frequency(f) => self.set_frequency(f),
            LayerProperty::Focus(f) => self.set_focus(f),
        }
    }

    /// Move to `(x, y)` mm with the laser off
    pub fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        let target = Point::try_from_mm(x, y)?;
        self.current_layer()?.vector_to(target, true)
    }

    /// Cut to `(x, y)` mm
    pub fn line_to(&mut self, x: f64, y: f64) -> Result<()> {
        let target = Point::try_from_mm(x, y)?;
        self.current_layer()?.vector_to(target, false)
    }

    /// Apply one job command to the current part
    pub fn apply(&mut self, command: JobCommand) -> Result<()> {
        match command {
            JobCommand::MoveTo { x, y } => self.move_to(x, y),
            JobCommand::LineTo { x, y } => self.line_to(x, y),
            JobCommand::SetProperty(property) => self.set_property(property),
        }
    }

    /// Start a part, run its commands and end it
    pub fn add_part(&mut self, part: &JobPart) -> Result<usize> {
        let index = self.start_part(part.x, part.y, part.width, part.height)?;
        for command in part.commands() {
            self.apply(command)?;
        }
        self.end_part();
        Ok(index)
    }

    /// Layers in insertion order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Insertion index of the frame layer
    pub fn frame_index(&self) -> Option<usize> {
        self.frame.map(|frame| frame.index)
    }

    /// The layer whose rectangle seeds the job extents
    pub fn frame_layer(&self) -> Option<&Layer> {
        self.frame.map(|frame| &self.layers[frame.index])
    }

    /// Write the job to the open transport
    pub fn write(&mut self) -> Result<()> {
        let transport = match self.transport.as_deref_mut() {
            Some(transport) => transport,
            None if self.params.is_some() => return Err(TransportError::NotOpen.into()),
            None => return Err(TransportError::NotConfigured.into()),
        };
        let frame = self.frame.ok_or(JobError::NoParts)?.index;

        let surviving: Vec<usize> = (0..self.layers.len())
            .filter(|&index| self.layers[index].has_vectors())
            .collect();
        if surviving.len() > MAX_LAYERS {
            return Err(JobError::TooManyLayers {
                count: surviving.len(),
            }
            .into());
        }

        // Every block is built before the first byte goes out, so an encoding
        // error never leaves a truncated job on the controller.
        let frame_block = Layer::frame(self.layers[frame].rect())
            .emit_properties()?
            .to_vec();
        let mut property_blocks = Vec::with_capacity(surviving.len());
        let mut vector_blocks = Vec::with_capacity(surviving.len());
        let mut travel_um = 0.0;
        for (id, &index) in surviving.iter().enumerate() {
            let layer = &mut self.layers[index];
            layer.set_id(id as u8);
            property_blocks.push(layer.emit_properties()?.to_vec());
            vector_blocks.push(layer.emit_vectors()?);
            travel_um += layer.travel_distance();
        }
        let travel_mm = (travel_um / UM_PER_MM) as i64;

        tracing::info!(
            "Writing job '{}': {} parts, {} with vectors",
            self.name,
            self.layers.len(),
            surviving.len()
        );
        let mut out = JobWriter {
            transport,
            written: 0,
        };

        out.record(&[&job::PREPARE_FILENAME])?;
        out.record(&[&job::FILENAME, self.name.as_bytes(), &[0x00]])?;

        // the magic is the one record that goes out unscrambled
        out.raw(&protocol::MAGIC)?;
        out.record(&[&job::START])?;
        out.record(&[&job::LIGHT_RED])?;
        out.record(&[&job::FEEDING, &encode_abs(0), &encode_abs(0)])?;

        out.raw(&frame_block)?;
        for block in &property_blocks {
            out.raw(block)?;
        }

        let count = surviving.len() as i64 - 2;
        if count > 0 {
            out.record(&[&job::LAYER_COUNT, &[int_to_byte(count)]])?;
        }

        for block in &vector_blocks {
            out.raw(block)?;
        }

        out.record(&[
            &job::WORK_INTERVAL,
            &encode_abs(travel_mm),
            &encode_abs(travel_mm),
        ])?;
        out.record(&[&job::FINISH])?;
        out.record(&[&job::STOP])?;
        out.record(&[&job::EOF])?;

        tracing::info!(
            "Job '{}' written: {} bytes, {} mm travel",
            self.name,
            out.written,
            travel_mm
        );
        Ok(())
    }

    /// Send a raw query opcode and return the response payload
    pub fn query_raw(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        let transport = self
            .transport
            .as_deref_mut()
            .ok_or(TransportError::NotOpen)?;
        tracing::debug!("Query {:02X?} on {}", request, transport.target());
        transport.query(request)
    }

    /// Send one of the known queries
    pub fn query(&mut self, query: DeviceQuery) -> Result<Vec<u8>> {
        tracing::debug!("Querying {}", query);
        self.query_raw(&query.opcode())
    }

    /// Bed width reported by the controller, in mm
    pub fn bed_width_mm(&mut self) -> Result<f64> {
        parse_dimension_mm(&self.query(DeviceQuery::BedWidth)?)
    }

    /// Bed height reported by the controller, in mm
    pub fn bed_height_mm(&mut self) -> Result<f64> {
        parse_dimension_mm(&self.query(DeviceQuery::BedHeight)?)
    }

    /// Controller model and firmware string
    pub fn model_name(&mut self) -> Result<String> {
        Ok(parse_model_name(&self.query(DeviceQuery::Version)?))
    }

    /// Close the transport and discard the job
    pub fn close(&mut self) -> Result<()> {
        self.layers.clear();
        self.current = None;
        self.frame = None;
        if let Some(mut transport) = self.transport.take() {
            transport.close()?;
            tracing::info!("Session '{}' closed", self.name);
        }
        Ok(())
    }
}

/// Byte-counting wrapper over the transport during a write pass
struct JobWriter<'a> {
    transport: &'a mut dyn Transport,
    written: usize,
}

impl JobWriter<'_> {
    fn raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.written += bytes.len();
        self.transport.write_bytes(bytes)
    }

    fn record(&mut self, parts: &[&[u8]]) -> Result<()> {
        self.raw(&record(parts))
    }
}

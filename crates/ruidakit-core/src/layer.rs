//! Layer buffering
//!
//! A layer groups motion that shares power, speed, frequency, focus and
//! preview colour. Motion is compacted into wire opcodes as it arrives; the
//! property and vector blocks are produced later, when the session writes
//! the job and has assigned the layer its sequential id.

use crate::codec::{
    encode_abs, encode_signed_rel, int_to_byte, percent_to_power, POWER_PERCENT_MAX,
    SIGNED_REL_MAX,
};
use crate::error::{CodecError, JobError, Result};
use crate::protocol::{self, motion, push_record};
use crate::units::{format_mm, um_to_mm, Micrometers, Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a layer on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerId {
    /// The bounding layer; declares the job extents and carries no vectors
    Frame,
    /// A cutting layer with its sequential id
    Index(u8),
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frame => write!(f, "frame"),
            Self::Index(id) => write!(f, "{}", id),
        }
    }
}

/// Preview colour, each channel a 0-100 percentage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub red: u8,
    /// Green
    pub green: u8,
    /// Blue
    pub blue: u8,
}

impl Color {
    /// Create a new colour
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Packed value as sent in the colour record
    pub fn packed(&self) -> i64 {
        (i64::from(self.red) << 16) | (i64::from(self.green) << 8) | i64::from(self.blue)
    }
}

/// Motion kind of a single vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stroke {
    Move,
    Cut,
}

impl Stroke {
    fn opcodes(self) -> [u8; 4] {
        match self {
            Self::Move => [
                motion::MOVE_ABS,
                motion::MOVE_REL,
                motion::MOVE_HORIZ,
                motion::MOVE_VERT,
            ],
            Self::Cut => [
                motion::CUT_ABS,
                motion::CUT_REL,
                motion::CUT_HORIZ,
                motion::CUT_VERT,
            ],
        }
    }
}

/// One buffered power/speed group
#[derive(Debug, Clone)]
pub struct Layer {
    id: LayerId,
    rect: Rect,
    min_power: u8,
    max_power: u8,
    speed: f64,
    frequency: u32,
    focus: f64,
    color: Color,
    property_bytes: Vec<u8>,
    vector_bytes: Vec<u8>,
    cursor: Point,
    travel_distance: f64,
    max_x: Micrometers,
    max_y: Micrometers,
}

impl Layer {
    /// Create a cutting layer covering `rect`
    ///
    /// The id is a placeholder until the session assigns one at write time.
    pub fn new(rect: Rect) -> Result<Self> {
        validate_rect(&rect)?;
        tracing::debug!(
            "Layer dimensions {} - {}",
            rect.top_left,
            rect.bottom_right
        );
        Ok(Self::with_id(LayerId::Index(0), rect))
    }

    /// Create the frame layer for the job extents `rect`
    pub fn frame(rect: Rect) -> Self {
        Self::with_id(LayerId::Frame, rect)
    }

    fn with_id(id: LayerId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            min_power: 0,
            max_power: 0,
            speed: 0.0,
            frequency: 0,
            focus: 0.0,
            color: Color::default(),
            property_bytes: Vec::new(),
            vector_bytes: Vec::new(),
            cursor: Point::default(),
            travel_distance: 0.0,
            max_x: 0,
            max_y: 0,
        }
    }

    /// Wire id
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Assign the sequential id used in property and vector records
    pub fn set_id(&mut self, id: u8) {
        self.id = LayerId::Index(id);
    }

    /// Whether this is the frame layer
    pub fn is_frame(&self) -> bool {
        self.id == LayerId::Frame
    }

    /// Bounding rectangle
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Set cutting speed in device units
    pub fn set_speed(&mut self, speed: f64) {
        tracing::debug!("Layer speed {}", speed);
        self.speed = speed;
    }

    /// Cutting speed in device units
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Set minimum power in percent (0..=100)
    pub fn set_min_power(&mut self, percent: u8) -> Result<()> {
        self.min_power = check_percent(percent)?;
        Ok(())
    }

    /// Set maximum power in percent (0..=100)
    pub fn set_max_power(&mut self, percent: u8) -> Result<()> {
        self.max_power = check_percent(percent)?;
        Ok(())
    }

    /// Set both power limits in percent
    pub fn set_power(&mut self, min_percent: u8, max_percent: u8) -> Result<()> {
        let min_percent = check_percent(min_percent)?;
        self.max_power = check_percent(max_percent)?;
        self.min_power = min_percent;
        Ok(())
    }

    /// Minimum power in percent
    pub fn min_power(&self) -> u8 {
        self.min_power
    }

    /// Maximum power in percent
    pub fn max_power(&self) -> u8 {
        self.max_power
    }

    /// Set pulse frequency
    pub fn set_frequency(&mut self, frequency: u32) {
        tracing::debug!("Layer frequency {}", frequency);
        self.frequency = frequency;
    }

    /// Pulse frequency
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Set focus offset in device focus units
    pub fn set_focus(&mut self, focus: f64) {
        tracing::debug!("Layer focus {}", focus);
        self.focus = focus;
    }

    /// Focus offset
    pub fn focus(&self) -> f64 {
        self.focus
    }

    /// Set the preview colour
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Preview colour
    pub fn color(&self) -> Color {
        self.color
    }

    /// Simulated head position
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Largest X and Y the head has reached
    pub fn max_extent(&self) -> Point {
        Point::new(self.max_x, self.max_y)
    }

    /// Sum of non-cutting travel in micrometers
    pub fn travel_distance(&self) -> f64 {
        self.travel_distance
    }

    /// Whether any motion has been buffered
    pub fn has_vectors(&self) -> bool {
        !self.vector_bytes.is_empty()
    }

    /// Buffered, scrambled motion opcodes
    pub fn vector_bytes(&self) -> &[u8] {
        &self.vector_bytes
    }

    /// Property block from the last [`Layer::emit_properties`]
    pub fn property_bytes(&self) -> &[u8] {
        &self.property_bytes
    }

    /// Move (`is_move`) or cut to the absolute target, in micrometers
    ///
    /// Picks the most compact opcode: absolute once the step is longer than
    /// a relative field can hold, otherwise a single-axis relative form when
    /// one delta is zero, otherwise the two-axis relative form.
    pub fn vector_to(&mut self, target: Point, is_move: bool) -> Result<()> {
        if self.is_frame() {
            return Err(JobError::FrameLayerVectors.into());
        }

        if !target.is_addressable() {
            let value = if target.x.unsigned_abs() > target.y.unsigned_abs() {
                target.x
            } else {
                target.y
            };
            return Err(JobError::CoordinateOutOfRange {
                value_mm: um_to_mm(value),
            }
            .into());
        }

        // both ends are addressable, so the deltas cannot overflow
        let dx = target.x - self.cursor.x;
        let dy = target.y - self.cursor.y;
        if dx == 0 && dy == 0 {
            return Ok(());
        }

        let distance = ((dx as f64) * (dx as f64) + (dy as f64) * (dy as f64)).sqrt();
        let stroke = if is_move { Stroke::Move } else { Stroke::Cut };
        let [abs_op, rel_op, horiz_op, vert_op] = stroke.opcodes();

        let mut record = Vec::with_capacity(11);
        if distance > SIGNED_REL_MAX as f64 {
            record.push(abs_op);
            record.extend_from_slice(&encode_abs(target.x));
            record.extend_from_slice(&encode_abs(target.y));
        } else if dx == 0 {
            record.push(vert_op);
            record.extend_from_slice(&encode_signed_rel(dy)?);
        } else if dy == 0 {
            record.push(horiz_op);
            record.extend_from_slice(&encode_signed_rel(dx)?);
        } else {
            record.push(rel_op);
            record.extend_from_slice(&encode_signed_rel(dx)?);
            record.extend_from_slice(&encode_signed_rel(dy)?);
        }

        tracing::trace!(
            "vector_to {} {:?} opcode {:02X} distance {:.1}",
            target,
            stroke,
            record[0],
            distance
        );

        if is_move {
            self.travel_distance += distance;
        }
        self.cursor = target;
        self.max_x = self.max_x.max(target.x);
        self.max_y = self.max_y.max(target.y);
        push_record(&mut self.vector_bytes, &[&record]);

        Ok(())
    }

    /// Build the property block
    ///
    /// The block is regenerated on every call from the current settings, so
    /// it always reflects the id assigned by the session.
    pub fn emit_properties(&mut self) -> Result<&[u8]> {
        self.property_bytes.clear();
        let top_left = abs_pair(self.rect.top_left);
        let bottom_right = abs_pair(self.rect.bottom_right);

        match self.id {
            LayerId::Frame => {
                tracing::debug!(
                    "Frame dimensions {} x {} mm",
                    format_mm(self.rect.width()),
                    format_mm(self.rect.height())
                );
                let out = &mut self.property_bytes;
                push_record(out, &[&protocol::frame::TOP_LEFT, &top_left]);
                push_record(out, &[&protocol::frame::BOTTOM_RIGHT, &bottom_right]);
                push_record(out, &[&protocol::frame::TOP_LEFT_ALT, &top_left]);
                push_record(out, &[&protocol::frame::BOTTOM_RIGHT_ALT, &bottom_right]);
                push_record(out, &[&protocol::frame::FILLER_E704]);
                push_record(out, &[&protocol::frame::FILLER_E705]);
            }
            LayerId::Index(id) => {
                tracing::debug!("Layer {} properties", id);
                let id = [id];
                let mut channels = Vec::with_capacity(4);
                channels.push((self.min_power, self.max_power));
                channels.extend_from_slice(&protocol::layer::FILLER_CHANNEL_PERCENT);

                let mut power_records = Vec::with_capacity(8);
                for (&(min_op, max_op), &(min_pct, max_pct)) in
                    protocol::layer::CHANNEL_POWER.iter().zip(channels.iter())
                {
                    let min = percent_to_power(min_pct)?;
                    let max = percent_to_power(max_pct)?;
                    power_records.push(([protocol::layer::POWER, min_op], min));
                    power_records.push(([protocol::layer::POWER, max_op], max));
                }

                let speed = encode_abs(self.speed as i64);
                let color = encode_abs(self.color.packed());
                let out = &mut self.property_bytes;
                push_record(out, &[&protocol::layer::SPEED, &id, &speed]);
                for (prefix, value) in &power_records {
                    push_record(out, &[prefix, &id, value]);
                }
                push_record(out, &[&protocol::layer::COLOR, &id, &color]);
                push_record(out, &[&protocol::layer::CA41, &id, &[int_to_byte(0)]]);
                push_record(out, &[&protocol::layer::TOP_LEFT, &id, &top_left]);
                push_record(out, &[&protocol::layer::BOTTOM_RIGHT, &id, &bottom_right]);
                push_record(out, &[&protocol::layer::TOP_LEFT_ALT, &id, &top_left]);
                push_record(out, &[&protocol::layer::BOTTOM_RIGHT_ALT, &id, &bottom_right]);
            }
        }

        Ok(&self.property_bytes)
    }

    /// Build the vector block: the block header followed by buffered motion
    pub fn emit_vectors(&self) -> Result<Vec<u8>> {
        let LayerId::Index(id) = self.id else {
            return Err(JobError::FrameLayerVectors.into());
        };
        tracing::debug!(
            "Layer {} vectors: {} bytes",
            id,
            self.vector_bytes.len()
        );

        let (min_op, max_op) = protocol::vectors::POWER;
        let mut out = Vec::with_capacity(self.vector_bytes.len() + 48);
        push_record(&mut out, &[&protocol::vectors::FLAGS]);
        push_record(&mut out, &[&protocol::vectors::PRIORITY, &[id]]);
        push_record(&mut out, &[&protocol::vectors::BLOW_ON]);
        let speed = encode_abs(self.speed as i64);
        let min_power = percent_to_power(self.min_power)?;
        let max_power = percent_to_power(self.max_power)?;
        push_record(&mut out, &[&protocol::vectors::SPEED, &speed]);
        push_record(&mut out, &[&[protocol::layer::POWER, min_op], &min_power]);
        push_record(&mut out, &[&[protocol::layer::POWER, max_op], &max_power]);
        push_record(&mut out, &[&protocol::vectors::MODE_ENTER]);
        push_record(&mut out, &[&protocol::vectors::MODE_ENTER_2]);
        out.extend_from_slice(&self.vector_bytes);

        Ok(out)
    }
}

/// Reject rectangles the controller cannot represent
/// A point as two consecutive absolute fields
fn abs_pair(point: Point) -> [u8; 10] {
    let mut out = [0u8; 10];
    out[..5].copy_from_slice(&encode_abs(point.x));
    out[5..].copy_from_slice(&encode_abs(point.y));
    out
}

fn check_percent(percent: u8) -> Result<u8> {
    if percent > POWER_PERCENT_MAX {
        return Err(CodecError::OutOfRange {
            value: i64::from(percent),
            min: 0,
            max: i64::from(POWER_PERCENT_MAX),
        }
        .into());
    }
    Ok(percent)
}

fn validate_rect(rect: &Rect) -> Result<()> {
    let invalid = |reason: &str| -> Result<()> {
        Err(JobError::InvalidDimensions {
            reason: reason.to_string(),
        }
        .into())
    };

    if !rect.top_left.is_addressable() || !rect.bottom_right.is_addressable() {
        return invalid("corner is beyond the addressable area");
    }
    if rect.top_left.x < 0 || rect.top_left.y < 0 {
        return invalid("top-left corner is negative");
    }
    if rect.width() <= 0 {
        return invalid("width must be positive");
    }
    if rect.height() <= 0 {
        return invalid("height must be positive");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_unsigned_rel, unscramble};
    use crate::error::Error;

    fn layer() -> Layer {
        Layer::new(Rect::new(Point::new(0, 0), Point::new(100_000, 75_000))).unwrap()
    }

    #[test]
    fn test_repeated_target_is_noop() {
        let mut layer = layer();
        layer.vector_to(Point::new(1000, 1000), true).unwrap();
        let bytes = layer.vector_bytes().len();
        let travel = layer.travel_distance();

        layer.vector_to(Point::new(1000, 1000), true).unwrap();
        assert_eq!(layer.vector_bytes().len(), bytes);
        assert_eq!(layer.travel_distance(), travel);
    }

    #[test]
    fn test_origin_target_on_fresh_layer_is_noop() {
        let mut layer = layer();
        layer.vector_to(Point::new(0, 0), false).unwrap();
        assert!(!layer.has_vectors());
    }

    #[test]
    fn test_vertical_move_uses_vertical_opcode() {
        let mut layer = layer();
        layer.vector_to(Point::new(0, 5000), true).unwrap();
        let plain = unscramble(layer.vector_bytes());
        assert_eq!(plain[0], motion::MOVE_VERT);
        assert_eq!(plain[1..], encode_signed_rel(5000).unwrap());
    }

    #[test]
    fn test_horizontal_cut_uses_horizontal_opcode() {
        let mut layer = layer();
        layer.vector_to(Point::new(-300, 0), false).unwrap();
        let plain = unscramble(layer.vector_bytes());
        assert_eq!(plain, vec![motion::CUT_HORIZ, 0x7D, 0x54]);
    }

    #[test]
    fn test_diagonal_uses_relative_opcode() {
        let mut layer = layer();
        layer.vector_to(Point::new(100, -100), false).unwrap();
        let plain = unscramble(layer.vector_bytes());
        assert_eq!(plain[0], motion::CUT_REL);
        assert_eq!(plain.len(), 5);
    }

    #[test]
    fn test_long_move_uses_absolute_opcode() {
        let mut layer = layer();
        // each axis fits a relative field, the combined distance does not
        layer.vector_to(Point::new(6000, 6000), true).unwrap();
        let plain = unscramble(layer.vector_bytes());
        assert_eq!(plain[0], motion::MOVE_ABS);
        assert_eq!(plain[1..6], encode_abs(6000));
        assert_eq!(plain[6..11], encode_abs(6000));

        let mut layer = self::layer();
        layer.vector_to(Point::new(0, 20_000), false).unwrap();
        assert_eq!(unscramble(layer.vector_bytes())[0], motion::CUT_ABS);
    }

    #[test]
    fn test_boundary_distance_stays_relative() {
        let mut layer = layer();
        layer.vector_to(Point::new(8191, 0), true).unwrap();
        assert_eq!(unscramble(layer.vector_bytes())[0], motion::MOVE_HORIZ);
        layer.vector_to(Point::new(0, 0), true).unwrap();
        assert_eq!(unscramble(layer.vector_bytes())[3], motion::MOVE_HORIZ);
        layer.vector_to(Point::new(8192, 0), true).unwrap();
        assert_eq!(unscramble(layer.vector_bytes())[6], motion::MOVE_ABS);
    }

    #[test]
    fn test_travel_excludes_cuts() {
        let mut layer = layer();
        layer.vector_to(Point::new(3000, 4000), false).unwrap();
        layer.vector_to(Point::new(3000, 9000), false).unwrap();
        assert_eq!(layer.travel_distance(), 0.0);

        layer.vector_to(Point::new(0, 5000), true).unwrap();
        assert_eq!(layer.travel_distance(), 5000.0);
        assert_eq!(layer.cursor(), Point::new(0, 5000));
        assert_eq!(layer.max_extent(), Point::new(3000, 9000));
    }

    #[test]
    fn test_frame_rejects_vectors() {
        let mut frame = Layer::frame(Rect::new(Point::new(0, 0), Point::new(10, 10)));
        let err = frame.vector_to(Point::new(5, 5), true).unwrap_err();
        assert!(matches!(err, Error::Job(JobError::FrameLayerVectors)));
        assert!(frame.emit_vectors().is_err());
    }

    #[test]
    fn test_invalid_dimensions() {
        let negative = Rect::new(Point::new(-1, 0), Point::new(10, 10));
        assert!(Layer::new(negative).is_err());
        let empty = Rect::new(Point::new(5, 5), Point::new(5, 10));
        assert!(Layer::new(empty).is_err());
        let inverted = Rect::new(Point::new(5, 5), Point::new(10, 1));
        assert!(Layer::new(inverted).is_err());
    }

    #[test]
    fn test_frame_properties() {
        let mut frame = Layer::frame(Rect::new(Point::new(0, 0), Point::new(52_000, 53_000)));
        let plain = unscramble(frame.emit_properties().unwrap());

        let mut expected = vec![0xE7, 0x03];
        expected.extend_from_slice(&[0; 10]);
        let bottom_right = [0x00, 0x00, 0x03, 0x16, 0x20, 0x00, 0x00, 0x03, 0x1E, 0x08];
        expected.extend_from_slice(&[0xE7, 0x07]);
        expected.extend_from_slice(&bottom_right);
        expected.extend_from_slice(&[0xE7, 0x50]);
        expected.extend_from_slice(&[0; 10]);
        expected.extend_from_slice(&[0xE7, 0x51]);
        expected.extend_from_slice(&bottom_right);
        expected.extend_from_slice(&protocol::frame::FILLER_E704);
        expected.extend_from_slice(&protocol::frame::FILLER_E705);
        assert_eq!(plain, expected);
    }

    #[test]
    fn test_layer_properties_layout() {
        let mut layer = layer();
        layer.set_id(3);
        layer.set_speed(100.0);
        layer.set_power(10, 60).unwrap();
        layer.set_color(Color::new(100, 0, 0));
        let plain = unscramble(layer.emit_properties().unwrap());

        // speed
        assert_eq!(plain[..3], [0xC9, 0x04, 3]);
        assert_eq!(plain[3..8], encode_abs(100));
        // channel 1 carries the real powers
        assert_eq!(plain[8..11], [0xC6, 0x31, 3]);
        assert_eq!(plain[11..13], percent_to_power(10).unwrap());
        assert_eq!(plain[13..16], [0xC6, 0x32, 3]);
        assert_eq!(plain[16..18], percent_to_power(60).unwrap());
        // channel 2 filler 18/30
        assert_eq!(plain[18..21], [0xC6, 0x41, 3]);
        assert_eq!(plain[21..23], encode_unsigned_rel(2949).unwrap());
        assert_eq!(plain[23..26], [0xC6, 0x42, 3]);
        // channels 3 and 4
        assert_eq!(plain[28..31], [0xC6, 0x35, 3]);
        assert_eq!(plain[38..41], [0xC6, 0x37, 3]);
        assert_eq!(plain[43..46], [0xC6, 0x38, 3]);
        // colour, constant, then both dimension families
        assert_eq!(plain[48..51], [0xCA, 0x06, 3]);
        assert_eq!(plain[51..56], encode_abs(100 << 16));
        assert_eq!(plain[56..60], [0xCA, 0x41, 3, 0]);
        assert_eq!(plain[60..63], [0xE7, 0x52, 3]);
        assert_eq!(plain[73..76], [0xE7, 0x53, 3]);
        assert_eq!(plain[76..86], [0x00, 0x00, 0x06, 0x0D, 0x20, 0x00, 0x00, 0x04, 0x49, 0x78]);
        assert_eq!(plain[86..89], [0xE7, 0x61, 3]);
        assert_eq!(plain[99..102], [0xE7, 0x62, 3]);
        assert_eq!(plain.len(), 112);
    }

    #[test]
    fn test_properties_regenerate_with_new_id() {
        let mut layer = layer();
        let first = layer.emit_properties().unwrap().to_vec();
        layer.set_id(1);
        let second = layer.emit_properties().unwrap().to_vec();
        assert_eq!(first.len(), second.len());
        assert_ne!(first, second);
    }

    #[test]
    fn test_vector_block_header() {
        let mut layer = layer();
        layer.set_id(2);
        layer.set_speed(50.0);
        layer.set_power(5, 40).unwrap();
        layer.vector_to(Point::new(0, 100), false).unwrap();
        let block = unscramble(&layer.emit_vectors().unwrap());

        assert_eq!(block[..3], protocol::vectors::FLAGS);
        assert_eq!(block[3..6], [0xCA, 0x02, 2]);
        assert_eq!(block[6..9], protocol::vectors::BLOW_ON);
        assert_eq!(block[9..11], protocol::vectors::SPEED);
        assert_eq!(block[11..16], encode_abs(50));
        assert_eq!(block[16..18], [0xC6, 0x01]);
        assert_eq!(block[18..20], percent_to_power(5).unwrap());
        assert_eq!(block[20..22], [0xC6, 0x02]);
        assert_eq!(block[22..24], percent_to_power(40).unwrap());
        assert_eq!(block[24..27], protocol::vectors::MODE_ENTER);
        assert_eq!(block[27..30], protocol::vectors::MODE_ENTER_2);
        assert_eq!(block[30], motion::CUT_VERT);
        assert_eq!(block.len(), 33);
    }

    #[test]
    fn test_power_above_full_scale_is_rejected() {
        let mut layer = layer();
        let err = layer.set_max_power(150).unwrap_err();
        assert!(matches!(
            err,
            Error::Codec(CodecError::OutOfRange {
                value: 150,
                min: 0,
                max: 100
            })
        ));
        assert_eq!(layer.max_power(), 0);

        layer.set_min_power(100).unwrap();
        assert!(layer.set_power(20, 101).is_err());
        assert_eq!((layer.min_power(), layer.max_power()), (100, 0));
    }

    #[test]
    fn test_unaddressable_target_is_rejected() {
        let mut layer = layer();
        layer.vector_to(Point::new(1000, 0), true).unwrap();
        let before = layer.vector_bytes().to_vec();

        let err = layer.vector_to(Point::new(i64::MIN, 0), false).unwrap_err();
        assert!(err.is_range_error());
        let err = layer.vector_to(Point::from_mm(-1e16, 0.0), false).unwrap_err();
        assert!(err.is_range_error());

        assert_eq!(layer.vector_bytes(), before.as_slice());
        assert_eq!(layer.cursor(), Point::new(1000, 0));
    }

    #[test]
    fn test_unaddressable_rect_is_rejected() {
        let rect = Rect::new(Point::new(0, 0), Point::new(i64::MAX, 10));
        assert!(matches!(
            Layer::new(rect),
            Err(Error::Job(JobError::InvalidDimensions { .. }))
        ));
    }
}

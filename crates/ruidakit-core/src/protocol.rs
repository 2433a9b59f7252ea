//! Controller opcodes and record assembly
//!
//! Opcode bytes as the controller expects them before scrambling. Records
//! are assembled from an opcode prefix and encoded payload fields, then
//! scrambled as a unit.

use crate::codec::scramble_byte;

/// Raw (unscrambled) file identifier sent first in every job.
pub const MAGIC: [u8; 3] = [0xD2, 0x9B, 0xFA];

/// Motion opcodes.
pub mod motion {
    /// Move absolute: abs(x), abs(y).
    pub const MOVE_ABS: u8 = 0x88;
    /// Move relative: rel(dx), rel(dy).
    pub const MOVE_REL: u8 = 0x89;
    /// Move relative horizontal: rel(dx).
    pub const MOVE_HORIZ: u8 = 0x8A;
    /// Move relative vertical: rel(dy).
    pub const MOVE_VERT: u8 = 0x8B;
    /// Cut absolute: abs(x), abs(y).
    pub const CUT_ABS: u8 = 0xA8;
    /// Cut relative: rel(dx), rel(dy).
    pub const CUT_REL: u8 = 0xA9;
    /// Cut relative horizontal: rel(dx).
    pub const CUT_HORIZ: u8 = 0xAA;
    /// Cut relative vertical: rel(dy).
    pub const CUT_VERT: u8 = 0xAB;
}

/// Job framing records written by the session.
pub mod job {
    /// Prepare filename.
    pub const PREPARE_FILENAME: [u8; 2] = [0xE8, 0x02];
    /// Filename record prefix; followed by the name and a zero byte.
    pub const FILENAME: [u8; 2] = [0xE7, 0x01];
    /// Start marker.
    pub const START: [u8; 3] = [0xF1, 0x02, 0x00];
    /// Red light indicator.
    pub const LIGHT_RED: [u8; 2] = [0xD8, 0x00];
    /// Feed position prefix; followed by abs(x), abs(y).
    pub const FEEDING: [u8; 2] = [0xE7, 0x06];
    /// Layer count prefix; followed by one byte.
    pub const LAYER_COUNT: [u8; 2] = [0xCA, 0x22];
    /// Work interval prefix; followed by abs(distance) twice.
    pub const WORK_INTERVAL: [u8; 4] = [0xDA, 0x01, 0x06, 0x20];
    /// Finish.
    pub const FINISH: [u8; 1] = [0xEB];
    /// Stop.
    pub const STOP: [u8; 2] = [0xE7, 0x00];
    /// End of file.
    pub const EOF: [u8; 1] = [0xD7];
}

/// Bounding-box records written for the frame layer.
pub mod frame {
    /// Global top-left, first family.
    pub const TOP_LEFT: [u8; 2] = [0xE7, 0x03];
    /// Global bottom-right, first family.
    pub const BOTTOM_RIGHT: [u8; 2] = [0xE7, 0x07];
    /// Global top-left, second family.
    pub const TOP_LEFT_ALT: [u8; 2] = [0xE7, 0x50];
    /// Global bottom-right, second family.
    pub const BOTTOM_RIGHT_ALT: [u8; 2] = [0xE7, 0x51];
    /// Filler record required after the global dimensions.
    pub const FILLER_E704: [u8; 16] = [
        0xE7, 0x04, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00,
    ];
    /// Second filler record.
    pub const FILLER_E705: [u8; 3] = [0xE7, 0x05, 0x00];
}

/// Per-layer property records; each prefix is followed by the layer id.
pub mod layer {
    /// Layer speed prefix; followed by id, abs(speed).
    pub const SPEED: [u8; 2] = [0xC9, 0x04];
    /// Layer colour prefix; followed by id, abs(rgb).
    pub const COLOR: [u8; 2] = [0xCA, 0x06];
    /// Constant record prefix; followed by id and a zero byte.
    pub const CA41: [u8; 2] = [0xCA, 0x41];
    /// Layer top-left, first family.
    pub const TOP_LEFT: [u8; 2] = [0xE7, 0x52];
    /// Layer bottom-right, first family.
    pub const BOTTOM_RIGHT: [u8; 2] = [0xE7, 0x53];
    /// Layer top-left, second family.
    pub const TOP_LEFT_ALT: [u8; 2] = [0xE7, 0x61];
    /// Layer bottom-right, second family.
    pub const BOTTOM_RIGHT_ALT: [u8; 2] = [0xE7, 0x62];
    /// Power record prefix; followed by the channel sub-opcode.
    pub const POWER: u8 = 0xC6;
    /// Per-layer (min, max) power sub-opcodes for laser channels 1 to 4.
    pub const CHANNEL_POWER: [(u8, u8); 4] =
        [(0x31, 0x32), (0x41, 0x42), (0x35, 0x36), (0x37, 0x38)];
    /// Device-required (min, max) percentages for channels 2 to 4.
    pub const FILLER_CHANNEL_PERCENT: [(u8, u8); 3] = [(18, 30), (30, 30), (30, 30)];
}

/// Records opening a layer's vector block.
pub mod vectors {
    /// Flags record written first.
    pub const FLAGS: [u8; 3] = [0xCA, 0x01, 0x00];
    /// Priority prefix; followed by the layer id.
    pub const PRIORITY: [u8; 2] = [0xCA, 0x02];
    /// Blow on. Without it the laser stays on after the job.
    pub const BLOW_ON: [u8; 3] = [0xCA, 0x01, 0x13];
    /// Inline speed prefix; followed by abs(speed).
    pub const SPEED: [u8; 2] = [0xC9, 0x02];
    /// Inline (min, max) power sub-opcodes for channel 1.
    pub const POWER: (u8, u8) = (0x01, 0x02);
    /// Vector mode enter, first record.
    pub const MODE_ENTER: [u8; 3] = [0xCA, 0x03, 0x0F];
    /// Vector mode enter, second record.
    pub const MODE_ENTER_2: [u8; 3] = [0xCA, 0x10, 0x00];
}

/// Query opcodes understood over the serial link.
pub mod query {
    /// Identify; answered with a fixed-size blob.
    pub const IDENTIFY: [u8; 4] = [0xDA, 0x00, 0x00, 0x04];
    /// Bed width in µm.
    pub const BED_WIDTH: [u8; 4] = [0xDA, 0x00, 0x00, 0x26];
    /// Bed height in µm.
    pub const BED_HEIGHT: [u8; 4] = [0xDA, 0x00, 0x00, 0x36];
    /// Firmware version string.
    pub const VERSION: [u8; 4] = [0xDA, 0x00, 0x05, 0x7F];
    /// Length of the header preceding every response payload.
    pub const RESPONSE_HEADER_LEN: usize = 4;
}

/// Concatenate record parts and append them, scrambled, to `out`.
pub fn push_record(out: &mut Vec<u8>, parts: &[&[u8]]) {
    for part in parts {
        out.extend(part.iter().copied().map(scramble_byte));
    }
}

/// Build a scrambled record from its parts.
pub fn record(parts: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(parts.iter().map(|p| p.len()).sum());
    push_record(&mut out, parts);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{scramble, unscramble};

    #[test]
    fn test_record_is_scrambled_concat() {
        let built = record(&[&job::FILENAME, b"cut", &[0x00]]);
        assert_eq!(built, scramble(&[0xE7, 0x01, b'c', b'u', b't', 0x00]));
        assert_eq!(unscramble(&built)[..2], job::FILENAME);
    }

    #[test]
    fn test_push_record_appends() {
        let mut out = vec![0x42];
        push_record(&mut out, &[&job::EOF]);
        assert_eq!(out, vec![0x42, scramble(&job::EOF)[0]]);
    }
}

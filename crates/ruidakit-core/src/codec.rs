//! Wire codec
//!
//! Pure transforms used to build controller records:
//! - the per-byte scrambling transform and its inverse
//! - two-byte relative encodings (signed and unsigned, 7 bits per byte)
//! - five-byte absolute encoding (35-bit fixed point, 7 bits per byte)
//! - percentage to power-field conversion
//!
//! Every multi-byte field is big-endian with the top bit of each byte clear.

use crate::error::CodecError;

/// Smallest value accepted by [`encode_signed_rel`].
pub const SIGNED_REL_MIN: i64 = -8192;
/// Largest value accepted by [`encode_signed_rel`].
pub const SIGNED_REL_MAX: i64 = 8191;
/// Largest value accepted by [`encode_unsigned_rel`].
pub const UNSIGNED_REL_MAX: i64 = 16383;
/// Largest percentage accepted by [`percent_to_power`].
pub const POWER_PERCENT_MAX: u8 = 100;

/// Bias added to negative signed relative values (two's complement in 14 bits).
const SIGNED_REL_BIAS: i64 = 16384;
/// One power-field unit in percent (100 / 2^14 as the controller rounds it).
const POWER_STEP_PERCENT: f64 = 0.006103516;

/// Parse a hex literal such as `"DA00057F"` into bytes.
///
/// ASCII whitespace between digits is ignored, so `"DA 00 05 7F"` works too.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, CodecError> {
    let digits: Vec<u8> = hex
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let invalid = || CodecError::InvalidHex {
        input: hex.to_string(),
    };

    if digits.len() % 2 != 0 {
        return Err(invalid());
    }

    digits
        .chunks(2)
        .map(|pair| {
            let high = (pair[0] as char).to_digit(16).ok_or_else(invalid)?;
            let low = (pair[1] as char).to_digit(16).ok_or_else(invalid)?;
            Ok(((high << 4) | low) as u8)
        })
        .collect()
}

/// Format bytes as an upper-case hex string with single spaces.
pub fn bytes_to_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate an integer to its low byte.
pub fn int_to_byte(value: i64) -> u8 {
    (value & 0xff) as u8
}

/// Swap bit 7 and bit 0.
fn swap_outer_bits(value: u8) -> u8 {
    let high = (value >> 7) & 0x01;
    let low = value & 0x01;
    (value & 0x7e) | high | (low << 7)
}

/// Scramble a single byte.
pub fn scramble_byte(value: u8) -> u8 {
    (swap_outer_bits(value) ^ 0x88).wrapping_add(1)
}

/// Undo [`scramble_byte`].
pub fn unscramble_byte(value: u8) -> u8 {
    swap_outer_bits(value.wrapping_sub(1) ^ 0x88)
}

/// Scramble a byte sequence.
pub fn scramble(data: &[u8]) -> Vec<u8> {
    data.iter().copied().map(scramble_byte).collect()
}

/// Unscramble a byte sequence.
pub fn unscramble(data: &[u8]) -> Vec<u8> {
    data.iter().copied().map(unscramble_byte).collect()
}

/// Split a 14-bit value into two 7-bit groups, most significant first.
fn split_14(value: i64) -> [u8; 2] {
    [((value >> 7) & 0x7f) as u8, (value & 0x7f) as u8]
}

/// Encode a signed relative value in `[-8192, 8191]`.
pub fn encode_signed_rel(value: i64) -> Result<[u8; 2], CodecError> {
    if !(SIGNED_REL_MIN..=SIGNED_REL_MAX).contains(&value) {
        return Err(CodecError::OutOfRange {
            value,
            min: SIGNED_REL_MIN,
            max: SIGNED_REL_MAX,
        });
    }
    let biased = if value < 0 {
        value + SIGNED_REL_BIAS
    } else {
        value
    };
    Ok(split_14(biased))
}

/// Encode an unsigned relative value in `[0, 16383]`.
pub fn encode_unsigned_rel(value: i64) -> Result<[u8; 2], CodecError> {
    if !(0..=UNSIGNED_REL_MAX).contains(&value) {
        return Err(CodecError::OutOfRange {
            value,
            min: 0,
            max: UNSIGNED_REL_MAX,
        });
    }
    Ok(split_14(value))
}

/// Encode an absolute value as five 7-bit groups, most significant first.
///
/// Only the low 35 bits survive; larger magnitudes wrap silently.
pub fn encode_abs(value: i64) -> [u8; 5] {
    let mut out = [0u8; 5];
    let mut rest = value;
    for slot in out.iter_mut().rev() {
        *slot = (rest & 0x7f) as u8;
        rest >>= 7;
    }
    out
}

/// Decode a five-byte absolute value starting at `offset`.
pub fn decode_abs(data: &[u8], offset: usize) -> Result<i64, CodecError> {
    let field = data
        .get(offset..offset + 5)
        .ok_or(CodecError::InsufficientData {
            needed: offset + 5,
            available: data.len(),
        })?;
    Ok(field
        .iter()
        .fold(0i64, |acc, byte| (acc << 7) | i64::from(byte & 0x7f)))
}

/// Convert a percentage to a two-byte power field.
///
/// 100 % lands one step past the field, so full scale saturates at 0x3FFF.
pub fn percent_to_power(percent: u8) -> Result<[u8; 2], CodecError> {
    if percent > POWER_PERCENT_MAX {
        return Err(CodecError::OutOfRange {
            value: i64::from(percent),
            min: 0,
            max: i64::from(POWER_PERCENT_MAX),
        });
    }
    let raw = (f64::from(percent) / POWER_STEP_PERCENT).round() as i64;
    encode_unsigned_rel(raw.min(UNSIGNED_REL_MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scramble_known_values() {
        assert_eq!(scramble_byte(0x00), 0x89);
        assert_eq!(scramble_byte(0x01), 0x09);
        assert_eq!(scramble_byte(0x80), 0x8A);
        assert_eq!(scramble(&[0xD7]), vec![scramble_byte(0xD7)]);
    }

    #[test]
    fn test_unscramble_every_byte() {
        for value in 0..=255u8 {
            assert_eq!(unscramble_byte(scramble_byte(value)), value);
        }
    }

    #[test]
    fn test_scramble_preserves_order() {
        let data = [0xE7, 0x01, 0x41, 0x00];
        let scrambled = scramble(&data);
        assert_eq!(scrambled.len(), data.len());
        assert_eq!(scrambled[2], scramble_byte(0x41));
        assert_eq!(unscramble(&scrambled), data.to_vec());
    }

    #[test]
    fn test_signed_rel_bounds() {
        assert_eq!(encode_signed_rel(8191).unwrap(), [0x3F, 0x7F]);
        assert_eq!(encode_signed_rel(-8192).unwrap(), [0x40, 0x00]);
        assert_eq!(encode_signed_rel(-1).unwrap(), [0x7F, 0x7F]);
        assert_eq!(encode_signed_rel(0).unwrap(), [0x00, 0x00]);
        assert!(encode_signed_rel(8192).is_err());
        assert!(encode_signed_rel(-8193).is_err());
    }

    #[test]
    fn test_unsigned_rel_bounds() {
        assert_eq!(encode_unsigned_rel(16383).unwrap(), [0x7F, 0x7F]);
        assert_eq!(encode_unsigned_rel(200).unwrap(), [0x01, 0x48]);
        assert_eq!(
            encode_unsigned_rel(16384),
            Err(CodecError::OutOfRange {
                value: 16384,
                min: 0,
                max: 16383
            })
        );
        assert!(encode_unsigned_rel(-1).is_err());
    }

    #[test]
    fn test_encode_abs() {
        assert_eq!(encode_abs(0), [0, 0, 0, 0, 0]);
        assert_eq!(encode_abs(1000), [0x00, 0x00, 0x00, 0x07, 0x68]);
        // 52.0 mm and 53.0 mm from a captured bounding-box record
        assert_eq!(encode_abs(52_000), [0x00, 0x00, 0x03, 0x16, 0x20]);
        assert_eq!(encode_abs(53_000), [0x00, 0x00, 0x03, 0x1E, 0x08]);
        // 100.0 mm and 75.0 mm from a captured layer record
        assert_eq!(encode_abs(100_000), [0x00, 0x00, 0x06, 0x0D, 0x20]);
        assert_eq!(encode_abs(75_000), [0x00, 0x00, 0x04, 0x49, 0x78]);
    }

    #[test]
    fn test_encode_abs_wraps() {
        let wrapped = encode_abs(1 << 35);
        assert_eq!(wrapped, [0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_abs() {
        let data = [0xFF, 0x00, 0x00, 0x03, 0x16, 0x20];
        assert_eq!(decode_abs(&data, 1).unwrap(), 52_000);
        assert_eq!(
            decode_abs(&data, 2),
            Err(CodecError::InsufficientData {
                needed: 7,
                available: 6
            })
        );
    }

    #[test]
    fn test_percent_to_power() {
        assert_eq!(percent_to_power(0).unwrap(), [0x00, 0x00]);
        // 18 % -> 2949 -> 0x17 0x05
        assert_eq!(percent_to_power(18).unwrap(), encode_unsigned_rel(2949).unwrap());
        assert_eq!(percent_to_power(30).unwrap(), encode_unsigned_rel(4915).unwrap());
        assert_eq!(percent_to_power(100).unwrap(), [0x7F, 0x7F]);
        assert!(percent_to_power(101).is_err());
    }

    #[test]
    fn test_hex_helpers() {
        assert_eq!(hex_to_bytes("DA00057F").unwrap(), vec![0xDA, 0x00, 0x05, 0x7F]);
        assert_eq!(hex_to_bytes("ca 01 13").unwrap(), vec![0xCA, 0x01, 0x13]);
        assert!(hex_to_bytes("ABC").is_err());
        assert!(hex_to_bytes("ZZ").is_err());
        assert_eq!(bytes_to_hex(&[0xD2, 0x9B, 0xFA]), "D2 9B FA");
        assert_eq!(int_to_byte(258), 0x02);
        assert_eq!(int_to_byte(-1), 0xFF);
    }
}

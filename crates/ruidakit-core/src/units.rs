//! Unit conversion utilities
//!
//! Callers speak millimeters; the controller speaks micrometers. Positions
//! are kept as integer micrometers so that "no movement" is an exact test.

use crate::error::JobError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Micrometers per millimeter.
pub const UM_PER_MM: f64 = 1000.0;

/// A length in micrometers.
pub type Micrometers = i64;

/// Largest coordinate magnitude a five-byte absolute field carries (35-bit
/// two's complement).
pub const MAX_COORDINATE_UM: Micrometers = (1 << 34) - 1;

/// Convert millimeters to whole micrometers (rounded to nearest).
pub fn mm_to_um(mm: f64) -> Micrometers {
    (mm * UM_PER_MM).round() as Micrometers
}

/// Convert millimeters to micrometers, rejecting values the controller
/// cannot address.
pub fn checked_mm_to_um(mm: f64) -> Result<Micrometers, JobError> {
    let um = (mm * UM_PER_MM).round();
    if !um.is_finite() || um.abs() > MAX_COORDINATE_UM as f64 {
        return Err(JobError::CoordinateOutOfRange { value_mm: mm });
    }
    Ok(um as Micrometers)
}

/// Convert micrometers to millimeters.
pub fn um_to_mm(um: Micrometers) -> f64 {
    um as f64 / UM_PER_MM
}

/// A point in micrometers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: Micrometers,
    /// Y coordinate
    pub y: Micrometers,
}

impl Point {
    /// Create a new point
    pub const fn new(x: Micrometers, y: Micrometers) -> Self {
        Self { x, y }
    }

    /// Create a point from millimeter coordinates
    pub fn from_mm(x_mm: f64, y_mm: f64) -> Self {
        Self::new(mm_to_um(x_mm), mm_to_um(y_mm))
    }

    /// Create a point from millimeter coordinates, rejecting NaN, infinities
    /// and anything beyond [`MAX_COORDINATE_UM`]
    pub fn try_from_mm(x_mm: f64, y_mm: f64) -> Result<Self, JobError> {
        Ok(Self::new(checked_mm_to_um(x_mm)?, checked_mm_to_um(y_mm)?))
    }

    /// Whether both coordinates fit an absolute field
    pub fn is_addressable(&self) -> bool {
        self.x.unsigned_abs() <= MAX_COORDINATE_UM as u64
            && self.y.unsigned_abs() <= MAX_COORDINATE_UM as u64
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}) mm", um_to_mm(self.x), um_to_mm(self.y))
    }
}

/// An axis-aligned rectangle in micrometers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub top_left: Point,
    /// Bottom-right corner
    pub bottom_right: Point,
}

impl Rect {
    /// Create a rectangle from its corners
    pub const fn new(top_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Width in micrometers
    pub fn width(&self) -> Micrometers {
        self.bottom_right.x - self.top_left.x
    }

    /// Height in micrometers
    pub fn height(&self) -> Micrometers {
        self.bottom_right.y - self.top_left.y
    }
}

/// Format a micrometer length as millimeters for display
pub fn format_mm(um: Micrometers) -> String {
    format!("{:.3}", um_to_mm(um))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_um_conversion() {
        assert_eq!(mm_to_um(52.0), 52_000);
        assert_eq!(mm_to_um(0.0004), 0);
        assert_eq!(mm_to_um(0.0006), 1);
        assert_eq!(mm_to_um(-1.5), -1500);
        assert_eq!(um_to_mm(2500), 2.5);
    }

    #[test]
    fn test_checked_conversion() {
        assert_eq!(checked_mm_to_um(-1.5), Ok(-1500));
        assert!(checked_mm_to_um(f64::NAN).is_err());
        assert!(checked_mm_to_um(f64::INFINITY).is_err());
        assert_eq!(
            checked_mm_to_um(1e16),
            Err(JobError::CoordinateOutOfRange { value_mm: 1e16 })
        );

        let edge = um_to_mm(MAX_COORDINATE_UM);
        assert_eq!(checked_mm_to_um(edge), Ok(MAX_COORDINATE_UM));
        assert!(Point::try_from_mm(edge, -edge).unwrap().is_addressable());
        assert!(!Point::from_mm(1e16, 0.0).is_addressable());
        assert!(!Point::new(i64::MIN, 0).is_addressable());
    }

    #[test]
    fn test_rect_size() {
        let rect = Rect::new(Point::from_mm(10.0, 20.0), Point::from_mm(60.0, 25.0));
        assert_eq!(rect.width(), 50_000);
        assert_eq!(rect.height(), 5_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Point::new(1500, 250).to_string(), "(1.500, 0.250) mm");
        assert_eq!(format_mm(52_000), "52.000");
    }
}

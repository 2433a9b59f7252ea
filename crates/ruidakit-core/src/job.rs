//! Job description consumed by a session
//!
//! Adapters that turn vector or raster jobs into laser motion hand the
//! session one [`JobPart`] per layer: a bounding rectangle plus an ordered
//! list of [`JobCommand`]s. Coordinates are millimeters.

use serde::{Deserialize, Serialize};

/// A settable layer property
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "property", content = "value", rename_all = "snake_case")]
pub enum LayerProperty {
    /// Minimum power in percent
    MinPower(u8),
    /// Maximum power in percent
    MaxPower(u8),
    /// Speed in device units
    Speed(f64),
    /// Pulse frequency
    Frequency(u32),
    /// Focus offset in device focus units
    Focus(f64),
}

/// One step of a job part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobCommand {
    /// Move with the laser off
    MoveTo {
        /// X in mm
        x: f64,
        /// Y in mm
        y: f64,
    },
    /// Cut with the laser on
    LineTo {
        /// X in mm
        x: f64,
        /// Y in mm
        y: f64,
    },
    /// Change a property of the current layer
    SetProperty(LayerProperty),
}

impl JobCommand {
    /// Clamp power percentages into `0..=max_power`
    pub fn clamped(self, max_power: u8) -> Self {
        match self {
            Self::SetProperty(LayerProperty::MinPower(p)) => {
                Self::SetProperty(LayerProperty::MinPower(p.min(max_power)))
            }
            Self::SetProperty(LayerProperty::MaxPower(p)) => {
                Self::SetProperty(LayerProperty::MaxPower(p.min(max_power)))
            }
            other => other,
        }
    }
}

/// A job part: one layer's worth of motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPart {
    /// Left edge in mm
    pub x: f64,
    /// Top edge in mm
    pub y: f64,
    /// Width in mm
    pub width: f64,
    /// Height in mm
    pub height: f64,
    /// Commands in execution order
    #[serde(default)]
    pub commands: Vec<JobCommand>,
}

impl JobPart {
    /// Create an empty part
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Append a command
    pub fn push(&mut self, command: JobCommand) -> &mut Self {
        self.commands.push(command);
        self
    }

    /// Iterate the commands in order; restartable
    pub fn commands(&self) -> impl Iterator<Item = JobCommand> + '_ {
        self.commands.iter().copied()
    }
}

/// A named job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Name uploaded to the controller
    pub name: String,
    /// Parts in creation order
    pub parts: Vec<JobPart>,
}

impl Job {
    /// Parse a job from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

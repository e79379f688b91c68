//! Command types accepted by an encoding session

use crate::constants::{MoveFlags, EXTRUDER_COUNT};
use serde::{Deserialize, Serialize};

/// Toolhead coordinates in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
    /// Z coordinate
    pub z: f32,
}

impl Position {
    /// Create a position
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// A single move, with `flags` selecting which fields are meaningful
///
/// Fields whose flag is clear are ignored by both the encoder and the
/// statistics tracker. The builder methods set the matching flag.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "MoveFields", into = "MoveFields")]
pub struct Move {
    /// Present fields
    pub flags: MoveFlags,
    /// Feedrate in mm/min
    pub feedrate: f32,
    /// Target X
    pub x: f32,
    /// Target Y
    pub y: f32,
    /// Target Z
    pub z: f32,
    /// Target extruder positions
    pub e: [f32; EXTRUDER_COUNT],
}

impl Move {
    /// Empty move with no fields present
    pub fn new() -> Self {
        Self::default()
    }

    /// Move from raw flags and values, as a slicer backend would emit it
    #[allow(clippy::too_many_arguments)]
    pub fn from_raw(flags: u8, feedrate: f32, x: f32, y: f32, z: f32, e0: f32, e1: f32, e2: f32) -> Self {
        Self {
            flags: MoveFlags::new(flags),
            feedrate,
            x,
            y,
            z,
            e: [e0, e1, e2],
        }
    }

    /// Set the feedrate
    pub fn feedrate(mut self, feedrate: f32) -> Self {
        self.flags = self.flags.with(MoveFlags::HAS_FEEDRATE);
        self.feedrate = feedrate;
        self
    }

    /// Set X
    pub fn x(mut self, x: f32) -> Self {
        self.flags = self.flags.with(MoveFlags::HAS_X);
        self.x = x;
        self
    }

    /// Set Y
    pub fn y(mut self, y: f32) -> Self {
        self.flags = self.flags.with(MoveFlags::HAS_Y);
        self.y = y;
        self
    }

    /// Set Z
    pub fn z(mut self, z: f32) -> Self {
        self.flags = self.flags.with(MoveFlags::HAS_Z);
        self.z = z;
        self
    }

    /// Set the position of extruder `index`; out-of-range indices are ignored
    pub fn extruder(mut self, index: usize, value: f32) -> Self {
        if index < EXTRUDER_COUNT {
            self.flags = self.flags.with(MoveFlags::extruder_bit(index));
            self.e[index] = value;
        }
        self
    }
}

/// Serialized shape of a [`Move`]: absent fields are simply omitted
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct MoveFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feedrate: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    z: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    e0: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    e1: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    e2: Option<f32>,
}

impl From<MoveFields> for Move {
    fn from(f: MoveFields) -> Self {
        let mut mv = Move::new();
        if let Some(v) = f.feedrate {
            mv = mv.feedrate(v);
        }
        if let Some(v) = f.x {
            mv = mv.x(v);
        }
        if let Some(v) = f.y {
            mv = mv.y(v);
        }
        if let Some(v) = f.z {
            mv = mv.z(v);
        }
        for (i, v) in [f.e0, f.e1, f.e2].into_iter().enumerate() {
            if let Some(v) = v {
                mv = mv.extruder(i, v);
            }
        }
        mv
    }
}

impl From<Move> for MoveFields {
    fn from(mv: Move) -> Self {
        let flags = mv.flags;
        let pick = |present: bool, v: f32| present.then_some(v);
        Self {
            feedrate: pick(flags.has_feedrate(), mv.feedrate),
            x: pick(flags.has_x(), mv.x),
            y: pick(flags.has_y(), mv.y),
            z: pick(flags.has_z(), mv.z),
            e0: pick(flags.has_extruder(0), mv.e[0]),
            e1: pick(flags.has_extruder(1), mv.e[1]),
            e2: pick(flags.has_extruder(2), mv.e[2]),
        }
    }
}

/// One high-level printer instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Linear move
    Move(Move),
    /// Home all axes
    Home,
    /// Pause the job
    Pause {
        /// Move to the standby position while paused
        #[serde(default)]
        to_standby: bool,
    },
    /// Dwell
    Sleep {
        /// Duration in seconds
        seconds: f32,
    },
    /// Set the toolhead heater target
    SetHeaterTemperature {
        /// Target temperature in degrees Celsius
        temperature: f32,
        /// Block until the target is reached
        #[serde(default)]
        wait: bool,
    },
    /// Set the toolhead fan
    SetFanSpeed {
        /// Fan strength
        strength: f32,
    },
    /// Set the toolhead PWM output
    SetPwm {
        /// PWM strength
        strength: f32,
    },
    /// Energize the steppers
    EnableMotor,
    /// Release the steppers
    DisableMotor,
    /// Position marker
    Anchor {
        /// Marker value
        value: u32,
    },
    /// Free-form comment
    Comment {
        /// Comment text
        message: String,
    },
    /// Problem reported by the command producer
    Error {
        /// Whether the problem is fatal for the print
        #[serde(default)]
        critical: bool,
        /// Description
        message: String,
    },
}

impl From<Move> for Command {
    fn from(mv: Move) -> Self {
        Command::Move(mv)
    }
}

//! Constants and opcodes for the FCode v1 container format

use serde::{Deserialize, Serialize};

/// File magic - 8 bytes at offset 0
pub const MAGIC: &[u8; 8] = b"FCx0001\n";

/// Format version written into the `VERSION` metadata entry
pub const FORMAT_VERSION: &str = "1";

/// Size of every length, checksum and terminator field in bytes
pub const FIELD_SIZE: usize = 4;

/// Margin added to the bounding extents reported in metadata (mm)
pub const EXTENT_MARGIN: f64 = 0.2;

/// Default home position (mm), substituted into the tracked position on `home()`
pub const DEFAULT_HOME: (f32, f32, f32) = (0.0, 0.0, 240.0);

/// Number of independent extruders a move can address
pub const EXTRUDER_COUNT: usize = 3;

/// Command opcodes written at the start of every record in the script region
pub mod opcode {
    /// Move to home position
    pub const HOME: u8 = 1;
    /// Dwell, payload is milliseconds
    pub const SLEEP: u8 = 4;
    /// Pause and move to standby position
    pub const PAUSE_TO_STANDBY: u8 = 5;
    /// Pause in place
    pub const PAUSE_IN_PLACE: u8 = 6;
    /// Set toolhead heater temperature without waiting
    pub const HEATER: u8 = 16;
    /// Set toolhead heater temperature and wait
    pub const HEATER_WAIT: u8 = 24;
    /// Toolhead PWM strength
    pub const TOOLHEAD_PWM: u8 = 32;
    /// Toolhead fan speed
    pub const TOOLHEAD_FAN: u8 = 48;
    /// High bit marking a move record; the low seven bits carry the move flags
    pub const MOVE: u8 = 128;
}

/// Flags describing which fields a move carries (stored in the low bits of the opcode)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveFlags(u8);

impl MoveFlags {
    /// No fields present
    pub const NONE: u8 = 0b0000_0000;

    /// Move carries a feedrate (mm/min)
    pub const HAS_FEEDRATE: u8 = 0b0100_0000;

    /// Move carries an X coordinate
    pub const HAS_X: u8 = 0b0010_0000;

    /// Move carries a Y coordinate
    pub const HAS_Y: u8 = 0b0001_0000;

    /// Move carries a Z coordinate
    pub const HAS_Z: u8 = 0b0000_1000;

    /// Move carries extruder 0 position
    pub const HAS_E0: u8 = 0b0000_0100;

    /// Move carries extruder 1 position
    pub const HAS_E1: u8 = 0b0000_0010;

    /// Move carries extruder 2 position
    pub const HAS_E2: u8 = 0b0000_0001;

    /// Every bit a move opcode may carry
    pub const ALL: u8 = 0b0111_1111;

    /// Create new flags from raw byte, dropping the move marker bit
    pub const fn new(flags: u8) -> Self {
        Self(flags & Self::ALL)
    }

    /// Get raw flags byte
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Flag bit for extruder `index` (0..3)
    pub const fn extruder_bit(index: usize) -> u8 {
        Self::HAS_E0 >> index
    }

    /// Check if a feedrate is present
    pub const fn has_feedrate(&self) -> bool {
        (self.0 & Self::HAS_FEEDRATE) != 0
    }

    /// Check if X is present
    pub const fn has_x(&self) -> bool {
        (self.0 & Self::HAS_X) != 0
    }

    /// Check if Y is present
    pub const fn has_y(&self) -> bool {
        (self.0 & Self::HAS_Y) != 0
    }

    /// Check if Z is present
    pub const fn has_z(&self) -> bool {
        (self.0 & Self::HAS_Z) != 0
    }

    /// Check if extruder `index` is present
    pub const fn has_extruder(&self, index: usize) -> bool {
        index < EXTRUDER_COUNT && (self.0 & Self::extruder_bit(index)) != 0
    }

    /// Check if any of X, Y or Z is present
    pub const fn is_positional(&self) -> bool {
        (self.0 & (Self::HAS_X | Self::HAS_Y | Self::HAS_Z)) != 0
    }

    /// Check if an extruder axis is present without X, Y or Z
    pub const fn is_extrusion_only(&self) -> bool {
        !self.is_positional() && (self.0 & (Self::HAS_E0 | Self::HAS_E1 | Self::HAS_E2)) != 0
    }

    /// Opcode byte for a move with these flags
    pub const fn opcode(&self) -> u8 {
        opcode::MOVE | self.0
    }

    /// Return a copy with `bits` set
    pub const fn with(self, bits: u8) -> Self {
        Self::new(self.0 | bits)
    }
}

impl Default for MoveFlags {
    fn default() -> Self {
        Self(Self::NONE)
    }
}

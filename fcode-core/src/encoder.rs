//! Command encoding into the script region
//!
//! Every record is an opcode byte followed by zero or more little-endian
//! `f32` fields:
//!
//! | command            | opcode          | payload                          |
//! |--------------------|-----------------|----------------------------------|
//! | move               | `128 \| flags`  | feedrate?, x?, y?, z?, e0?, e1?, e2? |
//! | home               | 1               | -                                |
//! | sleep              | 4               | milliseconds                     |
//! | pause              | 5 (standby) / 6 | -                                |
//! | heater             | 16 / 24 (wait)  | temperature                      |
//! | toolhead pwm       | 32              | strength                         |
//! | toolhead fan       | 48              | strength                         |
//!
//! All record bytes fold into the script checksum.

use crate::constants::opcode;
use crate::diagnostics::Diagnostics;
use crate::sink::ByteSink;
use crate::types::Move;
use crate::writer::PrimitiveWriter;

/// Maps commands to records and keeps the script checksum
#[derive(Debug, Clone, Default)]
pub struct CommandEncoder {
    script_crc: u32,
}

impl CommandEncoder {
    /// Encoder with an empty checksum
    pub fn new() -> Self {
        Self::default()
    }

    /// Checksum over every record written so far
    pub fn script_checksum(&self) -> u32 {
        self.script_crc
    }

    /// Encode a move; fields are emitted in flag order, absent ones skipped
    ///
    /// A flagged feedrate that is not positive is dropped from the payload
    /// while its flag stays in the opcode.
    pub fn move_to<S: ByteSink>(&mut self, w: &mut PrimitiveWriter<S>, mv: &Move) {
        let flags = mv.flags;
        let crc = &mut self.script_crc;

        w.write_command(flags.opcode(), Some(&mut *crc));

        if flags.has_feedrate() && mv.feedrate > 0.0 {
            w.write_f32(mv.feedrate, Some(&mut *crc));
        }
        if flags.has_x() {
            w.write_f32(mv.x, Some(&mut *crc));
        }
        if flags.has_y() {
            w.write_f32(mv.y, Some(&mut *crc));
        }
        if flags.has_z() {
            w.write_f32(mv.z, Some(&mut *crc));
        }
        for (i, &e) in mv.e.iter().enumerate() {
            if flags.has_extruder(i) {
                w.write_f32(e, Some(&mut *crc));
            }
        }
    }

    /// Encode a home command
    pub fn home<S: ByteSink>(&mut self, w: &mut PrimitiveWriter<S>) {
        w.write_command(opcode::HOME, Some(&mut self.script_crc));
    }

    /// Encode a pause
    pub fn pause<S: ByteSink>(&mut self, w: &mut PrimitiveWriter<S>, to_standby: bool) {
        let op = if to_standby {
            opcode::PAUSE_TO_STANDBY
        } else {
            opcode::PAUSE_IN_PLACE
        };
        w.write_command(op, Some(&mut self.script_crc));
    }

    /// Encode a dwell; the payload is in milliseconds
    pub fn sleep<S: ByteSink>(&mut self, w: &mut PrimitiveWriter<S>, seconds: f32) {
        self.record(w, opcode::SLEEP, seconds * 1000.0);
    }

    /// Encode a heater target
    pub fn set_toolhead_heater_temperature<S: ByteSink>(
        &mut self,
        w: &mut PrimitiveWriter<S>,
        temperature: f32,
        wait: bool,
    ) {
        let op = if wait { opcode::HEATER_WAIT } else { opcode::HEATER };
        self.record(w, op, temperature);
    }

    /// Encode a fan speed
    pub fn set_toolhead_fan_speed<S: ByteSink>(&mut self, w: &mut PrimitiveWriter<S>, strength: f32) {
        self.record(w, opcode::TOOLHEAD_FAN, strength);
    }

    /// Encode a PWM strength
    pub fn set_toolhead_pwm<S: ByteSink>(&mut self, w: &mut PrimitiveWriter<S>, strength: f32) {
        self.record(w, opcode::TOOLHEAD_PWM, strength);
    }

    /// Motor control has no v1 opcode
    pub fn enable_motor(&mut self, diag: &mut Diagnostics) {
        diag.unsupported("ENABLE_MOTOR");
    }

    /// Motor control has no v1 opcode
    pub fn disable_motor(&mut self, diag: &mut Diagnostics) {
        diag.unsupported("DISABLE_MOTOR");
    }

    /// Anchors are not encoded in v1
    pub fn anchor(&mut self, _value: u32) {}

    /// Comments are not encoded in v1
    pub fn comment(&mut self, _message: &str) {}

    /// Record a problem reported by the command producer
    pub fn on_error(&mut self, diag: &mut Diagnostics, critical: bool, message: &str) {
        diag.report(critical, message);
    }

    fn record<S: ByteSink>(&mut self, w: &mut PrimitiveWriter<S>, op: u8, value: f32) {
        w.write_command(op, Some(&mut self.script_crc));
        w.write_f32(value, Some(&mut self.script_crc));
    }
}

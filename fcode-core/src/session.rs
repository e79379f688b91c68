//! Encoding session: one sink, one container, one command stream
//!
//! Each operation first updates the statistics, then encodes the command.
//! After `terminate` the session is inert and further operations are ignored.
//! Dropping an unterminated session terminates it.

use crate::config::EncoderConfig;
use crate::diagnostics::Diagnostics;
use crate::encoder::CommandEncoder;
use crate::error::FcodeError;
use crate::framer::{ContainerFramer, FramerState};
use crate::metadata;
use crate::sink::{ByteSink, FileSink, MemorySink};
use crate::stats::{Statistics, StatsTracker};
use crate::types::{Command, Move, Position};
use crate::writer::PrimitiveWriter;
use bytes::Bytes;
use std::path::Path;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Encoder for a single FCode container
#[derive(Debug)]
pub struct FcodeSession<S: ByteSink> {
    writer: PrimitiveWriter<S>,
    encoder: CommandEncoder,
    stats: StatsTracker,
    framer: ContainerFramer,
    diagnostics: Diagnostics,
    config: EncoderConfig,
}

/// Session writing into memory
pub type MemorySession = FcodeSession<MemorySink>;

/// Session writing to a file
pub type FileSession = FcodeSession<FileSink>;

impl<S: ByteSink> FcodeSession<S> {
    /// Validate `config` and write the container header into `sink`
    pub fn new(sink: S, config: EncoderConfig) -> Result<Self, FcodeError> {
        config.validate()?;
        Self::start(sink, config)
    }

    /// Write the container header for an already validated `config`
    fn start(sink: S, config: EncoderConfig) -> Result<Self, FcodeError> {
        let mut writer = PrimitiveWriter::new(sink);
        let mut framer = ContainerFramer::new();
        framer.begin(&mut writer)?;

        Ok(Self {
            writer,
            encoder: CommandEncoder::new(),
            stats: StatsTracker::new(config.home),
            framer,
            diagnostics: Diagnostics::new(),
            config,
        })
    }

    fn is_active(&self) -> bool {
        self.framer.state() == FramerState::Open
    }

    /// Move the toolhead
    pub fn move_to(&mut self, mv: &Move) {
        if !self.is_active() {
            return;
        }
        self.stats.record_move(mv, &mut self.diagnostics);
        self.encoder.move_to(&mut self.writer, mv);
    }

    /// Move using the raw flag-driven signature
    #[allow(clippy::too_many_arguments)]
    pub fn moveto(&mut self, flags: u8, feedrate: f32, x: f32, y: f32, z: f32, e0: f32, e1: f32, e2: f32) {
        self.move_to(&Move::from_raw(flags, feedrate, x, y, z, e0, e1, e2));
    }

    /// Home all axes
    pub fn home(&mut self) {
        if !self.is_active() {
            return;
        }
        self.stats.record_home();
        self.encoder.home(&mut self.writer);
    }

    /// Pause, optionally parking at the standby position
    pub fn pause(&mut self, to_standby: bool) {
        if self.is_active() {
            self.encoder.pause(&mut self.writer, to_standby);
        }
    }

    /// Dwell for `seconds`
    pub fn sleep(&mut self, seconds: f32) {
        if !self.is_active() {
            return;
        }
        self.stats.record_sleep(seconds, &mut self.diagnostics);
        self.encoder.sleep(&mut self.writer, seconds);
    }

    /// Set the heater target, optionally waiting for it
    pub fn set_toolhead_heater_temperature(&mut self, temperature: f32, wait: bool) {
        if self.is_active() {
            self.encoder
                .set_toolhead_heater_temperature(&mut self.writer, temperature, wait);
        }
    }

    /// Set the toolhead fan
    pub fn set_toolhead_fan_speed(&mut self, strength: f32) {
        if self.is_active() {
            self.encoder.set_toolhead_fan_speed(&mut self.writer, strength);
        }
    }

    /// Set the toolhead PWM output
    pub fn set_toolhead_pwm(&mut self, strength: f32) {
        if self.is_active() {
            self.encoder.set_toolhead_pwm(&mut self.writer, strength);
        }
    }

    /// Not representable in v1; recorded as a diagnostic
    pub fn enable_motor(&mut self) {
        if self.is_active() {
            self.encoder.enable_motor(&mut self.diagnostics);
        }
    }

    /// Not representable in v1; recorded as a diagnostic
    pub fn disable_motor(&mut self) {
        if self.is_active() {
            self.encoder.disable_motor(&mut self.diagnostics);
        }
    }

    /// Position marker (not encoded in v1)
    pub fn anchor(&mut self, value: u32) {
        self.encoder.anchor(value);
    }

    /// Comment (not encoded in v1)
    pub fn comment(&mut self, message: &str) {
        self.encoder.comment(message);
    }

    /// Record a problem reported by the command producer
    pub fn on_error(&mut self, critical: bool, message: &str) {
        if self.is_active() {
            self.encoder
                .on_error(&mut self.diagnostics, critical, message);
        }
    }

    /// Dispatch one command
    pub fn apply(&mut self, command: &Command) {
        match command {
            Command::Move(mv) => self.move_to(mv),
            Command::Home => self.home(),
            Command::Pause { to_standby } => self.pause(*to_standby),
            Command::Sleep { seconds } => self.sleep(*seconds),
            Command::SetHeaterTemperature { temperature, wait } => {
                self.set_toolhead_heater_temperature(*temperature, *wait)
            }
            Command::SetFanSpeed { strength } => self.set_toolhead_fan_speed(*strength),
            Command::SetPwm { strength } => self.set_toolhead_pwm(*strength),
            Command::EnableMotor => self.enable_motor(),
            Command::DisableMotor => self.disable_motor(),
            Command::Anchor { value } => self.anchor(*value),
            Command::Comment { message } => self.comment(message),
            Command::Error { critical, message } => self.on_error(*critical, message),
        }
    }

    /// Dispatch every command in order
    pub fn apply_all<'a, I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = &'a Command>,
    {
        for command in commands {
            self.apply(command);
        }
    }

    /// Finalize the container; later calls do nothing
    pub fn terminate(&mut self) -> Result<(), FcodeError> {
        if !self.is_active() {
            return Ok(());
        }

        let entries = metadata::build_entries(
            &self.config.head_type,
            self.stats.statistics(),
            &self.config.metadata,
        );

        #[cfg(feature = "logging")]
        debug!(
            "Terminating: {:.2} mm traveled, {:.2} s estimated, {} diagnostics",
            self.stats.statistics().distance_traveled,
            self.stats.statistics().time_cost,
            self.diagnostics.len()
        );

        self.framer.terminate(
            &mut self.writer,
            self.encoder.script_checksum(),
            &entries,
            &self.config.previews,
        )
    }

    /// Whether `terminate` has run
    pub fn is_terminated(&self) -> bool {
        self.framer.state() == FramerState::Terminated
    }

    /// Statistics so far
    pub fn statistics(&self) -> &Statistics {
        self.stats.statistics()
    }

    /// Last known toolhead position
    pub fn position(&self) -> Position {
        self.stats.position()
    }

    /// Diagnostics recorded so far
    pub fn diagnostics(&self) -> &[String] {
        self.diagnostics.entries()
    }

    /// Checksum of the command stream so far
    pub fn script_checksum(&self) -> u32 {
        self.encoder.script_checksum()
    }

    /// Session configuration
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Borrow the sink
    pub fn sink(&self) -> &S {
        self.writer.sink()
    }
}

impl FcodeSession<MemorySink> {
    /// Start an in-memory session
    pub fn memory(config: EncoderConfig) -> Result<Self, FcodeError> {
        Self::new(MemorySink::new(), config)
    }

    /// Terminate and return the finished container
    pub fn into_bytes(mut self) -> Result<Bytes, FcodeError> {
        self.terminate()?;
        let sink = std::mem::take(self.writer.sink_mut());
        Ok(sink.into_bytes())
    }
}

impl FcodeSession<FileSink> {
    /// Start a session writing to a new file
    pub fn create<P: AsRef<Path>>(path: P, config: EncoderConfig) -> Result<Self, FcodeError> {
        // Checked before the file exists so a bad config leaves nothing behind
        config.validate()?;
        Self::start(FileSink::create(path)?, config)
    }
}

impl<S: ByteSink> Drop for FcodeSession<S> {
    fn drop(&mut self) {
        if let Err(_e) = self.terminate() {
            #[cfg(feature = "logging")]
            warn!("Terminating session on drop failed: {}", _e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FcodeBuilder;

    #[test]
    fn test_operations_after_terminate_ignored() {
        let mut session = FcodeBuilder::new("EXTRUDER").build_memory().unwrap();
        session.move_to(&Move::new().feedrate(60.0).x(1.0));
        session.terminate().unwrap();
        let len = session.sink().as_bytes().len();
        let stats = *session.statistics();

        session.move_to(&Move::new().x(50.0));
        session.enable_motor();
        session.sleep(3.0);

        assert_eq!(session.sink().as_bytes().len(), len);
        assert_eq!(*session.statistics(), stats);
        assert!(session.diagnostics().is_empty());
        assert!(session.is_terminated());
    }

    #[test]
    fn test_into_bytes_terminates() {
        let mut session = FcodeSession::memory(EncoderConfig::default()).unwrap();
        session.home();
        let bytes = session.into_bytes().unwrap();

        assert_eq!(&bytes[..8], b"FCx0001\n");
        assert_eq!(&bytes[8..12], &1u32.to_le_bytes());
        assert_eq!(bytes[12], 1);
        assert_eq!(&bytes[bytes.len() - 4..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_apply_matches_direct_calls() {
        let commands = vec![
            Command::Move(Move::new().feedrate(1200.0).x(5.0)),
            Command::SetHeaterTemperature {
                temperature: 200.0,
                wait: false,
            },
            Command::Sleep { seconds: 0.5 },
            Command::Pause { to_standby: true },
            Command::Home,
        ];

        let mut a = FcodeSession::memory(EncoderConfig::default()).unwrap();
        a.apply_all(&commands);

        let mut b = FcodeSession::memory(EncoderConfig::default()).unwrap();
        b.move_to(&Move::new().feedrate(1200.0).x(5.0));
        b.set_toolhead_heater_temperature(200.0, false);
        b.sleep(0.5);
        b.pause(true);
        b.home();

        assert_eq!(a.into_bytes().unwrap(), b.into_bytes().unwrap());
    }
}

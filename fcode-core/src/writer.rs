//! Fixed-width little-endian primitives written through a [`ByteSink`]

use crate::checksum::crc32_update;
use crate::error::FcodeError;
use crate::sink::ByteSink;

/// Writes scalars into a sink, optionally folding them into a checksum
///
/// Every write is skipped, checksum included, once the sink reports itself
/// closed.
#[derive(Debug)]
pub struct PrimitiveWriter<S: ByteSink> {
    sink: S,
}

impl<S: ByteSink> PrimitiveWriter<S> {
    /// Wrap a sink
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8], crc: Option<&mut u32>) {
        if !self.sink.is_open() {
            return;
        }

        self.sink.append(bytes);
        if let Some(crc) = crc {
            *crc = crc32_update(*crc, bytes);
        }
    }

    /// Write an IEEE-754 single-precision float
    pub fn write_f32(&mut self, value: f32, crc: Option<&mut u32>) {
        self.write_bytes(&value.to_le_bytes(), crc);
    }

    /// Write an unsigned 32-bit integer
    pub fn write_u32(&mut self, value: u32, crc: Option<&mut u32>) {
        self.write_bytes(&value.to_le_bytes(), crc);
    }

    /// Write a single opcode byte
    pub fn write_command(&mut self, opcode: u8, crc: Option<&mut u32>) {
        self.write_bytes(&[opcode], crc);
    }

    /// Current write offset of the sink
    pub fn position(&mut self) -> Result<u64, FcodeError> {
        self.sink.position()
    }

    /// Move the sink cursor
    pub fn seek(&mut self, offset: u64) {
        self.sink.seek(offset);
    }

    /// Whether writes still reach the sink
    pub fn is_open(&self) -> bool {
        self.sink.is_open()
    }

    /// Close the underlying sink
    pub fn close(&mut self) -> Result<(), FcodeError> {
        self.sink.close()
    }

    /// Borrow the sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutably borrow the sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

//! Container framing: magic header, backpatched sections, previews
//!
//! Layout (all integers little-endian):
//! 1. Magic (8 bytes): `FCx0001\n`
//! 2. Script length (4 bytes), script records, script CRC-32 (4 bytes)
//! 3. Metadata length (4 bytes), `key=value\0` entries, metadata CRC-32 (4 bytes)
//! 4. Per preview: length (4 bytes) + raw bytes
//! 5. Terminator (4 zero bytes)
//!
//! Lengths are unknown while a section streams, so a zero placeholder is
//! written first and overwritten once the section end is known.

use crate::constants::{FIELD_SIZE, MAGIC};
use crate::error::FcodeError;
use crate::metadata;
use crate::sink::ByteSink;
use crate::writer::PrimitiveWriter;
use bytes::Bytes;

#[cfg(feature = "logging")]
use tracing::debug;

/// Lifecycle of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramerState {
    /// Nothing written yet
    Unopened,
    /// Header written, script region accepting records
    Open,
    /// Trailer sections written; no further output
    Terminated,
}

/// Owns the begin/terminate protocol of one container
#[derive(Debug, Clone)]
pub struct ContainerFramer {
    state: FramerState,
    script_start: u64,
}

impl Default for ContainerFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerFramer {
    /// Framer in the `Unopened` state
    pub fn new() -> Self {
        Self {
            state: FramerState::Unopened,
            script_start: 0,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> FramerState {
        self.state
    }

    /// Offset of the script length field
    pub fn script_start(&self) -> u64 {
        self.script_start
    }

    /// Write the magic and reserve the script length field
    pub fn begin<S: ByteSink>(&mut self, w: &mut PrimitiveWriter<S>) -> Result<(), FcodeError> {
        if self.state != FramerState::Unopened {
            return Ok(());
        }

        w.write_bytes(MAGIC, None);
        self.script_start = w.position()?;
        w.write_u32(0, None);
        self.state = FramerState::Open;

        #[cfg(feature = "logging")]
        debug!("Container opened, script length field at {}", self.script_start);

        Ok(())
    }

    /// Backpatch the script section, write metadata and previews, close the sink
    ///
    /// Only the first call after `begin` does anything. The sink is closed
    /// even when a section fails to finalize.
    pub fn terminate<S: ByteSink>(
        &mut self,
        w: &mut PrimitiveWriter<S>,
        script_crc: u32,
        entries: &[(String, String)],
        previews: &[Bytes],
    ) -> Result<(), FcodeError> {
        if self.state != FramerState::Open {
            return Ok(());
        }
        self.state = FramerState::Terminated;

        let result = self.write_trailer(w, script_crc, entries, previews);
        let closed = w.close();
        result.and(closed)
    }

    fn write_trailer<S: ByteSink>(
        &self,
        w: &mut PrimitiveWriter<S>,
        script_crc: u32,
        entries: &[(String, String)],
        previews: &[Bytes],
    ) -> Result<(), FcodeError> {
        let script_end = w.position()?;
        let script_len = section_len("script", self.script_start, script_end)?;
        backpatch(w, self.script_start, script_len, script_end);
        w.write_u32(script_crc, None);

        #[cfg(feature = "logging")]
        debug!(
            "Script section: {} bytes, crc {:08x}",
            script_len, script_crc
        );

        let meta_start = w.position()?;
        w.write_u32(0, None);
        let meta_crc = metadata::write_block(w, entries);
        let meta_end = w.position()?;
        let meta_len = section_len("metadata", meta_start, meta_end)?;
        backpatch(w, meta_start, meta_len, meta_end);
        w.write_u32(meta_crc, None);

        #[cfg(feature = "logging")]
        debug!(
            "Metadata section: {} entries, {} bytes, crc {:08x}",
            entries.len(),
            meta_len,
            meta_crc
        );

        for (i, preview) in previews.iter().enumerate() {
            let len = u32::try_from(preview.len())
                .map_err(|_| FcodeError::PreviewTooLarge(i, preview.len() as u64))?;
            w.write_u32(len, None);
            w.write_bytes(preview, None);
        }
        w.write_u32(0, None);

        #[cfg(feature = "logging")]
        debug!("Container terminated with {} previews", previews.len());

        Ok(())
    }
}

/// Payload length of a section whose 4-byte length field sits at `start`
fn section_len(section: &'static str, start: u64, end: u64) -> Result<u32, FcodeError> {
    let len = end
        .checked_sub(start + FIELD_SIZE as u64)
        .ok_or(FcodeError::PositionUnavailable)?;
    u32::try_from(len).map_err(|_| FcodeError::SectionTooLarge(section, len))
}

/// Overwrite the length field at `field` and return the cursor to `resume`
fn backpatch<S: ByteSink>(w: &mut PrimitiveWriter<S>, field: u64, len: u32, resume: u64) {
    w.seek(field);
    w.write_u32(len, None);
    w.seek(resume);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn u32_at(buf: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
    }

    #[test]
    fn test_begin_writes_header() {
        let mut w = PrimitiveWriter::new(MemorySink::new());
        let mut framer = ContainerFramer::new();
        framer.begin(&mut w).unwrap();

        assert_eq!(framer.state(), FramerState::Open);
        assert_eq!(framer.script_start(), 8);
        assert_eq!(w.sink().as_bytes(), b"FCx0001\n\0\0\0\0");
    }

    #[test]
    fn test_empty_container_layout() {
        let mut w = PrimitiveWriter::new(MemorySink::new());
        let mut framer = ContainerFramer::new();
        framer.begin(&mut w).unwrap();
        framer.terminate(&mut w, 0, &[], &[]).unwrap();

        // magic, script len 0, crc 0, metadata len 0, crc 0, terminator
        let buf = w.sink().as_bytes();
        assert_eq!(buf.len(), 8 + 4 * 5);
        assert!(buf[8..].iter().all(|&b| b == 0));
        assert_eq!(framer.state(), FramerState::Terminated);
        assert!(!w.is_open());
    }

    #[test]
    fn test_sections_backpatched() {
        let mut w = PrimitiveWriter::new(MemorySink::new());
        let mut framer = ContainerFramer::new();
        framer.begin(&mut w).unwrap();
        w.write_bytes(&[1, 2, 3], None);

        let entries = vec![("K".to_string(), "V".to_string())];
        let previews = vec![Bytes::from_static(b"png!")];
        framer.terminate(&mut w, 0xDEAD_BEEF, &entries, &previews).unwrap();

        let buf = w.sink().as_bytes();
        assert_eq!(u32_at(buf, 8), 3);
        assert_eq!(&buf[12..15], &[1, 2, 3]);
        assert_eq!(u32_at(buf, 15), 0xDEAD_BEEF);
        assert_eq!(u32_at(buf, 19), 4);
        assert_eq!(&buf[23..27], b"K=V\0");
        assert_eq!(u32_at(buf, 27), crc32fast::hash(b"K=V\0"));
        assert_eq!(u32_at(buf, 31), 4);
        assert_eq!(&buf[35..39], b"png!");
        assert_eq!(u32_at(buf, 39), 0);
        assert_eq!(buf.len(), 43);
    }

    #[test]
    fn test_terminate_is_idempotent() {
        let mut w = PrimitiveWriter::new(MemorySink::new());
        let mut framer = ContainerFramer::new();
        framer.begin(&mut w).unwrap();
        framer.terminate(&mut w, 1, &[], &[]).unwrap();
        let once = w.sink().as_bytes().to_vec();

        framer.terminate(&mut w, 2, &[], &[]).unwrap();
        assert_eq!(w.sink().as_bytes(), once.as_slice());
    }

    #[test]
    fn test_terminate_before_begin_is_noop() {
        let mut w = PrimitiveWriter::new(MemorySink::new());
        let mut framer = ContainerFramer::new();
        framer.terminate(&mut w, 0, &[], &[]).unwrap();

        assert_eq!(framer.state(), FramerState::Unopened);
        assert!(w.sink().as_bytes().is_empty());
    }
}

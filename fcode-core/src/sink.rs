//! Byte sinks the encoder writes through
//!
//! The framer backpatches length fields, so a sink must support random
//! access: `append` writes at the cursor (overwriting existing bytes and
//! extending past the end), `position` reports the cursor and `seek` moves it.

use crate::error::FcodeError;
use bytes::{BufMut, BytesMut};
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Random-access byte output
pub trait ByteSink {
    /// Write `bytes` at the cursor and advance it. Dropped when the sink is closed.
    fn append(&mut self, bytes: &[u8]);

    /// Current cursor offset
    fn position(&mut self) -> Result<u64, FcodeError>;

    /// Move the cursor to `offset`
    fn seek(&mut self, offset: u64);

    /// Whether the sink still accepts writes
    fn is_open(&self) -> bool;

    /// Stop accepting writes and release any underlying resource
    fn close(&mut self) -> Result<(), FcodeError> {
        Ok(())
    }
}

/// Growable in-memory buffer
#[derive(Debug, Default)]
pub struct MemorySink {
    buf: BytesMut,
    cursor: usize,
    closed: bool,
}

impl MemorySink {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the sink and return its contents
    pub fn into_bytes(self) -> bytes::Bytes {
        self.buf.freeze()
    }
}

impl ByteSink for MemorySink {
    fn append(&mut self, bytes: &[u8]) {
        if self.closed {
            return;
        }

        let end = self.cursor + bytes.len();
        let overlap = end.min(self.buf.len());
        let split = overlap.saturating_sub(self.cursor);

        if split > 0 {
            self.buf[self.cursor..overlap].copy_from_slice(&bytes[..split]);
        }
        self.buf.put_slice(&bytes[split..]);
        self.cursor = end;
    }

    fn position(&mut self) -> Result<u64, FcodeError> {
        Ok(self.cursor as u64)
    }

    fn seek(&mut self, offset: u64) {
        let offset = offset as usize;
        if offset > self.buf.len() {
            self.buf.resize(offset, 0);
        }
        self.cursor = offset;
    }

    fn is_open(&self) -> bool {
        !self.closed
    }

    fn close(&mut self) -> Result<(), FcodeError> {
        self.closed = true;
        Ok(())
    }
}

/// Binary file opened for writing
///
/// Any IO failure after opening drops the handle; later writes are ignored.
#[derive(Debug)]
pub struct FileSink {
    file: Option<BufWriter<File>>,
    path: String,
}

impl FileSink {
    /// Create (or truncate) the file at `path`
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, FcodeError> {
        let path_str = path.as_ref().display().to_string();
        let file = File::create(path.as_ref()).map_err(|e| FcodeError::OpenFailed {
            path: path_str.clone(),
            reason: e.to_string(),
        })?;

        #[cfg(feature = "logging")]
        debug!("Opened {} for writing", path_str);

        Ok(Self {
            file: Some(BufWriter::new(file)),
            path: path_str,
        })
    }

    /// Path the sink was opened with
    pub fn path(&self) -> &str {
        &self.path
    }

    fn fail(&mut self, _op: &str, _err: std::io::Error) {
        #[cfg(feature = "logging")]
        warn!("{} failed on {}: {}; further writes dropped", _op, self.path, _err);

        self.file = None;
    }
}

impl ByteSink for FileSink {
    fn append(&mut self, bytes: &[u8]) {
        if let Some(file) = self.file.as_mut() {
            if let Err(e) = file.write_all(bytes) {
                self.fail("write", e);
            }
        }
    }

    fn position(&mut self) -> Result<u64, FcodeError> {
        let file = self.file.as_mut().ok_or(FcodeError::PositionUnavailable)?;
        file.stream_position()
            .map_err(|_| FcodeError::PositionUnavailable)
    }

    fn seek(&mut self, offset: u64) {
        if let Some(file) = self.file.as_mut() {
            if let Err(e) = file.seek(SeekFrom::Start(offset)) {
                self.fail("seek", e);
            }
        }
    }

    fn is_open(&self) -> bool {
        self.file.is_some()
    }

    fn close(&mut self) -> Result<(), FcodeError> {
        match self.file.take() {
            Some(mut file) => {
                file.flush()?;
                file.get_ref().sync_all()?;

                #[cfg(feature = "logging")]
                debug!("Closed {}", self.path);

                Ok(())
            }
            None => Ok(()),
        }
    }
}

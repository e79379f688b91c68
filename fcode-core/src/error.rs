//! Error types for FCode encoding

/// Errors that can stop an encoding session
///
/// Data-quality problems in the command stream are never errors; they are
/// recorded as diagnostics on the session instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FcodeError {
    /// Output could not be opened for writing
    #[error("Open failed for {path}: {reason}")]
    OpenFailed {
        /// The path that was requested.
        path: String,
        /// The underlying reason reported by the OS.
        reason: String,
    },

    /// Sink could not report its write position
    #[error("Sink cannot report a write position")]
    PositionUnavailable,

    /// A section grew past what its 4-byte length field can describe
    #[error("{0} section length {1} does not fit in a 32-bit field")]
    SectionTooLarge(&'static str, u64),

    /// Metadata entry cannot be encoded as `key=value\0`
    #[error("Invalid metadata entry: {0}")]
    InvalidMetadata(String),

    /// Preview image larger than its 4-byte length field allows
    #[error("Preview {0} is {1} bytes, too large for a 32-bit length")]
    PreviewTooLarge(usize, u64),

    /// IO error during write, seek or flush
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for FcodeError {
    fn from(err: std::io::Error) -> Self {
        FcodeError::Io(err.to_string())
    }
}

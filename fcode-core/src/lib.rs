//! # FCode Core
//!
//! Encoder for the FCode v1 container: a binary stream of printer commands
//! followed by a metadata block and optional preview images, each section
//! length-prefixed and the first two CRC-32 protected.
//!
//! ## Modules
//!
//! - `constants`: Magic, opcodes and move flags
//! - `types`: Commands and moves
//! - `checksum`: Running CRC-32
//! - `sink`: Random-access byte sinks (memory, file)
//! - `writer`: Little-endian primitive writes
//! - `encoder`: Command to record mapping
//! - `stats`: Print statistics tracking
//! - `metadata`: Metadata block
//! - `framer`: Container begin/terminate protocol
//! - `session`: The encoding session tying it together
//! - `config`: Session configuration and builder
//!
//! ## Example
//!
//! ```
//! use fcode_core::{FcodeBuilder, Move};
//!
//! let mut session = FcodeBuilder::new("EXTRUDER").build_memory()?;
//! session.move_to(&Move::new().feedrate(1200.0).x(10.0).y(0.0));
//! session.home();
//! let container = session.into_bytes()?;
//! assert_eq!(&container[..8], b"FCx0001\n");
//! # Ok::<(), fcode_core::FcodeError>(())
//! ```

#![warn(missing_docs)]

pub mod checksum;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod encoder;
pub mod error;
pub mod framer;
pub mod metadata;
pub mod session;
pub mod sink;
pub mod stats;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use config::{EncoderConfig, FcodeBuilder};
pub use constants::MoveFlags;
pub use error::FcodeError;
pub use session::{FcodeSession, FileSession, MemorySession};
pub use sink::{ByteSink, FileSink, MemorySink};
pub use stats::Statistics;
pub use types::{Command, Move, Position};

/// Result type alias for FCode operations
pub type Result<T> = core::result::Result<T, FcodeError>;

//! Library entry for fcode-cli used by integration tests and embedding.

pub mod commands;
pub mod job;

// Re-export commonly used items
pub use crate::commands::{pack, stats};
pub use crate::job::Job;

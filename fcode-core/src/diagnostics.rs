//! Append-only diagnostics collected during a session

#[cfg(feature = "logging")]
use tracing::warn;

/// Missing or unusable feedrate for a move's time estimate
pub const BAD_FEEDRATE: &str = "BAD_FEEDRATE";

/// Non-finite coordinate or extruder value; the move is left out of statistics
pub const BAD_COORDINATE: &str = "BAD_COORDINATE";

/// Dwell duration that is negative or non-finite
pub const BAD_DURATION: &str = "BAD_DURATION";

/// Ordered list of human-readable warnings and errors
///
/// Entries never influence encoding; they are surfaced to the caller after
/// the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<String>,
}

impl Diagnostics {
    /// Empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `WARNING <message>` or `ERROR <message>`
    pub fn report(&mut self, critical: bool, message: &str) {
        let level = if critical { "ERROR" } else { "WARNING" };
        self.push(format!("{} {}", level, message));
    }

    /// Record an operation the format cannot express
    pub fn unsupported(&mut self, operation: &str) {
        self.push(format!("NOT_SUPPORT {}", operation));
    }

    fn push(&mut self, entry: String) {
        #[cfg(feature = "logging")]
        warn!("{}", entry);

        self.entries.push(entry);
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry equals `entry`
    pub fn contains(&self, entry: &str) -> bool {
        self.entries.iter().any(|e| e == entry)
    }
}

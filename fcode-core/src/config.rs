//! Session configuration and builder

use crate::constants::DEFAULT_HOME;
use crate::error::FcodeError;
use crate::metadata::validate_entry;
use crate::session::FcodeSession;
use crate::sink::{ByteSink, FileSink, MemorySink};
use crate::types::Position;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Head type used when none is given
pub const DEFAULT_HEAD_TYPE: &str = "EXTRUDER";

/// Everything a session needs besides the command stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Toolhead identifier written as `HEAD_TYPE`
    pub head_type: String,

    /// Position assumed after a home command
    #[serde(default = "default_home")]
    pub home: Position,

    /// Caller metadata, written after the synthesized entries
    #[serde(default)]
    pub metadata: Vec<(String, String)>,

    /// Preview images, written verbatim in order
    #[serde(default)]
    pub previews: Vec<Bytes>,
}

fn default_home() -> Position {
    let (x, y, z) = DEFAULT_HOME;
    Position::new(x, y, z)
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            head_type: DEFAULT_HEAD_TYPE.to_string(),
            home: default_home(),
            metadata: Vec::new(),
            previews: Vec::new(),
        }
    }
}

impl EncoderConfig {
    /// Check that every metadata entry and preview can be framed
    pub fn validate(&self) -> Result<(), FcodeError> {
        validate_entry("HEAD_TYPE", &self.head_type)?;
        for (key, value) in &self.metadata {
            validate_entry(key, value)?;
        }
        for (i, preview) in self.previews.iter().enumerate() {
            if u32::try_from(preview.len()).is_err() {
                return Err(FcodeError::PreviewTooLarge(i, preview.len() as u64));
            }
        }
        Ok(())
    }
}

/// Builder for encoding sessions
#[derive(Debug, Clone, Default)]
pub struct FcodeBuilder {
    config: EncoderConfig,
}

impl FcodeBuilder {
    /// Create a builder for the given head type
    pub fn new(head_type: impl Into<String>) -> Self {
        Self {
            config: EncoderConfig {
                head_type: head_type.into(),
                ..EncoderConfig::default()
            },
        }
    }

    /// Set the home position
    pub fn home(mut self, home: Position) -> Self {
        self.config.home = home;
        self
    }

    /// Append a metadata entry
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.metadata.push((key.into(), value.into()));
        self
    }

    /// Append a preview image
    pub fn preview(mut self, image: impl Into<Bytes>) -> Self {
        self.config.previews.push(image.into());
        self
    }

    /// Validate and return the configuration without starting a session
    pub fn build_config(self) -> Result<EncoderConfig, FcodeError> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Start a session writing into `sink`
    pub fn build<S: ByteSink>(self, sink: S) -> Result<FcodeSession<S>, FcodeError> {
        FcodeSession::new(sink, self.config)
    }

    /// Start a session writing into memory
    pub fn build_memory(self) -> Result<FcodeSession<MemorySink>, FcodeError> {
        self.build(MemorySink::new())
    }

    /// Start a session writing to a new file at `path`
    pub fn create_file<P: AsRef<Path>>(self, path: P) -> Result<FcodeSession<FileSink>, FcodeError> {
        FcodeSession::create(path, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_config() {
        let config = FcodeBuilder::new("LASER")
            .home(Position::new(0.0, 0.0, 200.0))
            .metadata("AUTHOR", "me")
            .preview(Bytes::from_static(b"img"))
            .build_config()
            .unwrap();

        assert_eq!(config.head_type, "LASER");
        assert_eq!(config.home.z, 200.0);
        assert_eq!(config.metadata, vec![("AUTHOR".to_string(), "me".to_string())]);
        assert_eq!(config.previews.len(), 1);
    }

    #[test]
    fn test_invalid_metadata_rejected() {
        let err = FcodeBuilder::new("EXTRUDER")
            .metadata("BAD=KEY", "v")
            .build_memory()
            .unwrap_err();
        assert!(matches!(err, FcodeError::InvalidMetadata(_)));
    }

    #[test]
    fn test_config_json_defaults() {
        let config: EncoderConfig = serde_json::from_str(r#"{"head_type": "EXTRUDER"}"#).unwrap();
        assert_eq!(config, EncoderConfig::default());
    }
}

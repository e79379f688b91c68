//! Job files: the JSON description of one container

use anyhow::{Context, Result};
use bytes::Bytes;
use fcode_core::{config::DEFAULT_HEAD_TYPE, ByteSink, Command, EncoderConfig, FcodeSession, Position};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A print job as read from disk
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    /// Toolhead identifier
    #[serde(default = "default_head_type")]
    pub head_type: String,

    /// Home position override
    #[serde(default)]
    pub home: Option<Position>,

    /// Extra metadata entries, in order
    #[serde(default)]
    pub metadata: Vec<(String, String)>,

    /// Preview image files, relative to the job file
    #[serde(default)]
    pub previews: Vec<PathBuf>,

    /// Command stream
    pub commands: Vec<Command>,

    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_head_type() -> String {
    DEFAULT_HEAD_TYPE.to_string()
}

impl Job {
    /// Read and parse a job file
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file: {}", path))?;

        let mut job: Job =
            serde_json::from_str(&content).with_context(|| "Failed to parse job JSON")?;
        job.base_dir = Path::new(path)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        info!(
            "Loaded job with {} commands, {} metadata entries, {} previews",
            job.commands.len(),
            job.metadata.len(),
            job.previews.len()
        );
        Ok(job)
    }

    /// Build the encoder configuration, reading preview images from disk
    pub fn config(&self) -> Result<EncoderConfig> {
        let mut config = EncoderConfig {
            head_type: self.head_type.clone(),
            metadata: self.metadata.clone(),
            ..EncoderConfig::default()
        };
        if let Some(home) = self.home {
            config.home = home;
        }

        for preview in &self.previews {
            let path = self.base_dir.join(preview);
            let data = fs::read(&path)
                .with_context(|| format!("Failed to read preview: {}", path.display()))?;
            debug!("Preview {} ({} bytes)", path.display(), data.len());
            config.previews.push(Bytes::from(data));
        }

        config.validate().with_context(|| "Invalid job configuration")?;
        Ok(config)
    }

    /// Feed every command into `session`, optionally showing progress
    pub fn encode_into<S: ByteSink>(&self, session: &mut FcodeSession<S>, progress: bool) {
        let bar = if progress {
            let pb = ProgressBar::new(self.commands.len() as u64);
            pb.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} commands")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            Some(pb)
        } else {
            None
        };

        for command in &self.commands {
            session.apply(command);
            if let Some(pb) = &bar {
                pb.inc(1);
            }
        }

        if let Some(pb) = bar {
            pb.finish_and_clear();
        }
    }
}

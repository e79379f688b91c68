use crate::job::Job;
use anyhow::{Context, Result};
use colored::*;
use fcode_core::FcodeSession;
use std::fs;
use tracing::info;

pub fn execute(input: &str, output: &str, progress: bool) -> Result<()> {
    info!("Packing job {} into {}", input, output);

    let job = Job::load(input)?;
    let config = job.config()?;

    let mut session = FcodeSession::create(output, config)
        .with_context(|| format!("Failed to create output file: {}", output))?;

    job.encode_into(&mut session, progress);

    let stats = *session.statistics();
    let diagnostics = session.diagnostics().to_vec();
    let checksum = session.script_checksum();

    session
        .terminate()
        .with_context(|| format!("Failed to finish container: {}", output))?;
    drop(session);

    let size = fs::metadata(output)
        .with_context(|| format!("Failed to stat output file: {}", output))?
        .len();

    info!(
        "Successfully packed {} commands ({} bytes total)",
        job.commands.len(),
        size
    );
    println!(
        "{} Wrote {} ({} bytes, script CRC {:08x})",
        "✓".green(),
        output,
        size,
        checksum
    );
    super::print_report(&stats, &diagnostics);

    Ok(())
}

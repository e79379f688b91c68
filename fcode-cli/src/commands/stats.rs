use crate::job::Job;
use anyhow::{Context, Result};
use fcode_core::{FcodeSession, Statistics};
use serde::Serialize;
use tracing::info;

/// Outcome of encoding a job in memory
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub commands: usize,
    pub container_size: usize,
    pub script_checksum: u32,
    pub statistics: Statistics,
    pub diagnostics: Vec<String>,
}

/// Encode `input` into memory and collect the results
pub fn collect(input: &str) -> Result<StatsReport> {
    let job = Job::load(input)?;
    let mut session = FcodeSession::memory(job.config()?)?;
    job.encode_into(&mut session, false);

    let statistics = *session.statistics();
    let diagnostics = session.diagnostics().to_vec();
    let script_checksum = session.script_checksum();
    let container = session
        .into_bytes()
        .with_context(|| "Failed to finish container")?;

    Ok(StatsReport {
        commands: job.commands.len(),
        container_size: container.len(),
        script_checksum,
        statistics,
        diagnostics,
    })
}

pub fn execute(input: &str, json: bool) -> Result<()> {
    info!("Computing statistics for {}", input);

    let report = collect(input)?;

    if json {
        let out = serde_json::to_string_pretty(&report)
            .with_context(|| "Failed to serialize statistics")?;
        println!("{}", out);
        return Ok(());
    }

    println!("Commands:       {}", report.commands);
    println!("Container size: {} bytes", report.container_size);
    println!("Script CRC:     {:08x}", report.script_checksum);
    super::print_report(&report.statistics, &report.diagnostics);

    Ok(())
}

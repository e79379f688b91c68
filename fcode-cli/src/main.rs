use anyhow::Result;
use clap::{Parser, Subcommand};
use fcode_cli::commands;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "fcode")]
#[command(about = "FCode - Command container encoder for 3D printers", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a job file into an FCode container
    Pack {
        /// Input JSON job file
        #[arg(short, long)]
        input: String,

        /// Output container file
        #[arg(short, long)]
        output: String,

        /// Show a progress bar while encoding
        #[arg(long)]
        progress: bool,
    },

    /// Encode a job in memory and report statistics
    Stats {
        /// Input JSON job file
        #[arg(short, long)]
        input: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Pack {
            input,
            output,
            progress,
        } => commands::pack::execute(&input, &output, progress),

        Commands::Stats { input, json } => commands::stats::execute(&input, json),
    }
}

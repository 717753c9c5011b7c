//! `antmark` CLI - Convert, inspect and check ant-tracking marker files

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "antmark")]
#[command(about = "Annotation files and frame sequences for ant-tracking studies")]
#[command(version)]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upgrade a marker file of any generation to version 3
    ///
    /// Activities are written with the corrected spelling `CarryingUnknown`.
    /// Viewer builds that predate the fix only read `CarryingUnkown` and will
    /// reject rows carrying that activity.
    Convert {
        /// Marker file to read
        input: PathBuf,

        /// Where to write the upgraded file (defaults to replacing the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize the markers in a file
    Inspect {
        /// Marker file to read
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a directory of frame images
    Frames {
        /// Directory holding the frame images
        dir: PathBuf,

        /// Frames to load ahead of the first one (defaults to the configured window)
        #[arg(short, long)]
        warm: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert { input, output } => {
            cmd::convert::cmd_convert(&input, output.as_deref())?;
        }
        Commands::Inspect { file, json } => {
            cmd::inspect::cmd_inspect(&file, json)?;
        }
        Commands::Frames { dir, warm } => {
            let config = antmark::config::load()?;
            let window = warm.unwrap_or(config.prefetch_window);
            cmd::frames::cmd_frames(&dir, &config, window).await?;
        }
    }

    Ok(())
}

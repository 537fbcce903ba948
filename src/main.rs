mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::commands::RegionArgs;

#[derive(Parser)]
#[command(
    name = "findbase",
    about = "Region resolution and baseline identity matching for static-analysis findings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Populate all text-addressing fields of a region in a file
    Region {
        /// File the region addresses
        file: PathBuf,
        #[command(flatten)]
        region: RegionArgs,
    },
    /// Print an expanded context snippet around a region
    Context {
        /// File the region addresses
        file: PathBuf,
        #[command(flatten)]
        region: RegionArgs,
    },
    /// Print content digests for a file
    Hash {
        /// File to digest
        file: PathBuf,
    },
    /// Pairwise-compare findings from two JSON logs
    Match {
        /// Baseline findings log
        left: PathBuf,
        /// Current findings log
        right: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Region { file, region } => commands::region(&file, region).map(|()| ExitCode::SUCCESS),
        Commands::Context { file, region } => commands::context(&file, region).map(|()| ExitCode::SUCCESS),
        Commands::Hash { file } => commands::hash(&file).map(|()| ExitCode::SUCCESS),
        Commands::Match { left, right } => commands::match_logs(&left, &right),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    };
}

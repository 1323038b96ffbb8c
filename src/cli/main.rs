//! festival-archive-cli: merge, dirty and clean festival archive tables

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use festival_archive::cleaning::YearRangeCheck;
use festival_archive::cli::CliError;
use festival_archive::cli::commands::{
    CleanArgs, DirtyArgs, MergeArgs, handle_clean, handle_dirty, handle_merge, handle_stages,
};
use festival_archive::cli::logging;
use festival_archive::pipeline::WranglerConfig;

#[derive(Parser)]
#[command(
    name = "festival-archive-cli",
    version,
    about = "Merge, dirty and clean festival archive tables"
)]
struct Cli {
    /// TOML configuration file (defaults apply to anything it leaves out)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for daily rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge per-year raw files into the source table
    Merge {
        /// Festival years, comma separated (default: every year file found)
        #[arg(long, value_delimiter = ',')]
        years: Vec<i32>,

        /// Per-year file prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Merged output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Inject labelled dirt into a clean table
    Dirty {
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sampling seed for a reproducible dirty table
        #[arg(long)]
        seed: Option<u64>,

        /// Write the run report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Clean a raw or dirty table into the staged table
    Clean {
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Year range check: inclusive or legacy
        #[arg(long)]
        year_check: Option<YearRangeCheck>,

        /// Write the run report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// List the pipeline stages in order
    Stages,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Merge { .. } => "merge",
            Commands::Dirty { .. } => "dirty",
            Commands::Clean { .. } => "clean",
            Commands::Stages => "stages",
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => WranglerConfig::load(path)?,
        None => WranglerConfig::default(),
    };

    match cli.command {
        Commands::Merge {
            years,
            prefix,
            output,
        } => handle_merge(
            &MergeArgs {
                years,
                prefix,
                output,
            },
            &config,
        ),
        Commands::Dirty {
            input,
            output,
            seed,
            report,
        } => handle_dirty(
            &DirtyArgs {
                input,
                output,
                seed,
                report,
            },
            &config,
        ),
        Commands::Clean {
            input,
            output,
            year_check,
            report,
        } => handle_clean(
            &CleanArgs {
                input,
                output,
                year_check,
                report,
            },
            &config,
        ),
        Commands::Stages => handle_stages(),
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.log_dir.as_deref(), cli.command.name(), cli.verbose)?;

    match run(cli) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

//! `jdl` command-line tool

use anyhow::Result;
use clap::{Parser, Subcommand};
use jdl_converter::cli::commands::{ConvertArgs, handle_convert, handle_validate};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jdl")]
#[command(version, about = "Convert JDL domain models to JHipster entity configurations")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JDL file to `.jhipster/<Entity>.json` configurations
    Convert(ConvertArgs),
    /// Check a JDL file for errors without converting it
    Validate {
        /// Input .jdl file, or `-` for stdin
        input: String,
        /// Enable database-specific checks
        #[arg(long)]
        database_type: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert(args) => handle_convert(&args)?,
        Commands::Validate {
            input,
            database_type,
        } => handle_validate(&input, database_type.as_deref())?,
    }
    Ok(())
}

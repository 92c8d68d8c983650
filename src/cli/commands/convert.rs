//! Convert command implementation

use super::load_jdl;
use crate::cli::CliError;
use crate::cli::config::{ConfigOverrides, FileConfig, resolve_config};
use crate::cli::output::{format_report, format_written};
use crate::convert::{EntityMap, convert};
use crate::export::JsonEntityExporter;
use crate::validation::JdlValidator;
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Args)]
pub struct ConvertArgs {
    /// Input .jdl file, or `-` for stdin
    pub input: String,
    /// Project directory to write `.jhipster/<Entity>.json` into; prints to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Application base name
    #[arg(long)]
    pub app_name: Option<String>,
    /// Database type (sql, mongodb, cassandra, couchbase, neo4j, no)
    #[arg(long)]
    pub database_type: Option<String>,
    /// Application type (monolith, microservice, gateway)
    #[arg(long)]
    pub application_type: Option<String>,
    /// TOML file with conversion settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// RFC 3339 creation timestamp used to derive changelog dates
    #[arg(long)]
    pub timestamp: Option<String>,
    /// Convert even when validation reports errors
    #[arg(long)]
    pub skip_validation: bool,
}

impl ConvertArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            application_name: self.app_name.clone(),
            database_type: self.database_type.clone(),
            application_type: self.application_type.clone(),
            creation_timestamp: self.timestamp.clone(),
        }
    }
}

/// Import, validate and convert; returns the converted entities
pub fn run_conversion(args: &ConvertArgs) -> Result<EntityMap, CliError> {
    let jdl = load_jdl(&args.input)?;
    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = resolve_config(&args.overrides(), &file_config, &jdl)?;

    if args.skip_validation {
        info!("Skipping validation");
    } else {
        let report = JdlValidator::new().validate(&jdl, Some(config.database_type));
        if !report.is_empty() {
            eprint!("{}", format_report(&report));
        }
        let errors = report.errors().count();
        if errors > 0 {
            return Err(CliError::ValidationFailed(errors));
        }
    }

    Ok(convert(&jdl, &config)?)
}

/// Handle the convert command
pub fn handle_convert(args: &ConvertArgs) -> Result<(), CliError> {
    let entities = run_conversion(args)?;
    if entities.is_empty() {
        warn!("No entities declared in {}", args.input);
    }

    let exporter = JsonEntityExporter::new();
    match &args.output {
        Some(directory) => {
            let paths = exporter.write_to_directory(&entities, directory)?;
            print!("{}", format_written(&entities, &paths));
        }
        None => println!("{}", exporter.export_all(&entities)?.content),
    }
    Ok(())
}

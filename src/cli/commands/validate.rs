//! Validate command implementation

use super::load_jdl;
use crate::cli::CliError;
use crate::cli::output::format_report;
use crate::models::DatabaseType;
use crate::validation::{JdlValidator, ValidationReport};

/// Validate a JDL source and return the report; fails when it has errors
pub fn validate_source(
    input: &str,
    database_type: Option<&str>,
) -> Result<ValidationReport, CliError> {
    let jdl = load_jdl(input)?;
    let database_type = database_type
        .map(str::parse::<DatabaseType>)
        .transpose()
        .map_err(CliError::InvalidArgument)?;
    Ok(JdlValidator::new().validate(&jdl, database_type))
}

/// Handle the validate command
pub fn handle_validate(input: &str, database_type: Option<&str>) -> Result<(), CliError> {
    let report = validate_source(input, database_type)?;
    print!("{}", format_report(&report));

    let errors = report.errors().count();
    if errors > 0 {
        return Err(CliError::ValidationFailed(errors));
    }
    Ok(())
}

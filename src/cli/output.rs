//! Output formatting for CLI

use crate::models::JsonEntity;
use crate::validation::{Severity, ValidationReport};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Format a validation report, errors before warnings
pub fn format_report(report: &ValidationReport) -> String {
    let mut output = String::new();

    let errors: Vec<_> = report.errors().collect();
    if !errors.is_empty() {
        output.push_str(&format!("❌ {} error(s):\n", errors.len()));
        for issue in &errors {
            output.push_str(&format!("  - {}\n", issue.message));
        }
    }

    let warnings: Vec<_> = report.warnings().collect();
    if !warnings.is_empty() {
        output.push_str(&format!("⚠️  {} warning(s):\n", warnings.len()));
        for issue in &warnings {
            output.push_str(&format!("  - {}\n", issue.message));
        }
    }

    if report.issues.iter().all(|i| i.severity != Severity::Error) {
        output.push_str("✅ Validation successful\n");
    }

    output
}

/// Summarize a conversion and the files it produced
pub fn format_written(entities: &BTreeMap<String, JsonEntity>, paths: &[PathBuf]) -> String {
    let mut output = format!("✅ Converted {} entities:\n", entities.len());
    for entity in entities.values() {
        output.push_str(&format!(
            "  - {} ({} fields, {} relationships)\n",
            entity.name,
            entity.fields.len(),
            entity.relationships.len()
        ));
    }
    for path in paths {
        output.push_str(&format!("  wrote {}\n", path.display()));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationIssue;

    #[test]
    fn test_format_report() {
        let report = ValidationReport {
            issues: vec![
                ValidationIssue {
                    severity: Severity::Warning,
                    message: "Option filter names unknown entity Ghost".to_string(),
                },
                ValidationIssue {
                    severity: Severity::Error,
                    message: "Entity Job is declared more than once".to_string(),
                },
            ],
        };

        let output = format_report(&report);
        assert!(output.starts_with("❌ 1 error(s):\n  - Entity Job"));
        assert!(output.contains("⚠️  1 warning(s):\n  - Option filter"));
        assert!(!output.contains("Validation successful"));
    }

    #[test]
    fn test_format_empty_report() {
        assert_eq!(
            format_report(&ValidationReport::default()),
            "✅ Validation successful\n"
        );
    }

    #[test]
    fn test_format_written() {
        let mut entities = BTreeMap::new();
        entities.insert("Job".to_string(), JsonEntity::new("Job", "job"));
        let output = format_written(&entities, &[PathBuf::from("out/.jhipster/Job.json")]);
        assert!(output.contains("Job (0 fields, 0 relationships)"));
        assert!(output.contains("wrote out/.jhipster/Job.json"));
    }
}

//! Validation module tests

use jdl_converter::validation::input::{validate_entity_name, validate_field_name};
use jdl_converter::{DatabaseType, JDLImporter, JdlValidator, Severity, ValidationReport};

fn validate(source: &str, database_type: Option<DatabaseType>) -> ValidationReport {
    let jdl = JDLImporter::new().parse(source).unwrap();
    JdlValidator::new().validate(&jdl, database_type)
}

mod jdl_validation_tests {
    use super::*;

    #[test]
    fn test_well_formed_model() {
        let report = validate(
            r#"
            enum Level { JUNIOR, SENIOR }
            entity Employee {
                firstName String required maxlength(50),
                salary Long min(0),
                level Level
            }
            entity Department
            relationship OneToMany { Department{employee} to Employee{department} }
            relationship ManyToOne { Employee{user(login)} to User }
            paginate Employee with pagination
            "#,
            Some(DatabaseType::Sql),
        );
        assert!(report.is_empty(), "{:?}", report.issues);
    }

    #[test]
    fn test_reports_errors() {
        let report = validate(
            r#"
            entity employee { name String min(1) }
            entity Shift { start Moment }
            relationship OneToOne { Shift to Rota }
            "#,
            None,
        );

        assert!(report.has_errors());
        let messages: Vec<&str> = report.errors().map(|i| i.message.as_str()).collect();
        assert_eq!(messages.len(), 4);
        assert!(messages[0].starts_with("Entity name 'employee'"));
        assert_eq!(
            messages[1],
            "employee.name: validation min is not applicable to type String"
        );
        assert_eq!(messages[2], "Shift.start has unknown type Moment");
        assert!(messages[3].ends_with("entity Rota is not declared"));
    }

    #[test]
    fn test_reports_warnings() {
        let report = validate(
            r#"
            entity Address
            entity Person
            embedded Address
            service Address with serviceClass
            filter Person
            skipClient Ghost
            relationship ManyToOne { Person{address} to Address with jpaDerivedIdentifier }
            "#,
            Some(DatabaseType::Cassandra),
        );

        assert!(!report.has_errors());
        let warnings: Vec<_> = report.warnings().collect();
        assert_eq!(warnings.len(), 4);
        assert!(warnings.iter().all(|w| w.severity == Severity::Warning));
        assert!(warnings[0].message.contains("only supported on one-to-one"));
        assert_eq!(warnings[1].message, "Option skipClient names unknown entity Ghost");
        assert_eq!(
            warnings[2].message,
            "Address is embedded, option service has no effect"
        );
        assert!(warnings[3].message.starts_with("Person: filter"));
    }
}

mod input_validation_tests {
    use super::*;

    #[test]
    fn test_identifier_rules() {
        assert!(validate_entity_name("Invoice").is_ok());
        assert!(validate_entity_name("2Invoice").is_err());
        assert!(validate_entity_name("Invoice-Line").is_err());
        assert!(validate_field_name("amount").is_ok());
        assert!(validate_field_name("new").is_err());
    }
}

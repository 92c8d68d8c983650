//! Identifier validation for JDL names
//!
//! Entity, enum and field names end up as Java class and member names, so
//! they are restricted to ASCII identifiers that are not Java keywords.

use once_cell::sync::Lazy;
use regex::Regex;

static CLASS_NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap());

static FIELD_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").unwrap());

static ENUM_VALUE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap());

/// Java keywords and literals that cannot be used as identifiers
pub const RESERVED_WORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

/// Longest accepted identifier
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Error for an identifier that cannot be used
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{kind} name cannot be empty")]
    Empty { kind: &'static str },
    #[error("{kind} name '{name}' exceeds {max} characters")]
    TooLong {
        kind: &'static str,
        name: String,
        max: usize,
    },
    #[error("{kind} name '{name}' must match {pattern}")]
    InvalidFormat {
        kind: &'static str,
        name: String,
        pattern: &'static str,
    },
    #[error("{kind} name '{name}' is a reserved word")]
    ReservedWord { kind: &'static str, name: String },
}

fn check(
    kind: &'static str,
    name: &str,
    regex: &Regex,
    pattern: &'static str,
) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Empty { kind });
    }
    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            kind,
            name: name.to_string(),
            max: MAX_IDENTIFIER_LENGTH,
        });
    }
    if !regex.is_match(name) {
        return Err(ValidationError::InvalidFormat {
            kind,
            name: name.to_string(),
            pattern,
        });
    }
    if RESERVED_WORDS.contains(&name.to_lowercase().as_str()) {
        return Err(ValidationError::ReservedWord {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Entity names become class names: `^[A-Z][A-Za-z0-9]*$`
pub fn validate_entity_name(name: &str) -> Result<(), ValidationError> {
    check("Entity", name, &CLASS_NAME_REGEX, "^[A-Z][A-Za-z0-9]*$")
}

pub fn validate_enum_name(name: &str) -> Result<(), ValidationError> {
    check("Enum", name, &CLASS_NAME_REGEX, "^[A-Z][A-Za-z0-9]*$")
}

pub fn validate_field_name(name: &str) -> Result<(), ValidationError> {
    check("Field", name, &FIELD_NAME_REGEX, "^[A-Za-z][A-Za-z0-9]*$")
}

/// Enum constants: `^[A-Z][A-Z0-9_]*$`
pub fn validate_enum_value(name: &str) -> Result<(), ValidationError> {
    check("Enum value", name, &ENUM_VALUE_REGEX, "^[A-Z][A-Z0-9_]*$")
}

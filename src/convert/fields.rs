//! Field conversion
//!
//! Maps every `JdlField` to a `JsonField`, preserving declaration order (it
//! drives the member order of the generated classes).

use super::ConversionError;
use crate::models::{BlobContent, JdlField, JdlObject, JsonField};
use crate::utils::{camel_case, capitalize, format_comment};
use std::collections::BTreeMap;

/// Physical type every blob subtype is stored as
pub const BYTES_TYPE: &str = "byte[]";

/// Convert the fields of every entity, keyed by JDL entity name
pub fn convert_fields(jdl: &JdlObject) -> Result<BTreeMap<String, Vec<JsonField>>, ConversionError> {
    let mut converted = BTreeMap::new();
    for entity in &jdl.entities {
        let fields = entity
            .fields
            .iter()
            .map(|field| convert_field(field, jdl))
            .collect::<Result<Vec<_>, _>>()?;
        converted.insert(entity.name.clone(), fields);
    }
    Ok(converted)
}

/// Convert a single field; `jdl` is used to resolve enum types
pub fn convert_field(field: &JdlField, jdl: &JdlObject) -> Result<JsonField, ConversionError> {
    let mut json_field = JsonField::new(camel_case(&field.name), field.field_type.clone());
    json_field.javadoc = field.comment.as_deref().and_then(format_comment);

    if let Some(jdl_enum) = jdl.get_enum(&field.field_type) {
        json_field.field_values = Some(jdl_enum.values_as_strings());

        let value_javadocs: BTreeMap<String, String> = jdl_enum
            .values
            .iter()
            .filter_map(|value| {
                let comment = value.comment.as_deref().and_then(format_comment)?;
                Some((value.name.clone(), comment))
            })
            .collect();
        if !value_javadocs.is_empty() {
            json_field.field_values_javadocs = Some(value_javadocs);
        }
        json_field.field_type_javadoc = jdl_enum.comment.as_deref().and_then(format_comment);
    } else if is_blob_type(&field.field_type) {
        json_field.field_type_blob_content = Some(blob_content(&field.field_type)?);
        json_field.field_type = BYTES_TYPE.to_string();
    }

    if !field.validations.is_empty() {
        let mut rules = Vec::with_capacity(field.validations.len());
        for validation in &field.validations {
            rules.push(validation.name().to_string());
            if validation.kind.takes_value()
                && let Some(value) = &validation.value
            {
                json_field.validate_rule_values.insert(
                    format!("fieldValidateRules{}", capitalize(validation.name())),
                    value.clone(),
                );
            }
        }
        json_field.field_validate_rules = Some(rules);
    }

    if !field.options.is_empty() {
        json_field.options = Some(field.options.clone());
    }

    Ok(json_field)
}

/// Any declared type ending in `Blob` is treated as a blob subtype
pub fn is_blob_type(field_type: &str) -> bool {
    field_type.ends_with("Blob")
}

/// Discriminator for a blob subtype; unknown subtypes are fatal
pub fn blob_content(field_type: &str) -> Result<BlobContent, ConversionError> {
    match field_type {
        "ImageBlob" => Ok(BlobContent::Image),
        "Blob" | "AnyBlob" => Ok(BlobContent::Any),
        "TextBlob" => Ok(BlobContent::Text),
        other => Err(ConversionError::UnrecognizedBlobType(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JdlEntity, JdlEnum, JdlValidation, ValidationKind};
    use serde_json::Value;

    fn jdl_with_fields(fields: Vec<JdlField>) -> JdlObject {
        let mut entity = JdlEntity::new("Post");
        entity.fields = fields;
        let mut jdl = JdlObject::new();
        jdl.add_entity(entity);
        jdl
    }

    #[test]
    fn test_preserves_declaration_order_and_camel_cases_names() {
        let jdl = jdl_with_fields(vec![
            JdlField::new("Title", "String"),
            JdlField::new("published_at", "Instant"),
            JdlField::new("views", "Long"),
        ]);

        let fields = &convert_fields(&jdl).unwrap()["Post"];
        let names: Vec<&str> = fields.iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(names, vec!["title", "publishedAt", "views"]);
        assert_eq!(fields[1].field_type, "Instant");
    }

    #[test]
    fn test_image_blob() {
        let jdl = jdl_with_fields(vec![JdlField::new("picture", "ImageBlob")]);
        let field = &convert_fields(&jdl).unwrap()["Post"][0];

        assert_eq!(field.field_type, "byte[]");
        assert_eq!(field.field_type_blob_content, Some(BlobContent::Image));
    }

    #[test]
    fn test_blob_subtypes() {
        assert_eq!(blob_content("Blob").unwrap(), BlobContent::Any);
        assert_eq!(blob_content("AnyBlob").unwrap(), BlobContent::Any);
        assert_eq!(blob_content("TextBlob").unwrap(), BlobContent::Text);
    }

    #[test]
    fn test_unrecognized_blob_type_fails() {
        let jdl = jdl_with_fields(vec![JdlField::new("clip", "VideoBlob")]);
        let err = convert_fields(&jdl).unwrap_err();
        match err {
            ConversionError::UnrecognizedBlobType(name) => assert_eq!(name, "VideoBlob"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validations() {
        let jdl = jdl_with_fields(vec![
            JdlField::new("title", "String")
                .with_validation(JdlValidation::new(ValidationKind::Required))
                .with_validation(JdlValidation::new(ValidationKind::Unique))
                .with_validation(JdlValidation::with_value(ValidationKind::MaxLength, 42))
                .with_validation(JdlValidation::with_value(ValidationKind::Pattern, "^[A-Z]")),
        ]);

        let field = &convert_fields(&jdl).unwrap()["Post"][0];
        assert_eq!(
            field.field_validate_rules.as_deref().unwrap(),
            ["required", "unique", "maxlength", "pattern"]
        );
        assert_eq!(
            field.validate_rule_values["fieldValidateRulesMaxlength"],
            Value::from(42)
        );
        assert_eq!(
            field.validate_rule_values["fieldValidateRulesPattern"],
            Value::from("^[A-Z]")
        );
        assert_eq!(field.validate_rule_values.len(), 2);
    }

    #[test]
    fn test_no_validations_leaves_rules_unset() {
        let jdl = jdl_with_fields(vec![JdlField::new("title", "String")]);
        let field = &convert_fields(&jdl).unwrap()["Post"][0];
        assert!(field.field_validate_rules.is_none());
        assert!(field.options.is_none());
    }

    #[test]
    fn test_enum_field() {
        let mut status = JdlEnum::new("Status", ["DRAFT", "PUBLISHED"])
            .with_comment("/** Publication status */");
        status.values[1].comment = Some("Visible to everyone".to_string());

        let mut jdl = jdl_with_fields(vec![JdlField::new("status", "Status")]);
        jdl.add_enum(status);

        let field = &convert_fields(&jdl).unwrap()["Post"][0];
        assert_eq!(field.field_type, "Status");
        assert_eq!(
            field.field_values.as_deref().unwrap(),
            ["DRAFT", "PUBLISHED"]
        );
        assert_eq!(
            field.field_type_javadoc.as_deref(),
            Some("Publication status")
        );
        let javadocs = field.field_values_javadocs.as_ref().unwrap();
        assert_eq!(javadocs.len(), 1);
        assert_eq!(javadocs["PUBLISHED"], "Visible to everyone");
    }

    #[test]
    fn test_field_options_and_comment() {
        let jdl = jdl_with_fields(vec![
            JdlField::new("slug", "String")
                .with_option("Id", Value::Bool(true))
                .with_comment("/** URL slug */"),
        ]);
        let field = &convert_fields(&jdl).unwrap()["Post"][0];

        assert_eq!(field.options.as_ref().unwrap()["Id"], Value::Bool(true));
        assert_eq!(field.javadoc.as_deref(), Some("URL slug"));
    }
}

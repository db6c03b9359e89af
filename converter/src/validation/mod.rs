//! Validation of generated documents.
//!
//! Both documents are checked against JSON Schemas (Draft 7) embedded at
//! compile time from the `schemas/` directory:
//! - `dwh-metadata.json`
//! - `gdpr.json`
//!
//! The metadata check additionally compiles every `partition_pattern`, since
//! the loader applies it as a regular expression to incoming file names.
//!
//! # Example
//!
//! ```rust,ignore
//! use dwhgen::validation::validate_metadata_yaml;
//!
//! let doc = validate_metadata_yaml(&std::fs::read_to_string("metadata.yaml")?)?;
//! println!("{} tables", doc.tables.len());
//! ```

use regex::Regex;
use serde_json::Value;

use crate::error::{ValidationError, ValidationResult};
use crate::models::{GdprEntry, MetadataDocument};

const METADATA_SCHEMA: &str = include_str!("../../schemas/dwh-metadata.json");
const GDPR_SCHEMA: &str = include_str!("../../schemas/gdpr.json");

/// Validate a JSON value against a JSON schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with one message per violation
///
/// # Example
/// ```ignore
/// use serde_json::json;
/// use dwhgen::validation::validate;
///
/// let schema = json!({
///     "type": "object",
///     "required": ["name"],
///     "properties": {
///         "name": { "type": "string" }
///     }
/// });
///
/// assert!(validate(&schema, &json!({ "name": "test" })).is_ok());
/// assert!(validate(&schema, &json!({ "age": 42 })).is_err());
/// ```
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check(document: &'static str, schema: &str, data: &Value) -> ValidationResult<()> {
    let schema: Value = serde_json::from_str(schema)?;
    validate(&schema, data).map_err(|errors| ValidationError::Schema { document, errors })
}

/// Validate a metadata document against the embedded schema.
pub fn validate_metadata_document(document: &MetadataDocument) -> ValidationResult<()> {
    let data = serde_json::to_value(document)?;
    check("metadata", METADATA_SCHEMA, &data)?;

    for table in &document.tables {
        Regex::new(&table.source.partition_pattern).map_err(|e| ValidationError::InvalidValue {
            field: format!("tables.{}.source.partition_pattern", table.name),
            message: e.to_string(),
        })?;
    }

    Ok(())
}

/// Validate the GDPR entry list against the embedded schema.
pub fn validate_gdpr_entries(entries: &[GdprEntry]) -> ValidationResult<()> {
    let data = serde_json::to_value(entries)?;
    check("gdpr", GDPR_SCHEMA, &data)
}

/// Parse metadata YAML back into a document and validate it.
pub fn validate_metadata_yaml(yaml: &str) -> ValidationResult<MetadataDocument> {
    let document: MetadataDocument = serde_yaml::from_str(yaml)?;
    validate_metadata_document(&document)?;
    Ok(document)
}

/// Parse GDPR YAML back into entries and validate them.
pub fn validate_gdpr_yaml(yaml: &str) -> ValidationResult<Vec<GdprEntry>> {
    let entries: Vec<GdprEntry> = serde_yaml::from_str(yaml)?;
    validate_gdpr_entries(&entries)?;
    Ok(entries)
}

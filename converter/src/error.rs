//! Error types for the dwhgen conversion pipeline.
//!
//! One error type per pipeline stage:
//!
//! - [`CsvError`] - reading and parsing the catalog export
//! - [`OutputError`] - YAML serialization and file writes
//! - [`ValidationError`] - checks on the generated documents
//! - [`ConfigError`] - environment and CLI configuration
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Stage errors convert into [`PipelineError`] through `From`, so `?` works
//! across stage boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors while reading the catalog export.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read the input file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Content could not be decoded.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// Inconsistent delimiter or record structure.
    #[error("Invalid CSV at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// No header line at all.
    #[error("CSV file is empty")]
    EmptyFile,

    /// A required header column is absent.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A cell holds a value the column cannot take.
    #[error("Line {line}, column '{column}' (value '{value}'): {message}")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
        message: String,
    },
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CsvError::Io(io),
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => CsvError::Parse {
                line,
                message: format!("expected {} fields, found {}", expected_len, len),
            },
            csv::ErrorKind::Utf8 { err, .. } => CsvError::Encoding(err.to_string()),
            other => CsvError::Parse {
                line,
                message: format!("{:?}", other),
            },
        }
    }
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while serializing or writing a YAML document.
#[derive(Debug, Error)]
pub enum OutputError {
    /// YAML serialization failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Target path could not be written.
    #[error("Failed to write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors raised by document validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// JSON Schema validation failed.
    #[error("{document} document failed validation: {}", .errors.join("; "))]
    Schema {
        document: &'static str,
        errors: Vec<String>,
    },

    /// A field holds a value the schema cannot express.
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// The YAML text could not be parsed back.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Conversion to the JSON data model failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while building the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Delimiter must be a single ASCII character.
    #[error("Invalid delimiter '{0}': expected a single ASCII character")]
    InvalidDelimiter(String),

    /// Boolean setting with an unrecognised value.
    #[error("Invalid value '{value}' for {key}: expected true or false")]
    InvalidFlag { key: String, value: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::convert`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reading the input failed.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Serializing or writing an output failed.
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// A generated document is invalid.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

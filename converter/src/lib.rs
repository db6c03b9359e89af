//! # dwhgen - DWH table metadata from catalog exports
//!
//! dwhgen turns a `;`-separated export of relational catalog columns into
//! two YAML documents: declarative warehouse table definitions and a GDPR
//! personal data classification.
//!
//! ## Architecture
//!
//! ```text
//!                                   ┌──────────────┐     ┌───────────────┐
//! ┌─────────────┐    ┌──────────┐ ┌▶│   Grouper    │────▶│ metadata.yaml │
//! │ Catalog CSV │───▶│  Parser  │─┤ │ (tables+src) │     └───────────────┘
//! │ (ISO/UTF8)  │    │(auto-enc)│ │ └──────────────┘     ┌───────────────┐
//! └─────────────┘    └──────────┘ └▶│     GDPR     │────▶│   gdpr.yaml   │
//!                                   └──────────────┘     └───────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! dwhgen::convert(
//!     Path::new("metadata.csv"),
//!     Path::new("metadata.yaml"),
//!     Path::new("gdpr.yaml"),
//! )?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per stage
//! - [`models`] - Rows, source descriptors, table and GDPR documents
//! - [`parser`] - Catalog export reading with encoding detection
//! - [`transform`] - Type mapping, grouping, GDPR and the pipeline
//! - [`output`] - YAML serialization and file writes
//! - [`validation`] - Schema checks on generated documents
//! - [`config`] - Run configuration from defaults and environment
//! - [`logs`] - Run log

// Core modules
pub mod error;
pub mod models;

// Ambient
pub mod config;
pub mod logs;

// Reading
pub mod parser;

// Transformation
pub mod transform;

// Writing
pub mod output;

// Validation
pub mod validation;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError,
    CsvError,
    OutputError,
    PipelineError,
    ValidationError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    ColumnDefinition,
    ColumnRow,
    GdprEntry,
    MetadataDocument,
    PersonalData,
    SourceDescriptor,
    SourceKey,
    SourceParams,
    TableDefinition,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_encoding,
    parse_bytes,
    parse_str,
    read_csv,
    ParseResult,
};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    build_gdpr_entries,
    column_definition,
    map_data_type,
    process_source,
    process_table,
    SourceCatalog,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    convert,
    generate_documents,
    run,
    ConversionSummary,
    GeneratedDocuments,
};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use output::{
    build_metadata_document,
    generate_gdpr_yaml,
    generate_metadata_yaml,
    save_yaml,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    validate_gdpr_entries,
    validate_metadata_document,
    validate_metadata_yaml,
};

pub use config::ConverterConfig;

//! High-level conversion API.
//!
//! Combines all steps: reading the export, building both documents,
//! validating them and writing the two YAML files.
//!
//! # Example
//!
//! ```rust,ignore
//! use dwhgen::convert;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     convert(
//!         Path::new("metadata.csv"),
//!         Path::new("metadata.yaml"),
//!         Path::new("gdpr.yaml"),
//!     )?;
//!     Ok(())
//! }
//! ```
//!
//! There is no transaction across the two writes: if writing the GDPR file
//! fails, the metadata file already written stays in place.

use std::path::Path;

use serde::Serialize;

use crate::config::ConverterConfig;
use crate::error::PipelineResult;
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{ColumnRow, GdprEntry, MetadataDocument};
use crate::output::{save_yaml, to_yaml};
use crate::parser::{read_csv, DEFAULT_DELIMITER};
use crate::validation::{validate_gdpr_entries, validate_metadata_document};

use super::gdpr::{build_gdpr_entries, hashed_column_count};
use super::grouper::{process_source_with_catalog, SourceCatalog};

/// Counts reported after a conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    /// Detected input encoding
    pub encoding: String,
    /// Catalog rows read
    pub row_count: usize,
    /// Table definitions written
    pub table_count: usize,
    /// Distinct source descriptors
    pub source_count: usize,
    /// Tables with personal data
    pub gdpr_table_count: usize,
    /// Columns marked for hashing
    pub gdpr_column_count: usize,
}

/// Both generated documents, before serialization
#[derive(Debug, Clone)]
pub struct GeneratedDocuments {
    pub metadata: MetadataDocument,
    pub gdpr: Vec<GdprEntry>,
    /// Distinct source descriptors used by `metadata`
    pub source_count: usize,
}

/// Convert a catalog export into the metadata and GDPR YAML files.
///
/// Uses the default `;` delimiter and validates both documents before
/// writing anything.
pub fn convert(input: &Path, metadata_path: &Path, gdpr_path: &Path) -> PipelineResult<()> {
    let config = ConverterConfig {
        input: input.to_path_buf(),
        metadata_output: metadata_path.to_path_buf(),
        gdpr_output: gdpr_path.to_path_buf(),
        delimiter: DEFAULT_DELIMITER,
        skip_validation: false,
    };
    run(&config).map(|_| ())
}

/// Run a conversion described by `config`.
pub fn run(config: &ConverterConfig) -> PipelineResult<ConversionSummary> {
    log_info(format!("📖 Reading {}", config.input.display()));
    let parsed = read_csv(&config.input, config.delimiter)?;
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!("Read {} rows", parsed.rows.len()));

    if parsed.rows.is_empty() {
        log_warning("Export has no data rows, writing empty documents");
    }

    let documents = generate_documents(&parsed.rows);
    print_tables(&documents.metadata);

    if config.skip_validation {
        log_info("(validation skipped)");
    } else {
        log_info("✔️  Validating generated documents...");
        validate_metadata_document(&documents.metadata)?;
        validate_gdpr_entries(&documents.gdpr)?;
        log_success("Both documents valid");
    }

    let metadata_yaml = to_yaml(&documents.metadata)?;
    let gdpr_yaml = to_yaml(&documents.gdpr)?;

    save_yaml(&config.metadata_output, &metadata_yaml)?;
    log_success(format!("💾 Metadata written to {}", config.metadata_output.display()));
    save_yaml(&config.gdpr_output, &gdpr_yaml)?;
    log_success(format!("💾 GDPR classification written to {}", config.gdpr_output.display()));

    Ok(ConversionSummary {
        encoding: parsed.encoding,
        row_count: parsed.rows.len(),
        table_count: documents.metadata.tables.len(),
        source_count: documents.source_count,
        gdpr_table_count: documents.gdpr.len(),
        gdpr_column_count: hashed_column_count(&documents.gdpr),
    })
}

/// Build both documents from parsed rows.
pub fn generate_documents(rows: &[ColumnRow]) -> GeneratedDocuments {
    log_info("📦 Grouping columns by source file and table...");
    let mut catalog = SourceCatalog::new();
    let tables = process_source_with_catalog(rows, &mut catalog);
    log_success(format!("{} tables from {} source files", tables.len(), catalog.source_count()));

    log_info("🔒 Collecting GDPR columns...");
    let gdpr = build_gdpr_entries(rows);
    log_success(format!(
        "{} tables with personal data ({} columns)",
        gdpr.len(),
        hashed_column_count(&gdpr)
    ));

    GeneratedDocuments {
        metadata: MetadataDocument::new(tables),
        gdpr,
        source_count: catalog.source_count(),
    }
}

fn print_tables(document: &MetadataDocument) {
    for table in &document.tables {
        log_info_indent(
            format!(
                "{} ← {} ({} columns)",
                table.name,
                table.source.file_pattern,
                table.columns.len()
            ),
            1,
        );
    }
}

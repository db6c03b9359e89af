//! YAML serialization and file output.
//!
//! Documents are serialized with `serde_yaml`, which keeps struct field
//! order and writes collections in block style.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{OutputError, OutputResult};
use crate::models::{ColumnRow, GdprEntry, MetadataDocument};
use crate::transform::gdpr::build_gdpr_entries;
use crate::transform::grouper::process_source;

/// Serialize any document to YAML text.
pub fn to_yaml<T: Serialize + ?Sized>(document: &T) -> OutputResult<String> {
    Ok(serde_yaml::to_string(document)?)
}

/// Assemble the metadata document for all tables in `rows`.
pub fn build_metadata_document(rows: &[ColumnRow]) -> MetadataDocument {
    MetadataDocument::new(process_source(rows))
}

/// Generate the metadata document as YAML text.
pub fn generate_metadata_yaml(rows: &[ColumnRow]) -> OutputResult<String> {
    to_yaml(&build_metadata_document(rows))
}

/// Generate the GDPR classification document as YAML text.
///
/// The document is a bare list of entries.
pub fn generate_gdpr_yaml(rows: &[ColumnRow]) -> OutputResult<String> {
    let entries: Vec<GdprEntry> = build_gdpr_entries(rows);
    to_yaml(&entries)
}

/// Write `content` to `path`, replacing any existing file.
pub fn save_yaml(path: &Path, content: &str) -> OutputResult<()> {
    fs::write(path, content).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

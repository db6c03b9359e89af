//! Domain models for the dwhgen conversion pipeline.
//!
//! - [`ColumnRow`] - one record of the catalog export
//! - [`SourceDescriptor`] - physical file pattern and parsing parameters
//! - [`ColumnDefinition`] / [`TableDefinition`] - generated table metadata
//! - [`MetadataDocument`] - the full metadata document
//! - [`GdprEntry`] - per-table personal data classification
//!
//! Field order of the serializable structs is the key order of the YAML
//! output.

use serde::{Deserialize, Serialize};

use crate::parser::{COL_DECIMAL_SEPARATOR, COL_FILE_NAME, COL_FILE_TYPE, COL_TABLE_NAME};

// =============================================================================
// Fixed document values
// =============================================================================

/// Version of the metadata document format.
pub const METADATA_VERSION: u32 = 2;

/// Name of the generated metadata document.
pub const METADATA_NAME: &str = "dwh";

/// Load type of every source.
pub const LOAD_TYPE_DELTA: &str = "delta";

/// Partition pattern of every source file.
pub const PARTITION_PATTERN: &str = r"(\d+(?:\.\d+)?)_(?:\d+\D+)$";

/// Technical primary key column of every table.
pub const PRIMARY_KEY_COLUMN: &str = "unid";

/// Soft-delete marker column.
pub const CDC_COLUMN: &str = "dml_flag";

/// CDC strategy of every table.
pub const CDC_TYPE_SOFT: &str = "soft";

// =============================================================================
// Input row
// =============================================================================

/// One record of the catalog export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRow {
    /// 1-based line in the input file
    pub line: u64,
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    /// `None` when the cell is empty
    pub data_format: Option<String>,
    /// Raw flag, only `"Y"` means nullable
    pub nullable: String,
    pub file_name: String,
    pub decimal_separator: String,
    pub file_type: String,
    pub gdpr_flag: bool,
}

impl ColumnRow {
    pub fn is_nullable(&self) -> bool {
        self.nullable == "Y"
    }

    /// Identity of the source file this row is loaded from.
    pub fn source_key(&self) -> SourceKey {
        SourceKey {
            file_name: self.file_name.clone(),
            decimal_separator: self.decimal_separator.clone(),
            file_type: self.file_type.clone(),
        }
    }

    /// First empty field among the table and source grouping fields.
    pub fn missing_group_field(&self) -> Option<&'static str> {
        [
            (COL_TABLE_NAME, &self.table_name),
            (COL_FILE_NAME, &self.file_name),
            (COL_DECIMAL_SEPARATOR, &self.decimal_separator),
            (COL_FILE_TYPE, &self.file_type),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
    }
}

// =============================================================================
// Sources
// =============================================================================

/// Composite key of a source descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceKey {
    pub file_name: String,
    pub decimal_separator: String,
    pub file_type: String,
}

impl SourceKey {
    /// Deterministic key string, e.g. `source_CUSTOMER_,_CSV`.
    pub fn id(&self) -> String {
        format!(
            "source_{}_{}_{}",
            self.file_name, self.decimal_separator, self.file_type
        )
    }
}

/// Parsing parameters of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceParams {
    pub decimal_separator: String,
    pub format: String,
}

/// Physical file pattern and parsing parameters shared by tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub load_type: String,
    pub file_pattern: String,
    pub partition_pattern: String,
    pub params: SourceParams,
}

impl SourceDescriptor {
    pub fn from_key(key: &SourceKey) -> Self {
        Self {
            load_type: LOAD_TYPE_DELTA.to_string(),
            file_pattern: key.file_name.clone(),
            partition_pattern: PARTITION_PATTERN.to_string(),
            params: SourceParams {
                decimal_separator: key.decimal_separator.clone(),
                format: key.file_type.to_lowercase(),
            },
        }
    }
}

// =============================================================================
// Table metadata
// =============================================================================

/// Generated definition of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    /// Only written when true
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_nullable: bool,
}

/// Generated definition of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub source: SourceDescriptor,
    pub columns: Vec<ColumnDefinition>,
    pub primary_key: Vec<String>,
    pub cdc_column: String,
    pub cdc_type: String,
}

impl TableDefinition {
    /// Table with the fixed primary key and CDC settings.
    pub fn new(
        name: impl Into<String>,
        source: SourceDescriptor,
        columns: Vec<ColumnDefinition>,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            columns,
            primary_key: vec![PRIMARY_KEY_COLUMN.to_string()],
            cdc_column: CDC_COLUMN.to_string(),
            cdc_type: CDC_TYPE_SOFT.to_string(),
        }
    }
}

/// Full metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDocument {
    pub version: u32,
    pub name: String,
    pub tables: Vec<TableDefinition>,
}

impl MetadataDocument {
    pub fn new(tables: Vec<TableDefinition>) -> Self {
        Self {
            version: METADATA_VERSION,
            name: METADATA_NAME.to_string(),
            tables,
        }
    }
}

// =============================================================================
// GDPR classification
// =============================================================================

/// Protection directives for a table's personal data columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalData {
    pub hash: Vec<String>,
}

/// Personal data classification of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GdprEntry {
    pub name: String,
    pub personal_data: PersonalData,
}

//! Group catalog rows into table definitions.
//!
//! Rows are grouped by source file identity and table name. Every group
//! becomes one [`TableDefinition`] embedding the descriptor of its source
//! file.
//!
//! ```text
//! Catalog rows (one per column)              Table definitions
//! ┌──────────────────────────────────┐       ┌──────────────────────────┐
//! │ CUSTOMER  ID     file CUST  CSV  │       │ CUSTOMER                 │
//! │ CUSTOMER  EMAIL  file CUST  CSV  │  →    │ source: CUST (csv)       │
//! │ ORDERS    ID     file ORD   CSV  │       │ columns: [id, email]     │
//! └──────────────────────────────────┘       ├──────────────────────────┤
//!                                            │ ORDERS                   │
//!                                            │ source: ORD (csv)        │
//!                                            │ columns: [id]            │
//!                                            └──────────────────────────┘
//! ```
//!
//! Groups come out sorted by (file name, decimal separator, file type,
//! table name). Column order inside a table is input order. Rows with an
//! empty grouping field belong to no group and are skipped with a warning.

use std::collections::{BTreeMap, HashMap};

use crate::logs::log_warning;
use crate::models::{ColumnDefinition, ColumnRow, SourceDescriptor, SourceKey, TableDefinition};

use super::types::map_data_type;

/// Grouping key of [`process_source`].
type TableKey = (SourceKey, String);

/// Source descriptors built during one conversion run.
///
/// Tables loaded from the same (file, separator, type) triple share one
/// descriptor value.
#[derive(Debug, Default)]
pub struct SourceCatalog {
    sources: HashMap<String, SourceDescriptor>,
}

impl SourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor for `key`, built on first use.
    pub fn get_or_insert(&mut self, key: &SourceKey) -> &SourceDescriptor {
        self.sources
            .entry(key.id())
            .or_insert_with(|| SourceDescriptor::from_key(key))
    }

    /// Number of distinct descriptors built so far.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

/// Build the column definition of one row.
pub fn column_definition(row: &ColumnRow) -> ColumnDefinition {
    ColumnDefinition {
        name: row.column_name.to_lowercase(),
        data_type: map_data_type(&row.data_type).to_string(),
        date_format: row.data_format.clone(),
        is_nullable: row.is_nullable(),
    }
}

/// Build the definition of one table from its rows.
///
/// The table name is taken from the first row. Returns `None` for an
/// empty group.
pub fn process_table(rows: &[&ColumnRow], source: SourceDescriptor) -> Option<TableDefinition> {
    let first = rows.first()?;
    let columns = rows.iter().map(|row| column_definition(row)).collect();
    Some(TableDefinition::new(first.table_name.clone(), source, columns))
}

/// Group rows per source file and table, producing one definition per group.
pub fn process_source(rows: &[ColumnRow]) -> Vec<TableDefinition> {
    process_source_with_catalog(rows, &mut SourceCatalog::new())
}

/// Same as [`process_source`], filling a caller-owned catalog.
pub fn process_source_with_catalog(
    rows: &[ColumnRow],
    catalog: &mut SourceCatalog,
) -> Vec<TableDefinition> {
    let mut groups: BTreeMap<TableKey, Vec<&ColumnRow>> = BTreeMap::new();
    for row in rows {
        if let Some(field) = row.missing_group_field() {
            log_warning(format!(
                "Line {}: empty {}, column '{}' left out of the metadata",
                row.line, field, row.column_name
            ));
            continue;
        }
        groups
            .entry((row.source_key(), row.table_name.clone()))
            .or_default()
            .push(row);
    }

    groups
        .into_iter()
        .filter_map(|((source_key, _), group)| {
            let source = catalog.get_or_insert(&source_key).clone();
            process_table(&group, source)
        })
        .collect()
}

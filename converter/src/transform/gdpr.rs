//! GDPR personal data classification.
//!
//! Tables without any flagged column are left out of the document
//! entirely. So are rows with an empty table name.

use std::collections::BTreeMap;

use crate::logs::log_warning;
use crate::models::{ColumnRow, GdprEntry, PersonalData};

/// Build one entry per table holding at least one GDPR-flagged column.
///
/// Entries are sorted by table name; flagged columns keep input order.
pub fn build_gdpr_entries(rows: &[ColumnRow]) -> Vec<GdprEntry> {
    let mut tables: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for row in rows {
        if row.table_name.is_empty() {
            if row.gdpr_flag {
                log_warning(format!(
                    "Line {}: empty table_name, GDPR column '{}' left out",
                    row.line, row.column_name
                ));
            }
            continue;
        }
        let flagged = tables.entry(row.table_name.as_str()).or_default();
        if row.gdpr_flag {
            flagged.push(row.column_name.to_lowercase());
        }
    }

    tables
        .into_iter()
        .filter(|(_, hash)| !hash.is_empty())
        .map(|(name, hash)| GdprEntry {
            name: name.to_string(),
            personal_data: PersonalData { hash },
        })
        .collect()
}

/// Total number of hashed columns across entries.
pub fn hashed_column_count(entries: &[GdprEntry]) -> usize {
    entries.iter().map(|e| e.personal_data.hash.len()).sum()
}

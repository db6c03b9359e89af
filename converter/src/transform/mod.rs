//! Transformation module.
//!
//! Turns catalog rows into the generated documents:
//! - Types: source type → warehouse type mapping
//! - Grouper: rows → table definitions with shared source descriptors
//! - GDPR: rows → personal data classification
//! - Pipeline: the end-to-end conversion

pub mod gdpr;
pub mod grouper;
pub mod pipeline;
pub mod types;

pub use gdpr::build_gdpr_entries;
pub use grouper::{column_definition, process_source, process_table, SourceCatalog};
pub use pipeline::*;
pub use types::map_data_type;

//! Run configuration.
//!
//! Settings resolve in three layers: built-in defaults, then environment
//! variables (a `.env` file is loaded by the binary through `dotenvy`), then
//! CLI flags applied by the caller.
//!
//! | Variable | Default |
//! |---|---|
//! | `DWHGEN_INPUT` | `metadata.csv` |
//! | `DWHGEN_METADATA_OUTPUT` | `metadata.yaml` |
//! | `DWHGEN_GDPR_OUTPUT` | `gdpr.yaml` |
//! | `DWHGEN_DELIMITER` | `;` |
//! | `DWHGEN_SKIP_VALIDATION` | `false` |

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::parser::{parse_flag, DEFAULT_DELIMITER};

pub const DEFAULT_INPUT: &str = "metadata.csv";
pub const DEFAULT_METADATA_OUTPUT: &str = "metadata.yaml";
pub const DEFAULT_GDPR_OUTPUT: &str = "gdpr.yaml";

pub const ENV_INPUT: &str = "DWHGEN_INPUT";
pub const ENV_METADATA_OUTPUT: &str = "DWHGEN_METADATA_OUTPUT";
pub const ENV_GDPR_OUTPUT: &str = "DWHGEN_GDPR_OUTPUT";
pub const ENV_DELIMITER: &str = "DWHGEN_DELIMITER";
pub const ENV_SKIP_VALIDATION: &str = "DWHGEN_SKIP_VALIDATION";

/// Settings of one conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Catalog export to read
    pub input: PathBuf,
    /// Where the metadata document is written
    pub metadata_output: PathBuf,
    /// Where the GDPR document is written
    pub gdpr_output: PathBuf,
    /// Field separator of the export
    pub delimiter: u8,
    /// Skip validation of the generated documents
    pub skip_validation: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            metadata_output: PathBuf::from(DEFAULT_METADATA_OUTPUT),
            gdpr_output: PathBuf::from(DEFAULT_GDPR_OUTPUT),
            delimiter: DEFAULT_DELIMITER,
            skip_validation: false,
        }
    }
}

impl ConverterConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup(ENV_INPUT) {
            config.input = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_METADATA_OUTPUT) {
            config.metadata_output = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_GDPR_OUTPUT) {
            config.gdpr_output = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_DELIMITER) {
            config.delimiter = parse_delimiter(&v)?;
        }
        if let Some(v) = lookup(ENV_SKIP_VALIDATION) {
            config.skip_validation = parse_flag(&v).ok_or_else(|| ConfigError::InvalidFlag {
                key: ENV_SKIP_VALIDATION.to_string(),
                value: v.clone(),
            })?;
        }

        Ok(config)
    }
}

/// Parse a delimiter setting. `\t` and `tab` stand for a tab.
pub fn parse_delimiter(raw: &str) -> Result<u8, ConfigError> {
    match raw {
        "\\t" | "tab" | "TAB" => return Ok(b'\t'),
        _ => {}
    }

    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(ConfigError::InvalidDelimiter(raw.to_string())),
    }
}

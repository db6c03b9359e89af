//! dwhgen CLI - Generate DWH metadata and GDPR YAML from catalog exports
//!
//! # Main Command
//!
//! ```bash
//! dwhgen convert metadata.csv -m metadata.yaml -g gdpr.yaml
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! dwhgen parse metadata.csv        # Dump parsed catalog rows as JSON
//! dwhgen validate metadata.yaml    # Re-parse and validate a generated file
//! dwhgen types                     # Show the type mapping table
//! ```
//!
//! Defaults for `convert` come from `DWHGEN_*` environment variables, which
//! may be set in a `.env` file.

use clap::{Parser, Subcommand};
use dwhgen::config::{parse_delimiter, ConverterConfig};
use dwhgen::logs::{LogFormat, LogSettings, LOG_SINK};
use dwhgen::parser::{read_csv, DEFAULT_DELIMITER};
use dwhgen::transform::types::mappings_description;
use dwhgen::validation::{validate_gdpr_yaml, validate_metadata_yaml};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dwhgen")]
#[command(about = "Generate DWH table metadata and GDPR classification from catalog exports", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, global = true, default_value = "text")]
    log_format: LogFormat,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a catalog export into metadata and GDPR YAML files
    Convert {
        /// Input CSV file (default: $DWHGEN_INPUT or metadata.csv)
        input: Option<PathBuf>,

        /// Metadata YAML output (default: $DWHGEN_METADATA_OUTPUT or metadata.yaml)
        #[arg(short, long)]
        metadata: Option<PathBuf>,

        /// GDPR YAML output (default: $DWHGEN_GDPR_OUTPUT or gdpr.yaml)
        #[arg(short, long)]
        gdpr: Option<PathBuf>,

        /// CSV delimiter (default: ';')
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Skip validation of the generated documents
        #[arg(long)]
        no_validate: bool,
    },

    /// Parse a catalog export and output its rows as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (default: ';')
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a generated YAML document
    Validate {
        /// YAML file to check
        input: PathBuf,

        /// Treat the file as a GDPR document instead of metadata
        #[arg(long)]
        gdpr: bool,
    },

    /// Show the source type mapping
    Types,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOG_SINK.configure(LogSettings {
        format: cli.log_format,
        quiet: cli.quiet,
    });

    let result = match cli.command {
        Commands::Convert {
            input,
            metadata,
            gdpr,
            delimiter,
            no_validate,
        } => cmd_convert(input, metadata, gdpr, delimiter.as_deref(), no_validate),

        Commands::Parse {
            input,
            delimiter,
            output,
        } => cmd_parse(&input, delimiter.as_deref(), output.as_deref()),

        Commands::Validate { input, gdpr } => cmd_validate(&input, gdpr),

        Commands::Types => cmd_types(),
    };

    if let Err(e) = result {
        dwhgen::logs::log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: Option<PathBuf>,
    metadata: Option<PathBuf>,
    gdpr: Option<PathBuf>,
    delimiter: Option<&str>,
    no_validate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ConverterConfig::from_env()?;
    if let Some(p) = input {
        config.input = p;
    }
    if let Some(p) = metadata {
        config.metadata_output = p;
    }
    if let Some(p) = gdpr {
        config.gdpr_output = p;
    }
    if let Some(d) = delimiter {
        config.delimiter = parse_delimiter(d)?;
    }
    if no_validate {
        config.skip_validation = true;
    }

    let summary = dwhgen::run(&config)?;

    eprintln!("\n📊 Results:");
    eprintln!("   Rows: {}", summary.row_count);
    eprintln!("   Tables: {} ({} source files)", summary.table_count, summary.source_count);
    eprintln!(
        "   GDPR: {} tables, {} hashed columns",
        summary.gdpr_table_count, summary.gdpr_column_count
    );
    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_parse(
    input: &Path,
    delimiter: Option<&str>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let delimiter = match delimiter {
        Some(d) => parse_delimiter(d)?,
        None => DEFAULT_DELIMITER,
    };
    let result = read_csv(input, delimiter)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} rows", result.rows.len());

    let json = serde_json::to_string_pretty(&result.rows)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_validate(input: &Path, gdpr: bool) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let content = fs::read_to_string(input)?;
    if gdpr {
        let entries = validate_gdpr_yaml(&content)?;
        eprintln!("✅ Valid GDPR document: {} tables", entries.len());
    } else {
        let document = validate_metadata_yaml(&content)?;
        let columns: usize = document.tables.iter().map(|t| t.columns.len()).sum();
        eprintln!(
            "✅ Valid metadata document: {} tables, {} columns",
            document.tables.len(),
            columns
        );
    }

    Ok(())
}

fn cmd_types() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", mappings_description());
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

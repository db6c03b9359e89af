//! Catalog export reader.
//!
//! Reads the `;`-separated column catalog into [`ColumnRow`]s. The file
//! encoding is sniffed first since catalog exports frequently come out of
//! the database in Latin-1 or Windows-1252.

use std::collections::HashMap;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{CsvError, CsvResult};
use crate::models::ColumnRow;

/// Default field separator of catalog exports.
pub const DEFAULT_DELIMITER: u8 = b';';

pub const COL_TABLE_NAME: &str = "table_name";
pub const COL_COLUMN_NAME: &str = "COLUMN_NAME";
pub const COL_DATA_TYPE: &str = "DATA_TYPE";
pub const COL_DATA_FORMAT: &str = "DATA_FORMAT";
pub const COL_NULLABLE: &str = "NULLABLE";
pub const COL_FILE_NAME: &str = "FILE_NAME";
pub const COL_DECIMAL_SEPARATOR: &str = "DECIMAL_SEPARATOR";
pub const COL_FILE_TYPE: &str = "FILE_TYPE";
pub const COL_GDPR_FLAG: &str = "GDPR_FLAG";

/// Header columns every export must carry.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    COL_TABLE_NAME,
    COL_COLUMN_NAME,
    COL_DATA_TYPE,
    COL_DATA_FORMAT,
    COL_NULLABLE,
    COL_FILE_NAME,
    COL_DECIMAL_SEPARATOR,
    COL_FILE_TYPE,
    COL_GDPR_FLAG,
];

/// Result of reading an export, with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub rows: Vec<ColumnRow>,
    /// Detected encoding
    pub encoding: String,
    pub headers: Vec<String>,
}

/// Cell values read as missing, in addition to the empty cell.
pub const MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "iso-8859-15" | "latin-9" | "latin9" => "iso-8859-15".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

fn decode_with(
    decoder: &'static encoding_rs::Encoding,
    bytes: &[u8],
    label: &str,
) -> CsvResult<String> {
    let (text, _, had_errors) = decoder.decode(bytes);
    if had_errors {
        return Err(CsvError::Encoding(format!("invalid {} sequence", label)));
    }
    Ok(text.into_owned())
}

/// Decode bytes to a string using the given encoding.
///
/// Latin-1 labels decode as Windows-1252, a superset for every printable
/// byte. Unknown encodings fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match String::from_utf8(bytes.to_vec()) {
            Ok(s) => s,
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        },
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            decode_with(encoding_rs::WINDOWS_1252, bytes, encoding)?
        }
        "iso-8859-15" | "latin-9" | "latin9" => {
            decode_with(encoding_rs::ISO_8859_15, bytes, encoding)?
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    Ok(match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    })
}

/// Whether a cell holds no value.
pub fn is_missing(cell: &str) -> bool {
    cell.is_empty() || MISSING_MARKERS.contains(&cell)
}

/// Parse a GDPR flag cell. Empty means not flagged.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "" | "false" | "0" | "n" | "no" => Some(false),
        "true" | "1" | "y" | "yes" => Some(true),
        _ => None,
    }
}

/// Read a catalog export from disk.
///
/// # Example
/// ```ignore
/// let result = dwhgen::parser::read_csv("metadata.csv", b';')?;
/// println!("{} rows ({})", result.rows.len(), result.encoding);
/// ```
pub fn read_csv<P: AsRef<Path>>(path: P, delimiter: u8) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes, delimiter)
}

/// Parse raw export bytes.
///
/// Valid UTF-8 is taken as is; chardet only guesses the encoding of
/// anything else.
pub fn parse_bytes(bytes: &[u8], delimiter: u8) -> CsvResult<ParseResult> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let body = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
    let (encoding, content) = match std::str::from_utf8(body) {
        Ok(text) => ("utf-8".to_string(), text.to_string()),
        Err(_) => {
            let encoding = detect_encoding(bytes);
            let content = decode_content(bytes, &encoding)?;
            (encoding, content)
        }
    };
    let (headers, rows) = parse_records(&content, delimiter)?;

    Ok(ParseResult {
        rows,
        encoding,
        headers,
    })
}

/// Parse export text into rows.
///
/// # Example
/// ```ignore
/// let csv = "table_name;COLUMN_NAME;DATA_TYPE;DATA_FORMAT;NULLABLE;FILE_NAME;DECIMAL_SEPARATOR;FILE_TYPE;GDPR_FLAG\n\
///            CUSTOMER;EMAIL;VARCHAR2(100);;Y;CUSTOMER;,;CSV;True";
/// let rows = parse_str(csv, b';')?;
/// assert_eq!(rows[0].column_name, "EMAIL");
/// ```
pub fn parse_str(content: &str, delimiter: u8) -> CsvResult<Vec<ColumnRow>> {
    parse_records(content, delimiter).map(|(_, rows)| rows)
}

fn parse_records(content: &str, delimiter: u8) -> CsvResult<(Vec<String>, Vec<ColumnRow>)> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let columns = ColumnIndex::new(&headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(columns.row(&record)?);
    }

    Ok((headers, rows))
}

/// Positions of the required columns in the header.
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn new(headers: &[String]) -> CsvResult<Self> {
        let mut positions = HashMap::new();
        for name in REQUIRED_COLUMNS {
            let idx = headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| CsvError::MissingColumn(name.to_string()))?;
            positions.insert(name, idx);
        }
        Ok(Self { positions })
    }

    fn get<'r>(&self, record: &'r StringRecord, name: &'static str) -> &'r str {
        self.positions
            .get(name)
            .and_then(|&idx| record.get(idx))
            .unwrap_or("")
    }

    fn row(&self, record: &StringRecord) -> CsvResult<ColumnRow> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let raw_flag = self.get(record, COL_GDPR_FLAG);
        let gdpr_flag = parse_flag(raw_flag).ok_or_else(|| CsvError::InvalidValue {
            line,
            column: COL_GDPR_FLAG.to_string(),
            value: raw_flag.to_string(),
            message: "expected a boolean".to_string(),
        })?;

        let data_format = Some(self.get(record, COL_DATA_FORMAT))
            .filter(|s| !is_missing(s))
            .map(str::to_string);

        Ok(ColumnRow {
            line,
            table_name: self.get(record, COL_TABLE_NAME).to_string(),
            column_name: self.get(record, COL_COLUMN_NAME).to_string(),
            data_type: self.get(record, COL_DATA_TYPE).to_string(),
            data_format,
            nullable: self.get(record, COL_NULLABLE).to_string(),
            file_name: self.get(record, COL_FILE_NAME).to_string(),
            decimal_separator: self.get(record, COL_DECIMAL_SEPARATOR).to_string(),
            file_type: self.get(record, COL_FILE_TYPE).to_string(),
            gdpr_flag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "table_name;COLUMN_NAME;DATA_TYPE;DATA_FORMAT;NULLABLE;FILE_NAME;DECIMAL_SEPARATOR;FILE_TYPE;GDPR_FLAG";

    fn csv(lines: &[&str]) -> String {
        let mut out = HEADER.to_string();
        for line in lines {
            out.push('\n');
            out.push_str(line);
        }
        out
    }

    #[test]
    fn test_simple_rows() {
        let content = csv(&[
            "CUSTOMER;EMAIL;VARCHAR2(100);;Y;CUSTOMER;,;CSV;True",
            "CUSTOMER;BIRTH_DATE;DATE;YYYY-MM-DD;N;CUSTOMER;,;CSV;False",
        ]);
        let rows = parse_str(&content, b';').unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].table_name, "CUSTOMER");
        assert_eq!(rows[0].column_name, "EMAIL");
        assert_eq!(rows[0].data_format, None);
        assert!(rows[0].is_nullable());
        assert!(rows[0].gdpr_flag);
        assert_eq!(rows[0].line, 2);

        assert_eq!(rows[1].data_format.as_deref(), Some("YYYY-MM-DD"));
        assert!(!rows[1].is_nullable());
        assert!(!rows[1].gdpr_flag);
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn test_quoted_values() {
        let content = csv(&[r#""ORDERS";"AMOUNT";"NUMBER(10,2)";"";"N";"ORDERS";",";"CSV";"false""#]);
        let rows = parse_str(&content, b';').unwrap();

        assert_eq!(rows[0].data_type, "NUMBER(10,2)");
        assert_eq!(rows[0].decimal_separator, ",");
        assert_eq!(rows[0].data_format, None);
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let content = "GDPR_FLAG;FILE_TYPE;DECIMAL_SEPARATOR;FILE_NAME;NULLABLE;DATA_FORMAT;DATA_TYPE;COLUMN_NAME;table_name;EXTRA\n\
                       true;CSV;.;F;Y;;DATE;D;T;ignored";
        let rows = parse_str(content, b';').unwrap();

        assert_eq!(rows[0].table_name, "T");
        assert_eq!(rows[0].column_name, "D");
        assert_eq!(rows[0].decimal_separator, ".");
        assert!(rows[0].gdpr_flag);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let content = csv(&["A;X;DATE;;N;F;.;CSV;false", "", "A;Y;DATE;;N;F;.;CSV;false", ""]);
        let rows = parse_str(&content, b';').unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_header_only() {
        let rows = parse_str(HEADER, b';').unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_empty_csv_error() {
        let err = parse_str("", b';').unwrap_err();
        assert!(matches!(err, CsvError::EmptyFile));
    }

    #[test]
    fn test_missing_column() {
        let content = "table_name;COLUMN_NAME;DATA_TYPE\nA;B;C";
        let err = parse_str(content, b';').unwrap_err();
        match err {
            CsvError::MissingColumn(col) => assert_eq!(col, "DATA_FORMAT"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_delimiter_is_missing_column() {
        let content = HEADER.replace(';', ",");
        let err = parse_str(&content, b';').unwrap_err();
        assert!(matches!(err, CsvError::MissingColumn(_)));
    }

    #[test]
    fn test_unequal_field_count() {
        let content = csv(&["A;X;DATE;;N;F;.;CSV;false", "A;Y;DATE"]);
        let err = parse_str(&content, b';').unwrap_err();
        match err {
            CsvError::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("expected 9 fields"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_gdpr_flag() {
        let content = csv(&["A;X;DATE;;N;F;.;CSV;perhaps"]);
        let err = parse_str(&content, b';').unwrap_err();
        match err {
            CsvError::InvalidValue { line, column, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "GDPR_FLAG");
                assert_eq!(value, "perhaps");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_flag_variants() {
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag("YES"), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("FALSE"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("n"), Some(false));
        assert_eq!(parse_flag("x"), None);
    }

    #[test]
    fn test_bom_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(csv(&["A;X;DATE;;N;F;.;CSV;false"]).as_bytes());
        let result = parse_bytes(&bytes, b';').unwrap();

        assert_eq!(result.headers[0], "table_name");
        assert_eq!(result.rows.len(), 1);
    }

    #[test]
    fn test_utf8_names_not_redetected() {
        let content = csv(&[
            "KUNDE;ADRESSE_é;VARCHAR2(10);;Y;F;,;CSV;False",
            "T;naïve;VARCHAR2(10);;Y;F;,;CSV;False",
            "T;STRAẞE;VARCHAR2(10);;Y;F;,;CSV;False",
        ]);
        let result = parse_bytes(content.as_bytes(), b';').unwrap();

        assert_eq!(result.encoding, "utf-8");
        let names: Vec<&str> = result.rows.iter().map(|r| r.column_name.as_str()).collect();
        assert_eq!(names, vec!["ADRESSE_é", "naïve", "STRAẞE"]);
    }

    #[test]
    fn test_non_utf8_input_still_parses() {
        let mut bytes = csv(&[]).into_bytes();
        // "SOCIÉTÉ" in ISO-8859-1
        bytes.extend_from_slice(b"\nA;SOCI\xC9T\xC9;DATE;;N;F;.;CSV;false");
        let result = parse_bytes(&bytes, b';').unwrap();

        assert_eq!(result.rows.len(), 1);
        assert!(result.rows[0].column_name.starts_with("SOCI"));
    }

    #[test]
    fn test_missing_markers_in_data_format() {
        let content = csv(&[
            "A;X;DATE;NULL;N;F;.;CSV;false",
            "A;Y;DATE;NaN;N;F;.;CSV;false",
            "A;Z;DATE;N/A;N;F;.;CSV;false",
            "A;W;DATE;DD.MM.YYYY;N;F;.;CSV;false",
        ]);
        let rows = parse_str(&content, b';').unwrap();
        let formats: Vec<Option<&str>> = rows.iter().map(|r| r.data_format.as_deref()).collect();
        assert_eq!(formats, vec![None, None, None, Some("DD.MM.YYYY")]);
    }

    #[test]
    fn test_latin1_currency_sign() {
        let bytes: &[u8] = b"PRIX_\xA4";
        assert_eq!(decode_content(bytes, "iso-8859-1").unwrap(), "PRIX_\u{a4}");
        assert_eq!(decode_content(bytes, "iso-8859-15").unwrap(), "PRIX_\u{20ac}");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_csv("/definitely/not/here.csv", b';').unwrap_err();
        assert!(matches!(err, CsvError::Io(_)));
    }
}

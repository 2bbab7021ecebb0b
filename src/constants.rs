//! Format constants for extended CSV files
//!
//! Markers, delimiters and well-known header keys shared by the reader,
//! the writer and the header parser.

// =============================================================================
// Extended Header Section
// =============================================================================

/// Character introducing every line of the extended header section
pub const COMMENT_MARKER: &str = "#";

/// Prefix written in front of header lines (marker plus one space)
pub const COMMENT_PREFIX: &str = "# ";

/// Separator between a header key and its value
pub const KEY_VALUE_DELIMITER: &str = ": ";

/// The delimiter without its padding, as seen at the end of a trimmed line
pub const KEY_VALUE_DELIMITER_CHAR: char = ':';

/// Separator used when a list header value is recombined into one string
pub const LIST_VALUE_SEPARATOR: &str = "\n";

// =============================================================================
// Well-known Header Keys
// =============================================================================

/// Header key declaring the sentinel token(s) for missing data
pub const MISSING_VALUE_KEY: &str = "missing_value";

// =============================================================================
// Data Section
// =============================================================================

/// Field separator of the column header row and the data rows
pub const FIELD_SEPARATOR: char = ',';

/// UTF-8 byte order mark, skipped at the start of input when configured
pub const UTF8_BOM: char = '\u{feff}';

/// Cell spellings the tabular engine always treats as null, independent of
/// any declared `missing_value`
pub const NATIVE_NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

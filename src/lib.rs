//! Extended CSV (XCSV) Library
//!
//! Reads and writes self-describing tabular text files made of:
//! - An extended header section of `# key: value` lines, with multi-line
//!   values and embedded `value (units)` tokens
//! - A column header row of `name (units) [notes]` tokens
//! - Plain comma-delimited data rows, held in a polars `DataFrame`
//!
//! Cells matching the header's `missing_value` item are masked to nulls
//! when metadata parsing is enabled.
//!
//! ```rust
//! use xcsv::{Reader, Writer};
//!
//! let text = "# id: 1\n# missing_value: -999\ntime (year),depth (m)\n2012,0.5\n2011,-999\n";
//! let doc = Reader::default().read_str(text)?;
//!
//! assert_eq!(doc.column_header("depth (m)").unwrap().units, "m");
//! assert_eq!(doc.cell("depth (m)", 1)?, None);
//!
//! let written = Writer::default().write_string(&doc)?;
//! assert!(written.starts_with("# id: 1\n"));
//! # Ok::<(), xcsv::XcsvError>(())
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod header;
pub mod masking;
pub mod models;
pub mod reader;
pub mod table;
pub mod tokens;
pub mod writer;

// Re-export commonly used types
pub use config::{ReaderConfig, WriterConfig};
pub use document::{Document, Metadata};
pub use error::{Result, XcsvError};
pub use header::{HeaderBlockParser, HeaderBlockWriter, parse_header_lines, write_header_lines};
pub use masking::MissingValueMasker;
pub use models::{CastValue, ColumnHeaderSpec, ColumnHeaders, HeaderBlock, HeaderEntry};
pub use reader::Reader;
pub use tokens::{parse_column_header, parse_value_units};
pub use writer::Writer;

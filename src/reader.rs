//! Reading extended CSV documents.
//!
//! A document is laid out as:
//!
//! ```text
//! # id: 1
//! # missing_value: -999.99
//! time (year) [a],depth (m)
//! 2012,0.575
//! 2011,-999.99
//! ```
//!
//! Leading comment lines form the extended header section. The first
//! following non-blank, non-comment line is the column header row and the
//! rest are data rows, one per line, without field quoting.

use crate::config::ReaderConfig;
use crate::constants::{FIELD_SEPARATOR, UTF8_BOM};
use crate::document::Document;
use crate::error::{Result, XcsvError};
use crate::header::{HeaderBlockParser, strip_comment_marker};
use crate::masking::MissingValueMasker;
use crate::table::{frame_from_rows, infer_column_types};
use crate::tokens::parse_column_headers;
use std::path::Path;
use tracing::{debug, info};

/// Reads documents according to a [`ReaderConfig`]
#[derive(Debug, Clone, Default)]
pub struct Reader {
    config: ReaderConfig,
}

impl Reader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Read a document from a file
    pub fn read_path(&self, path: &Path) -> Result<Document> {
        let bytes = std::fs::read(path)?;
        info!("Reading {} ({} bytes)", path.display(), bytes.len());
        self.read_bytes(bytes)
    }

    /// Read a document from UTF-8 encoded bytes
    pub fn read_bytes(&self, bytes: Vec<u8>) -> Result<Document> {
        let text = String::from_utf8(bytes)?;
        self.read_str(&text)
    }

    /// Read a document from text
    pub fn read_str(&self, text: &str) -> Result<Document> {
        self.config.validate()?;

        let text = if self.config.strip_bom {
            text.strip_prefix(UTF8_BOM).unwrap_or(text)
        } else {
            text
        };
        let comment = self.config.comment.as_str();
        let parse_metadata = self.config.parse_metadata;

        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .peekable();

        let mut header_lines = Vec::new();
        while let Some((line_number, line)) = lines.next_if(|(_, line)| line.starts_with(comment)) {
            if let Some(stripped) = strip_comment_marker(line, comment) {
                header_lines.push((line_number, stripped));
            }
        }
        debug!("Extended header section has {} lines", header_lines.len());

        let header = HeaderBlockParser::new()
            .with_parse_metadata(parse_metadata)
            .parse_numbered(header_lines)?;

        let mut body = lines.filter(|(_, line)| !line.trim().is_empty() && !line.starts_with(comment));

        let (_, column_header_row) = body.next().ok_or(XcsvError::MissingColumnHeaders)?;
        let labels: Vec<String> = column_header_row
            .split(FIELD_SEPARATOR)
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (line_number, line) in body {
            let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
            if fields.len() != labels.len() {
                return Err(XcsvError::ColumnCountMismatch {
                    line_number,
                    expected: labels.len(),
                    found: fields.len(),
                });
            }
            rows.push(fields);
        }

        let mut data = frame_from_rows(&labels, &rows)?;

        if parse_metadata {
            if let Some(masker) = MissingValueMasker::from_header(&header) {
                data = masker.apply(&data)?;
            }
        }
        let data = infer_column_types(&data)?;

        let column_headers = parse_column_headers(&labels, parse_metadata);

        info!(
            "Read document with {} header items, {} columns and {} rows",
            header.len(),
            data.width(),
            data.height()
        );

        Document::new(header, column_headers, data)
    }
}

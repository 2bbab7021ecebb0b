//! Writing extended CSV documents.

use crate::config::WriterConfig;
use crate::document::Document;
use crate::error::Result;
use crate::header::HeaderBlockWriter;
use crate::table::render_csv;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Writes documents according to a [`WriterConfig`]
#[derive(Debug, Clone, Default)]
pub struct Writer {
    config: WriterConfig,
}

impl Writer {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Render the whole document: header lines, column header row, data rows
    pub fn write_string(&self, document: &Document) -> Result<String> {
        self.config.validate()?;

        let header_lines = HeaderBlockWriter::new()
            .with_comment(self.config.comment.as_str())
            .write(document.header());
        debug!("Writing {} header lines", header_lines.len());

        let mut out = String::new();
        for line in &header_lines {
            out.push_str(line);
            out.push('\n');
        }

        let mut data = document.data().clone();
        out.push_str(&render_csv(&mut data)?);

        Ok(out)
    }

    /// Write the document to any byte sink
    pub fn write_to<W: Write>(&self, document: &Document, mut out: W) -> Result<()> {
        let text = self.write_string(document)?;
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Write the document to a file, replacing any existing content
    pub fn write_path(&self, document: &Document, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(document, BufWriter::new(file))?;
        info!("Wrote {}", path.display());
        Ok(())
    }
}

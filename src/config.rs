//! Configuration for reading and writing extended CSV files.
//!
//! Options are explicit values passed to [`Reader`](crate::reader::Reader)
//! and [`Writer`](crate::writer::Writer); there is no process-wide state.

use crate::constants::{COMMENT_MARKER, COMMENT_PREFIX};
use crate::error::{Result, XcsvError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Options controlling how a document is read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Parse value/units and column header tokens, and mask declared
    /// missing values in the data
    pub parse_metadata: bool,

    /// Marker introducing extended header lines
    pub comment: String,

    /// Skip a UTF-8 byte order mark at the start of the input
    pub strip_bom: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            parse_metadata: true,
            comment: COMMENT_MARKER.to_string(),
            strip_bom: true,
        }
    }
}

impl ReaderConfig {
    /// Enable or disable metadata parsing
    pub fn with_parse_metadata(mut self, parse_metadata: bool) -> Self {
        self.parse_metadata = parse_metadata;
        self
    }

    /// Set the comment marker of the extended header section
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Keep a leading byte order mark as part of the first line
    pub fn without_bom_stripping(mut self) -> Self {
        self.strip_bom = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.comment.trim().is_empty() {
            return Err(XcsvError::Configuration {
                message: "comment marker must not be blank".to_string(),
            });
        }
        debug!("Reader configuration: {:?}", self);
        Ok(())
    }
}

/// Options controlling how a document is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Prefix of every extended header line, marker plus padding
    pub comment: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            comment: COMMENT_PREFIX.to_string(),
        }
    }
}

impl WriterConfig {
    /// Set the header line prefix
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.comment.trim().is_empty() {
            return Err(XcsvError::Configuration {
                message: "comment prefix must not be blank".to_string(),
            });
        }
        debug!("Writer configuration: {:?}", self);
        Ok(())
    }
}

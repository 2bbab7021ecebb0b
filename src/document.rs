//! The extended CSV document: header metadata, column headers and data.

use crate::error::{Result, XcsvError};
use crate::masking::MissingValueMasker;
use crate::models::{CastValue, ColumnHeaderSpec, ColumnHeaders, HeaderBlock, HeaderEntry};
use crate::table::cell_text;
use crate::tokens::parse_column_headers;
use indexmap::IndexMap;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Parsed metadata of a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Extended header section
    pub header: HeaderBlock,
    /// Column header row, keyed by the raw column header string
    pub column_headers: ColumnHeaders,
}

/// An extended CSV document
///
/// The data frame's column labels are the raw column header strings, in the
/// same order as the column header metadata.
#[derive(Debug, Clone)]
pub struct Document {
    metadata: Metadata,
    data: DataFrame,
}

impl Document {
    /// Assemble a document, checking that every data column has a column
    /// header entry and vice versa
    pub fn new(header: HeaderBlock, column_headers: ColumnHeaders, data: DataFrame) -> Result<Self> {
        let frame_labels: Vec<&str> = data
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        let header_labels: Vec<&str> = column_headers.labels().collect();

        if frame_labels != header_labels {
            return Err(XcsvError::ColumnHeaderMismatch {
                reason: format!(
                    "data columns {:?} but column headers {:?}",
                    frame_labels, header_labels
                ),
            });
        }

        Ok(Self {
            metadata: Metadata {
                header,
                column_headers,
            },
            data,
        })
    }

    /// Assemble a document, deriving the column headers from the data labels
    pub fn from_data(header: HeaderBlock, data: DataFrame, parse_metadata: bool) -> Result<Self> {
        let column_headers = parse_column_headers(
            data.get_column_names().into_iter().map(|name| name.as_str()),
            parse_metadata,
        );
        Self::new(header, column_headers, data)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn header(&self) -> &HeaderBlock {
        &self.metadata.header
    }

    pub fn column_headers(&self) -> &ColumnHeaders {
        &self.metadata.column_headers
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn into_parts(self) -> (Metadata, DataFrame) {
        (self.metadata, self.data)
    }

    /// Raw header item
    pub fn metadata_item(&self, key: &str) -> Option<&HeaderEntry> {
        self.metadata.header.get(key)
    }

    /// Header item as it appears in the file: `value (units)` for
    /// value/units items, list elements joined by newlines
    pub fn metadata_item_string(&self, key: &str) -> Option<String> {
        self.metadata_item(key).map(HeaderEntry::to_header_string)
    }

    /// Header item without its units
    pub fn metadata_item_value(&self, key: &str) -> Option<String> {
        self.metadata_item(key).map(HeaderEntry::value_string)
    }

    /// Header item value cast to an integer or float where possible
    pub fn metadata_item_cast(&self, key: &str) -> Option<CastValue> {
        self.metadata_item_value(key)
            .map(|value| CastValue::from_text(&value))
    }

    pub fn column_header(&self, label: &str) -> Option<&ColumnHeaderSpec> {
        self.metadata.column_headers.get(label)
    }

    /// Column header reconstructed from its parsed parts
    pub fn column_header_string(&self, label: &str) -> Option<String> {
        self.column_header(label)
            .map(ColumnHeaderSpec::to_header_string)
    }

    /// Text of the `[notes]` header item a column header refers to
    pub fn notes_for_column_header(&self, label: &str) -> Option<String> {
        let notes_key = self.column_header(label)?.notes_key()?;
        self.metadata_item_string(&notes_key)
    }

    /// Column header label to column name
    pub fn column_name_map(&self) -> IndexMap<String, String> {
        self.metadata
            .column_headers
            .iter()
            .map(|(label, spec)| (label.to_string(), spec.name.clone()))
            .collect()
    }

    /// Column name to column header label
    pub fn column_label_map(&self) -> IndexMap<String, String> {
        self.metadata
            .column_headers
            .iter()
            .map(|(label, spec)| (spec.name.clone(), label.to_string()))
            .collect()
    }

    /// Copy of the data with columns labelled by name instead of by the
    /// full column header
    pub fn data_with_names(&self) -> Result<DataFrame> {
        let mut seen = HashSet::new();
        for (_, spec) in self.metadata.column_headers.iter() {
            if !seen.insert(spec.name.as_str()) {
                return Err(XcsvError::ColumnHeaderMismatch {
                    reason: format!("column name '{}' is not unique", spec.name),
                });
            }
        }

        let mut data = self.data.clone();
        for (label, spec) in self.metadata.column_headers.iter() {
            data.rename(label, spec.name.as_str().into())?;
        }
        Ok(data)
    }

    /// Textual form of one cell, `None` when it is null
    pub fn cell(&self, label: &str, row: usize) -> Result<Option<String>> {
        cell_text(&self.data, label, row)
    }

    /// Null out cells matching the header's `missing_value` item, if any
    pub fn mask_missing_values(&mut self) -> Result<()> {
        if let Some(masker) = MissingValueMasker::from_header(&self.metadata.header) {
            self.data = masker.apply(&self.data)?;
        }
        Ok(())
    }
}

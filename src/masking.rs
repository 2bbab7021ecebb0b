//! Missing value masking
//!
//! Replaces data cells matching the `missing_value` header item with nulls.
//! This runs on top of the engine's own null spellings (see
//! [`NATIVE_NULL_TOKENS`](crate::constants::NATIVE_NULL_TOKENS)); both may
//! apply to the same dataset.

use crate::constants::MISSING_VALUE_KEY;
use crate::error::Result;
use crate::models::HeaderBlock;
use polars::prelude::*;
use tracing::{debug, info};

/// Masks cells equal to any of a set of sentinel tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingValueMasker {
    tokens: Vec<String>,
}

impl MissingValueMasker {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Masker for the header's `missing_value` item, if it declares one
    pub fn from_header(header: &HeaderBlock) -> Option<Self> {
        header
            .get(MISSING_VALUE_KEY)
            .map(|entry| Self::new(entry.tokens().into_iter().map(str::trim)))
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    fn matches_text(&self, value: &str) -> bool {
        self.tokens.iter().any(|token| token == value)
    }

    /// Return a copy of `data` with every matching cell set to null
    ///
    /// String columns are compared on exact text. Int64 and Float64 columns,
    /// as found in frames built outside the reader, are compared against the
    /// tokens that parse as that type.
    pub fn apply(&self, data: &DataFrame) -> Result<DataFrame> {
        let mut masked_cells = 0;
        let mut columns = Vec::with_capacity(data.width());

        for column in data.get_columns() {
            let masked = self.mask_column(column)?;
            masked_cells += masked.null_count() - column.null_count();
            columns.push(masked);
        }

        info!(
            "Masked {} missing value cells using tokens {:?}",
            masked_cells, self.tokens
        );

        Ok(DataFrame::new(columns)?)
    }

    fn mask_column(&self, column: &Column) -> Result<Column> {
        let series = column.as_materialized_series();
        let name = series.name().clone();

        let masked = match series.dtype() {
            DataType::String => {
                let values: StringChunked = series
                    .str()?
                    .into_iter()
                    .map(|value| value.filter(|value| !self.matches_text(value)))
                    .collect();
                values.with_name(name).into_series()
            }
            DataType::Int64 => {
                let targets: Vec<i64> = self.parsed_tokens();
                let values: Int64Chunked = series
                    .i64()?
                    .into_iter()
                    .map(|value| value.filter(|value| !targets.contains(value)))
                    .collect();
                values.with_name(name).into_series()
            }
            DataType::Float64 => {
                let targets: Vec<f64> = self.parsed_tokens();
                let values: Float64Chunked = series
                    .f64()?
                    .into_iter()
                    .map(|value| value.filter(|value| !targets.contains(value)))
                    .collect();
                values.with_name(name).into_series()
            }
            other => {
                debug!("Column '{}' of type {} is not masked", name, other);
                return Ok(column.clone());
            }
        };

        Ok(masked.into())
    }

    fn parsed_tokens<T: std::str::FromStr>(&self) -> Vec<T> {
        self.tokens
            .iter()
            .filter_map(|token| token.trim().parse().ok())
            .collect()
    }
}

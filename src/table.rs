//! Tabular engine adapter over polars.
//!
//! The data section is held in a polars [`DataFrame`] whose column labels
//! are the raw column header strings. Rows are first loaded as String
//! columns so that masking can compare raw tokens, then each column is
//! narrowed to Int64 or Float64 when every value parses as that type.

use crate::constants::NATIVE_NULL_TOKENS;
use crate::error::{Result, XcsvError};
use polars::prelude::*;
use tracing::debug;

/// Cell spellings the engine treats as null on its own
pub fn is_native_null(token: &str) -> bool {
    NATIVE_NULL_TOKENS.contains(&token)
}

/// Build a String-typed frame from split data rows
///
/// Every row must have one field per label; the reader checks this before
/// calling in. Native null spellings become nulls.
pub fn frame_from_rows<R, S>(labels: &[String], rows: &[R]) -> Result<DataFrame>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut values: Vec<Vec<Option<&str>>> = vec![Vec::new(); labels.len()];

    for row in rows {
        for (column, field) in values.iter_mut().zip(row.as_ref()) {
            let field = field.as_ref();
            column.push(Some(field).filter(|field| !is_native_null(field)));
        }
    }

    let columns: Vec<Column> = labels
        .iter()
        .zip(values)
        .map(|(label, column_values)| Column::new(label.as_str().into(), column_values))
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Narrow each String column to Int64, else Float64, else leave it as text
///
/// Columns holding no values at all stay String.
pub fn infer_column_types(data: &DataFrame) -> Result<DataFrame> {
    let columns = data
        .get_columns()
        .iter()
        .map(infer_column_type)
        .collect::<Vec<Column>>();

    Ok(DataFrame::new(columns)?)
}

fn infer_column_type(column: &Column) -> Column {
    let series = column.as_materialized_series();
    if series.dtype() != &DataType::String || series.null_count() == series.len() {
        return column.clone();
    }

    for dtype in [DataType::Int64, DataType::Float64] {
        if let Ok(cast) = series.strict_cast(&dtype) {
            debug!("Column '{}' inferred as {}", series.name(), dtype);
            return cast.into();
        }
    }

    column.clone()
}

/// Textual form of one cell, `None` when it is null
pub fn cell_text(data: &DataFrame, label: &str, row: usize) -> Result<Option<String>> {
    let column = data.column(label).map_err(|_| XcsvError::UnknownColumn {
        label: label.to_string(),
    })?;

    let text = match column.as_materialized_series().get(row)? {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        other => Some(other.to_string()),
    };

    Ok(text)
}

/// Render the frame as a header row followed by one line per data row
pub fn render_csv(data: &mut DataFrame) -> Result<String> {
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(data)?;

    Ok(String::from_utf8(buffer)?)
}

//! Core data structures for extended CSV metadata.
//!
//! Defines the header entry shapes, the ordered header block, the parsed
//! column header specs and the primitive cast of header values.

use crate::constants::{KEY_VALUE_DELIMITER, LIST_VALUE_SEPARATOR};
use crate::error::{Result, XcsvError};
use crate::tokens::parse_value_units;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of one key in the extended header section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderEntry {
    /// A single line value
    Scalar(String),
    /// A value spread over continuation lines, one element per line
    List(Vec<String>),
    /// A single line value of the form `value (units)`
    ValueUnits { value: String, units: String },
}

impl HeaderEntry {
    pub fn scalar(value: impl Into<String>) -> Self {
        HeaderEntry::Scalar(value.into())
    }

    pub fn value_units(value: impl Into<String>, units: impl Into<String>) -> Self {
        HeaderEntry::ValueUnits {
            value: value.into(),
            units: units.into(),
        }
    }

    pub fn list<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        HeaderEntry::List(elements.into_iter().map(Into::into).collect())
    }

    /// The value as it appears in the file, with list elements joined by newlines
    pub fn to_header_string(&self) -> String {
        match self {
            HeaderEntry::Scalar(value) => value.clone(),
            HeaderEntry::List(elements) => elements.join(LIST_VALUE_SEPARATOR),
            HeaderEntry::ValueUnits { value, units } => format!("{} ({})", value, units),
        }
    }

    /// The value without any units
    pub fn value_string(&self) -> String {
        match self {
            HeaderEntry::ValueUnits { value, .. } => value.clone(),
            other => other.to_header_string(),
        }
    }

    /// The units, if this entry carries any
    pub fn units(&self) -> Option<&str> {
        match self {
            HeaderEntry::ValueUnits { units, .. } => Some(units),
            _ => None,
        }
    }

    /// Individual tokens held by this entry: every element of a list,
    /// otherwise the single value
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            HeaderEntry::Scalar(value) => vec![value.as_str()],
            HeaderEntry::List(elements) => elements.iter().map(String::as_str).collect(),
            HeaderEntry::ValueUnits { value, .. } => vec![value.as_str()],
        }
    }
}

impl fmt::Display for HeaderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header_string())
    }
}

/// Ordered key/value metadata of the extended header section
///
/// Keys keep the position in which they were first inserted. Inserting an
/// existing key replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderBlock {
    entries: IndexMap<String, HeaderEntry>,
}

impl HeaderBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a block from `(key, entry)` pairs, validating every key and entry
    pub fn from_entries<I, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, HeaderEntry)>,
        K: Into<String>,
    {
        let mut block = Self::new();
        for (key, entry) in entries {
            block.insert(key, entry)?;
        }
        Ok(block)
    }

    /// Insert or replace a key, returning the previous entry
    ///
    /// Keys must be non-empty, trimmed, single-line and must not contain the
    /// `": "` delimiter. Values must be single-line and trimmed, lists need
    /// at least two elements, and a value/units pair must read back as the
    /// same pair. Anything else could not be written back unambiguously.
    pub fn insert(&mut self, key: impl Into<String>, entry: HeaderEntry) -> Result<Option<HeaderEntry>> {
        let key = key.into();
        validate_key(&key)?;
        validate_entry(&key, &entry)?;
        Ok(self.entries.insert(key, entry))
    }

    /// Insert a key already known to be valid (split from a header line)
    pub(crate) fn insert_parsed(&mut self, key: String, entry: HeaderEntry) {
        self.entries.insert(key, entry);
    }

    pub fn get(&self, key: &str) -> Option<&HeaderEntry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<HeaderEntry> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn validate_key(key: &str) -> Result<()> {
    let invalid = key.is_empty()
        || key.trim() != key
        || has_line_break(key)
        || key.contains(KEY_VALUE_DELIMITER);

    if invalid {
        return Err(XcsvError::InvalidHeaderKey {
            key: key.to_string(),
        });
    }
    Ok(())
}

fn validate_entry(key: &str, entry: &HeaderEntry) -> Result<()> {
    let invalid = |reason: &str| XcsvError::InvalidHeaderValue {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    match entry {
        HeaderEntry::Scalar(value) => check_line(value).map_err(invalid)?,
        HeaderEntry::List(elements) => {
            if elements.len() < 2 {
                return Err(invalid("a list needs at least two elements"));
            }
            for element in elements {
                check_line(element).map_err(invalid)?;
            }
        }
        HeaderEntry::ValueUnits { value, units } => {
            check_line(value).map_err(invalid)?;
            check_line(units).map_err(invalid)?;
            if parse_value_units(&entry.to_header_string()) != *entry {
                return Err(invalid("value and units would not be read back as a pair"));
            }
        }
    }
    Ok(())
}

fn check_line(value: &str) -> std::result::Result<(), &'static str> {
    if has_line_break(value) {
        Err("values must be on a single line")
    } else if value.trim() != value {
        Err("values must not start or end with whitespace")
    } else {
        Ok(())
    }
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\n', '\r'])
}

/// Parsed form of one column header token, `name (units) [notes]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnHeaderSpec {
    pub name: String,
    /// Empty when the column header declares no units
    pub units: String,
    /// Reference to a `[notes]` key in the header block
    pub notes: Option<String>,
}

impl ColumnHeaderSpec {
    pub fn new(name: impl Into<String>, units: impl Into<String>, notes: Option<String>) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            notes,
        }
    }

    /// Reconstruct the column header token, omitting absent parts
    pub fn to_header_string(&self) -> String {
        let mut s = self.name.clone();
        if !self.units.is_empty() {
            s.push_str(&format!(" ({})", self.units));
        }
        if let Some(notes) = &self.notes {
            s.push_str(&format!(" [{}]", notes));
        }
        s
    }

    /// The header block key that holds the text for this column's notes
    pub fn notes_key(&self) -> Option<String> {
        self.notes.as_ref().map(|notes| format!("[{}]", notes))
    }
}

/// Ordered mapping of raw column header string to its parsed spec
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnHeaders {
    columns: IndexMap<String, ColumnHeaderSpec>,
}

impl ColumnHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, spec: ColumnHeaderSpec) -> Option<ColumnHeaderSpec> {
        self.columns.insert(label.into(), spec)
    }

    pub fn get(&self, label: &str) -> Option<&ColumnHeaderSpec> {
        self.columns.get(label)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnHeaderSpec)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, ColumnHeaderSpec)> for ColumnHeaders {
    fn from_iter<T: IntoIterator<Item = (String, ColumnHeaderSpec)>>(iter: T) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

/// A header value cast to the most appropriate primitive type
#[derive(Debug, Clone, PartialEq)]
pub enum CastValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl CastValue {
    /// Try an integer, then a float, otherwise keep the text as-is
    pub fn from_text(s: &str) -> Self {
        let trimmed = s.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            CastValue::Int(i)
        } else if let Ok(f) = trimmed.parse::<f64>() {
            CastValue::Float(f)
        } else {
            CastValue::Text(s.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_block_keeps_first_seen_order() {
        let mut block = HeaderBlock::new();
        block.insert("id", HeaderEntry::scalar("1")).unwrap();
        block.insert("title", HeaderEntry::scalar("The title")).unwrap();
        block.insert("id", HeaderEntry::scalar("2")).unwrap();

        let keys: Vec<&str> = block.keys().collect();
        assert_eq!(keys, vec!["id", "title"]);
        assert_eq!(block.get("id"), Some(&HeaderEntry::scalar("2")));
    }

    #[test]
    fn test_header_block_rejects_unwritable_keys() {
        let mut block = HeaderBlock::new();
        assert!(block.insert("", HeaderEntry::scalar("x")).is_err());
        assert!(block.insert(" padded", HeaderEntry::scalar("x")).is_err());
        assert!(block.insert("a: b", HeaderEntry::scalar("x")).is_err());
        assert!(block.insert("[a]", HeaderEntry::scalar("x")).is_ok());
        assert!(block.insert("a:b", HeaderEntry::scalar("x")).is_ok());
    }

    #[test]
    fn test_header_block_rejects_unwritable_values() {
        let mut block = HeaderBlock::new();
        let rejected = [
            HeaderEntry::list(["only"]),
            HeaderEntry::List(Vec::new()),
            HeaderEntry::scalar("trailing "),
            HeaderEntry::scalar("two\nlines"),
            HeaderEntry::list(["first", "  indented"]),
            HeaderEntry::list(["first", "carriage\rreturn"]),
            HeaderEntry::value_units("", "m"),
            HeaderEntry::value_units("1897.", "m"),
        ];
        for entry in rejected {
            let err = block.insert("k", entry.clone()).unwrap_err();
            assert!(
                matches!(err, XcsvError::InvalidHeaderValue { ref key, .. } if key == "k"),
                "{entry:?} was accepted"
            );
        }
        assert!(block.is_empty());

        assert!(block.insert("k", HeaderEntry::scalar("")).is_ok());
        assert!(block.insert("k", HeaderEntry::list(["", "b: c"])).is_ok());
        assert!(block.insert("k", HeaderEntry::value_units("1897", "m a.s.l.")).is_ok());
        assert!(HeaderBlock::from_entries([("k", HeaderEntry::list(["only"]))]).is_err());
    }

    #[test]
    fn test_header_entry_strings() {
        let entry = HeaderEntry::value_units("1897", "m a.s.l.");
        assert_eq!(entry.to_header_string(), "1897 (m a.s.l.)");
        assert_eq!(entry.value_string(), "1897");
        assert_eq!(entry.units(), Some("m a.s.l."));

        let entry = HeaderEntry::list(["First.", "Second."]);
        assert_eq!(entry.to_header_string(), "First.\nSecond.");
        assert_eq!(entry.tokens(), vec!["First.", "Second."]);
        assert_eq!(entry.units(), None);
    }

    #[test]
    fn test_column_header_spec_reconstruction() {
        let spec = ColumnHeaderSpec::new("time", "year", Some("a".to_string()));
        assert_eq!(spec.to_header_string(), "time (year) [a]");
        assert_eq!(spec.notes_key(), Some("[a]".to_string()));

        let spec = ColumnHeaderSpec::new("depth", "m", None);
        assert_eq!(spec.to_header_string(), "depth (m)");

        let spec = ColumnHeaderSpec::new("site", "", Some("b".to_string()));
        assert_eq!(spec.to_header_string(), "site [b]");
    }

    #[test]
    fn test_cast_value() {
        assert_eq!(CastValue::from_text("1897"), CastValue::Int(1897));
        assert_eq!(CastValue::from_text("-73.86"), CastValue::Float(-73.86));
        assert_eq!(
            CastValue::from_text("BAS"),
            CastValue::Text("BAS".to_string())
        );
    }
}

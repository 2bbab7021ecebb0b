//! Value/units and column header tokenizers.
//!
//! Both tokenizers peel a trailing bracketed group off a string: `(units)`
//! for header values, `[notes]` and then `(units)` for column headers. The
//! opening bracket is found by a backward scan that honours nesting, so
//! `x (a (b))` splits into `x` and `a (b)`.

use crate::models::{ColumnHeaderSpec, ColumnHeaders, HeaderEntry};

/// Parse a trailing `(units)` suffix off a header value
///
/// Returns `ValueUnits` when the trimmed string is `value (units)` with both
/// parts non-empty, otherwise `Scalar` holding the input unchanged. A value
/// ending with `.` blocks the split, so a sentence that closes on an
/// acronym expansion stays plain text when the author adds a period.
pub fn parse_value_units(raw: &str) -> HeaderEntry {
    match split_trailing_group(raw.trim(), '(', ')') {
        Some((value, units)) if !value.ends_with('.') => HeaderEntry::ValueUnits {
            value: value.to_string(),
            units: units.to_string(),
        },
        _ => HeaderEntry::Scalar(raw.to_string()),
    }
}

/// Parse a column header token of the form `name (units) [notes]`
pub fn parse_column_header(raw: &str) -> ColumnHeaderSpec {
    let trimmed = raw.trim();

    let (remainder, notes) = match split_trailing_group(trimmed, '[', ']') {
        Some((rest, notes)) => (rest, Some(notes.to_string())),
        None => (trimmed, None),
    };

    let (name, units) = match split_trailing_group(remainder, '(', ')') {
        Some((name, units)) => (name, units),
        None => (remainder, ""),
    };

    ColumnHeaderSpec {
        name: name.to_string(),
        units: units.to_string(),
        notes,
    }
}

/// Build the column header mapping for the given labels
///
/// With `parse_metadata` off every label is kept whole as the column name.
pub fn parse_column_headers<I, S>(labels: I, parse_metadata: bool) -> ColumnHeaders
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .map(|label| {
            let label = label.as_ref();
            let spec = if parse_metadata {
                parse_column_header(label)
            } else {
                ColumnHeaderSpec::new(label, "", None)
            };
            (label.to_string(), spec)
        })
        .collect()
}

/// Split `s` into the text before a trailing `open ... close` group and the
/// text inside it, both trimmed
///
/// The group must be the literal suffix of `s`, be separated from the
/// preceding text by whitespace, and both parts must be non-empty.
fn split_trailing_group(s: &str, open: char, close: char) -> Option<(&str, &str)> {
    if !s.ends_with(close) {
        return None;
    }

    let mut depth = 0usize;
    let mut open_idx = None;
    for (i, c) in s.char_indices().rev() {
        if c == close {
            depth += 1;
        } else if c == open {
            depth -= 1;
            if depth == 0 {
                open_idx = Some(i);
                break;
            }
        }
    }
    let open_idx = open_idx?;

    let before = &s[..open_idx];
    let inner = s[open_idx + open.len_utf8()..s.len() - close.len_utf8()].trim();

    if !before.ends_with(char::is_whitespace) {
        return None;
    }
    let before = before.trim();
    if before.is_empty() || inner.is_empty() {
        return None;
    }

    Some((before, inner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_units() {
        assert_eq!(
            parse_value_units("a_value (some_units)"),
            HeaderEntry::value_units("a_value", "some_units")
        );
        assert_eq!(
            parse_value_units("-73.86 (degree_north)"),
            HeaderEntry::value_units("-73.86", "degree_north")
        );
        assert_eq!(
            parse_value_units("  1897 (m a.s.l.)  "),
            HeaderEntry::value_units("1897", "m a.s.l.")
        );
    }

    #[test]
    fn test_value_units_plain_text() {
        assert_eq!(parse_value_units("a_value"), HeaderEntry::scalar("a_value"));
        assert_eq!(
            parse_value_units("BAS (British Antarctic Survey)."),
            HeaderEntry::scalar("BAS (British Antarctic Survey).")
        );
        assert_eq!(parse_value_units("(units)"), HeaderEntry::scalar("(units)"));
        assert_eq!(parse_value_units("f(x)"), HeaderEntry::scalar("f(x)"));
        assert_eq!(parse_value_units("value ()"), HeaderEntry::scalar("value ()"));
        assert_eq!(parse_value_units("unbalanced)"), HeaderEntry::scalar("unbalanced)"));
    }

    #[test]
    fn test_value_units_period_guard() {
        assert_eq!(
            parse_value_units("Collected by the survey. (BAS)"),
            HeaderEntry::scalar("Collected by the survey. (BAS)")
        );
    }

    #[test]
    fn test_value_units_nested_parentheses() {
        assert_eq!(
            parse_value_units("12 (kg (dry))"),
            HeaderEntry::value_units("12", "kg (dry)")
        );
        assert_eq!(
            parse_value_units("see (a) then 12 (m)"),
            HeaderEntry::value_units("see (a) then 12", "m")
        );
    }

    #[test]
    fn test_column_header_full() {
        assert_eq!(
            parse_column_header("time (year) [a]"),
            ColumnHeaderSpec::new("time", "year", Some("a".to_string()))
        );
    }

    #[test]
    fn test_column_header_partial() {
        assert_eq!(
            parse_column_header("depth (m)"),
            ColumnHeaderSpec::new("depth", "m", None)
        );
        assert_eq!(
            parse_column_header("site [b]"),
            ColumnHeaderSpec::new("site", "", Some("b".to_string()))
        );
        assert_eq!(
            parse_column_header("count"),
            ColumnHeaderSpec::new("count", "", None)
        );
        assert_eq!(
            parse_column_header(" depth (m a.s.l.) "),
            ColumnHeaderSpec::new("depth", "m a.s.l.", None)
        );
    }

    #[test]
    fn test_column_headers_without_metadata_parsing() {
        let headers = parse_column_headers(["time (year) [a]", "depth (m)"], false);
        assert_eq!(
            headers.get("time (year) [a]"),
            Some(&ColumnHeaderSpec::new("time (year) [a]", "", None))
        );

        let headers = parse_column_headers(["time (year) [a]", "depth (m)"], true);
        let labels: Vec<&str> = headers.labels().collect();
        assert_eq!(labels, vec!["time (year) [a]", "depth (m)"]);
        assert_eq!(headers.get("depth (m)").unwrap().units, "m");
    }
}

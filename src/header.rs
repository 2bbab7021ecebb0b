//! Extended header section parsing and serialization.
//!
//! The extended header section is a run of comment lines:
//!
//! ```text
//! # id: 1
//! # latitude: -73.86 (degree_north)
//! # summary: The first paragraph.
//! # The second paragraph.
//! # : A third paragraph: with the delimiter, so escaped.
//! ```
//!
//! A line `key: value` opens a key. Any other line continues the most
//! recently opened key. Continuation lines that would otherwise be read as
//! a new key are written with an empty key (`: ...`), which the parser
//! strips again.

use crate::constants::{KEY_VALUE_DELIMITER, KEY_VALUE_DELIMITER_CHAR};
use crate::error::{Result, XcsvError};
use crate::models::{HeaderBlock, HeaderEntry};
use crate::tokens::parse_value_units;
use tracing::debug;

/// Strip a leading comment marker and exactly one following space, then
/// trim. Returns `None` for lines that are not comment lines.
pub fn strip_comment_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    Some(rest.trim())
}

/// Parse comment-free header lines into a header block
pub fn parse_header_lines<I, S>(lines: I) -> Result<HeaderBlock>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    HeaderBlockParser::new().parse(lines)
}

/// Serialize a header block into comment-free header lines
pub fn write_header_lines(block: &HeaderBlock) -> Vec<String> {
    HeaderBlockWriter::new().write(block)
}

/// Role of one header line
#[derive(Debug, PartialEq, Eq)]
enum HeaderLine<'a> {
    /// `key: rest`, or `key:` with an empty value
    Opener { key: &'a str, rest: &'a str },
    /// `: rest`
    EscapedContinuation(&'a str),
    /// Anything else
    PlainContinuation(&'a str),
}

impl<'a> HeaderLine<'a> {
    fn classify(line: &'a str) -> Self {
        if let Some((key, rest)) = line.split_once(KEY_VALUE_DELIMITER) {
            let key = key.trim();
            let rest = rest.trim();
            return if key.is_empty() {
                HeaderLine::EscapedContinuation(rest)
            } else {
                HeaderLine::Opener { key, rest }
            };
        }

        // The padding of the delimiter is lost when the line is trimmed
        match line.strip_suffix(KEY_VALUE_DELIMITER_CHAR) {
            Some("") => HeaderLine::EscapedContinuation(""),
            Some(key) => HeaderLine::Opener {
                key: key.trim(),
                rest: "",
            },
            None => HeaderLine::PlainContinuation(line),
        }
    }
}

enum ParserState {
    Idle,
    Open {
        key: String,
        accumulated: Vec<String>,
    },
}

/// Line-oriented state machine rebuilding a [`HeaderBlock`]
#[derive(Debug, Clone)]
pub struct HeaderBlockParser {
    parse_metadata: bool,
}

impl Default for HeaderBlockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderBlockParser {
    pub fn new() -> Self {
        Self {
            parse_metadata: true,
        }
    }

    /// With metadata parsing off, single-line values are never split into
    /// value and units
    pub fn with_parse_metadata(mut self, parse_metadata: bool) -> Self {
        self.parse_metadata = parse_metadata;
        self
    }

    /// Parse lines numbered from 1
    pub fn parse<I, S>(&self, lines: I) -> Result<HeaderBlock>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parse_numbered(lines.into_iter().enumerate().map(|(i, line)| (i + 1, line)))
    }

    /// Parse lines carrying their own line numbers, used in error reports
    pub fn parse_numbered<I, S>(&self, lines: I) -> Result<HeaderBlock>
    where
        I: IntoIterator<Item = (usize, S)>,
        S: AsRef<str>,
    {
        let mut block = HeaderBlock::new();
        let mut state = ParserState::Idle;

        for (line_number, line) in lines {
            let line = line.as_ref().trim();

            state = match (HeaderLine::classify(line), state) {
                (HeaderLine::Opener { key, rest }, previous) => {
                    self.close(previous, &mut block);
                    ParserState::Open {
                        key: key.to_string(),
                        accumulated: vec![rest.to_string()],
                    }
                }
                (
                    HeaderLine::EscapedContinuation(value) | HeaderLine::PlainContinuation(value),
                    ParserState::Open {
                        key,
                        mut accumulated,
                    },
                ) => {
                    accumulated.push(value.to_string());
                    ParserState::Open { key, accumulated }
                }
                (_, ParserState::Idle) => {
                    return Err(XcsvError::MalformedHeaderLine {
                        line_number,
                        line: line.to_string(),
                    });
                }
            };
        }

        self.close(state, &mut block);
        debug!("Parsed {} header keys", block.len());

        Ok(block)
    }

    fn close(&self, state: ParserState, block: &mut HeaderBlock) {
        if let ParserState::Open { key, accumulated } = state {
            let entry = self.finalize(accumulated);
            block.insert_parsed(key, entry);
        }
    }

    fn finalize(&self, accumulated: Vec<String>) -> HeaderEntry {
        match <[String; 1]>::try_from(accumulated) {
            Ok([single]) if self.parse_metadata => parse_value_units(&single),
            Ok([single]) => HeaderEntry::Scalar(single),
            Err(elements) => HeaderEntry::List(elements),
        }
    }
}

/// Inverse of [`HeaderBlockParser`]
#[derive(Debug, Clone, Default)]
pub struct HeaderBlockWriter {
    comment: String,
}

impl HeaderBlockWriter {
    /// Writer emitting comment-free lines
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every emitted line, e.g. with `"# "`
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn write(&self, block: &HeaderBlock) -> Vec<String> {
        let mut lines = Vec::with_capacity(block.len());

        for (key, entry) in block.iter() {
            match entry {
                HeaderEntry::Scalar(value) => lines.push(self.opener(key, value)),
                HeaderEntry::ValueUnits { .. } => {
                    lines.push(self.opener(key, &entry.to_header_string()))
                }
                HeaderEntry::List(elements) => {
                    let (first, rest) = match elements.split_first() {
                        Some((first, rest)) => (first.as_str(), rest),
                        None => ("", &[][..]),
                    };
                    lines.push(self.opener(key, first));
                    lines.extend(rest.iter().map(|element| self.continuation(element)));
                }
            }
        }

        lines
    }

    fn opener(&self, key: &str, value: &str) -> String {
        format!("{}{}{}{}", self.comment, key, KEY_VALUE_DELIMITER, value)
    }

    fn continuation(&self, element: &str) -> String {
        if needs_escape(element) {
            format!("{}{}{}", self.comment, KEY_VALUE_DELIMITER, element)
        } else {
            format!("{}{}", self.comment, element)
        }
    }
}

/// Would this continuation be read back as an opener or an escaped line?
fn needs_escape(element: &str) -> bool {
    let trimmed = element.trim();
    element.contains(KEY_VALUE_DELIMITER)
        || trimmed.starts_with(KEY_VALUE_DELIMITER_CHAR)
        || trimmed.ends_with(KEY_VALUE_DELIMITER_CHAR)
}

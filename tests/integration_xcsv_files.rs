//! Integration tests reading and writing extended CSV files on disk
//!
//! These tests go through the public API only: a file is written to a
//! temporary directory, read back, rewritten and compared.

use std::fs;
use tempfile::TempDir;
use xcsv::{
    ColumnHeaderSpec, HeaderEntry, Reader, ReaderConfig, Writer, WriterConfig, XcsvError,
};

const ICE_CORE: &str = "\
# id: 1
# title: The title
# summary: This dataset...
# The second paragraph.
# : The third paragraph: with a colon.
# authors: A B, C D
# latitude: -73.86 (degree_north)
# longitude: -65.86 (degree_east)
# elevation: 1897 (m a.s.l.)
# institution: BAS (British Antarctic Survey).
# missing_value: -999.99
# [a]: 2012 not a complete year
time (year) [a],depth (m)
2012,0.575
2011,1.125
2010,-999.99
2009,-999
";

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Test the full document model of a realistic file
///
/// Purpose: Validate header entry shapes, column header parsing and masking together
#[test]
fn test_read_ice_core_file() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "ice_core.csv", ICE_CORE);

    let doc = Reader::default().read_path(&path).unwrap();

    assert_eq!(doc.header().len(), 10);
    assert_eq!(
        doc.metadata_item("summary"),
        Some(&HeaderEntry::list([
            "This dataset...",
            "The second paragraph.",
            "The third paragraph: with a colon.",
        ]))
    );
    assert_eq!(
        doc.metadata_item("latitude"),
        Some(&HeaderEntry::value_units("-73.86", "degree_north"))
    );
    assert_eq!(
        doc.metadata_item("institution"),
        Some(&HeaderEntry::scalar("BAS (British Antarctic Survey)."))
    );
    assert_eq!(
        doc.metadata_item("authors"),
        Some(&HeaderEntry::scalar("A B, C D"))
    );

    assert_eq!(
        doc.column_header("time (year) [a]"),
        Some(&ColumnHeaderSpec::new("time", "year", Some("a".to_string())))
    );
    assert_eq!(
        doc.notes_for_column_header("time (year) [a]"),
        Some("2012 not a complete year".to_string())
    );

    assert_eq!(doc.data().height(), 4);
    assert_eq!(doc.cell("depth (m)", 2).unwrap(), None);
    let not_missing = doc.cell("depth (m)", 3).unwrap().unwrap();
    assert_eq!(not_missing.parse::<f64>().unwrap(), -999.0);
}

/// Test that rewriting a parsed file reproduces its header section exactly
#[test]
fn test_rewrite_preserves_header_section() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "in.csv", ICE_CORE);
    let output = dir.path().join("out.csv");

    let doc = Reader::default().read_path(&input).unwrap();
    Writer::new(WriterConfig::default())
        .write_path(&doc, &output)
        .unwrap();

    let written = fs::read_to_string(&output).unwrap();
    let original_header: Vec<&str> = ICE_CORE.lines().take_while(|l| l.starts_with('#')).collect();
    let written_header: Vec<&str> = written.lines().take_while(|l| l.starts_with('#')).collect();
    assert_eq!(written_header, original_header);

    let reread = Reader::default().read_path(&output).unwrap();
    assert_eq!(reread.metadata(), doc.metadata());
    assert!(reread.data().equals_missing(doc.data()));
}

/// Test reading without metadata parsing keeps everything as plain text
#[test]
fn test_read_without_metadata_parsing() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "plain.csv", ICE_CORE);

    let config = ReaderConfig::default().with_parse_metadata(false);
    let doc = Reader::new(config).read_path(&path).unwrap();

    assert_eq!(
        doc.metadata_item("elevation"),
        Some(&HeaderEntry::scalar("1897 (m a.s.l.)"))
    );
    assert_eq!(
        doc.column_header("depth (m)").map(|spec| spec.name.as_str()),
        Some("depth (m)")
    );
    // Not masked, but still numeric
    let cell = doc.cell("depth (m)", 2).unwrap().unwrap();
    assert_eq!(cell.parse::<f64>().unwrap(), -999.99);
}

/// Test error reporting for a header that starts with a continuation
#[test]
fn test_malformed_header_file() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "bad.csv", "# plain text\n# id: 1\nx\n1\n");

    let err = Reader::default().read_path(&path).unwrap_err();
    assert!(matches!(
        err,
        XcsvError::MalformedHeaderLine { line_number: 1, ref line } if line == "plain text"
    ));
    assert!(err.to_string().contains("plain text"));
}

/// Test that a missing file surfaces as an I/O error
#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Reader::default()
        .read_path(&dir.path().join("absent.csv"))
        .unwrap_err();
    assert!(matches!(err, XcsvError::Io(_)));
}

/// Test a UTF-8 byte order mark written by spreadsheet tools
#[test]
fn test_file_with_byte_order_mark() {
    let dir = TempDir::new().unwrap();
    let mut content = "\u{feff}".to_string();
    content.push_str(ICE_CORE);
    let path = write_fixture(&dir, "bom.csv", &content);

    let doc = Reader::default().read_path(&path).unwrap();
    assert_eq!(doc.metadata_item("id"), Some(&HeaderEntry::scalar("1")));

    let config = ReaderConfig::default().without_bom_stripping();
    assert!(Reader::new(config).read_path(&path).is_err());
}

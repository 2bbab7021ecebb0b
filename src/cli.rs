//! Command-line interface components.

use crate::config::{ReaderConfig, WriterConfig};
use crate::document::Document;
use crate::models::HeaderEntry;
use crate::reader::Reader;
use crate::writer::Writer;
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "xcsv")]
#[command(about = "Inspect and rewrite extended CSV (XCSV) files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Path to the extended CSV file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Write the parsed document back out to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep header values and column headers as plain strings and skip
    /// missing value masking
    #[arg(long)]
    pub no_parse_metadata: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig::default().with_parse_metadata(!self.no_parse_metadata)
    }
}

/// Set up structured logging to stderr
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = if verbose { "debug" } else { "warn" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("xcsv={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Read the input, print a summary and optionally rewrite it
pub fn run(args: &Args) -> Result<()> {
    let reader = Reader::new(args.reader_config());
    let document = reader
        .read_path(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    print_summary(&document);

    if let Some(output) = &args.output {
        Writer::new(WriterConfig::default())
            .write_path(&document, output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!(
            "\n{} {}",
            "Written:".bright_green(),
            output.display().to_string().bright_white()
        );
    }

    Ok(())
}

fn print_summary(document: &Document) {
    println!("{}", "Extended header".bright_green().bold());
    for (key, entry) in document.header().iter() {
        match entry {
            HeaderEntry::Scalar(value) => {
                println!("  {} {}", format!("{}:", key).bright_cyan(), value);
            }
            HeaderEntry::ValueUnits { value, units } => {
                println!(
                    "  {} {} {}",
                    format!("{}:", key).bright_cyan(),
                    value,
                    format!("({})", units).bright_black()
                );
            }
            HeaderEntry::List(elements) => {
                println!("  {}", format!("{}:", key).bright_cyan());
                for element in elements {
                    println!("    {}", element);
                }
            }
        }
    }

    println!("\n{}", "Column headers".bright_green().bold());
    for (label, spec) in document.column_headers().iter() {
        let units = if spec.units.is_empty() {
            String::new()
        } else {
            format!(" ({})", spec.units)
        };
        let notes = match document.notes_for_column_header(label) {
            Some(text) => format!(" - {}", text),
            None => String::new(),
        };
        println!(
            "  {}{}{}",
            spec.name.bright_white().bold(),
            units.bright_black(),
            notes.yellow()
        );
    }

    let data = document.data();
    println!(
        "\n{} {} rows x {} columns",
        "Data:".bright_green().bold(),
        data.height().to_string().bright_white(),
        data.width().to_string().bright_white()
    );
}

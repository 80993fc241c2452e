//! Command-line interface components.

use crate::config::{CompressionAlgorithm, OutputConfig, OutputFormat, ReaderConfig};
use crate::encoding::TextEncoding;
use crate::models::{EventLog, ProcessingStats};
use crate::parser::DeckParser;
use crate::writer::TableWriter;
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Default output directory name, created next to the deck
pub const DEFAULT_OUTPUT_DIR: &str = "schedule_tables";

#[derive(Parser, Debug)]
#[command(name = "schedule_reader")]
#[command(about = "Read reservoir simulation schedule decks into keyword tables")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Root deck file, or a directory searched for *.DATA decks
    #[arg(value_name = "DECK_PATH")]
    pub deck_path: PathBuf,

    /// Output directory for keyword tables
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Keyword to write (repeatable); default is every keyword with a table schema
    #[arg(short, long = "keyword", value_name = "KEYWORD")]
    pub keywords: Vec<String>,

    /// Table format (parquet, csv)
    #[arg(long, default_value = "parquet")]
    pub format: String,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: String,

    /// Text encoding of the deck files (cp1252, latin1, utf-8)
    #[arg(long, default_value = "cp1252")]
    pub encoding: String,

    /// Print keyword counts and the date range without writing tables
    #[arg(long)]
    pub summary: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Output directory, defaulting to `<deck dir>/schedule_tables`
    pub fn get_output_path(&self) -> PathBuf {
        match &self.output_path {
            Some(path) => path.clone(),
            None => {
                let base = if self.deck_path.is_dir() {
                    self.deck_path.as_path()
                } else {
                    self.deck_path.parent().unwrap_or_else(|| Path::new("."))
                };
                base.join(DEFAULT_OUTPUT_DIR)
            }
        }
    }

    pub fn reader_config(&self) -> Result<ReaderConfig> {
        let encoding: TextEncoding = self.encoding.parse()?;
        Ok(ReaderConfig::default()
            .with_encoding(encoding)
            .with_verbose(self.verbose))
    }

    pub fn output_config(&self) -> Result<OutputConfig> {
        let format: OutputFormat = self.format.parse()?;
        let compression: CompressionAlgorithm = self.compression.parse()?;
        Ok(OutputConfig::default()
            .with_format(format)
            .with_compression(compression)
            .with_keywords(self.keywords.clone()))
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("schedule_reader={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("Failed to initialise logging")?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Decks to process: the file itself, or every `*.DATA` under a directory
pub fn discover_decks(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.exists() {
        anyhow::bail!("Deck path not found: {}", path.display());
    }

    let mut decks = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = entry.context("Failed to walk deck directory")?;
        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("data"))
        {
            decks.push(entry.into_path());
        }
    }
    decks.sort();

    if decks.is_empty() {
        anyhow::bail!("No *.DATA decks found under {}", path.display());
    }
    Ok(decks)
}

/// Parse and write (or summarize) every deck named by the arguments
pub fn run(args: &Args) -> Result<ProcessingStats> {
    let start_time = Instant::now();
    let decks = discover_decks(&args.deck_path)?;
    let parser = DeckParser::new(args.reader_config()?);
    let output_config = args.output_config()?;
    let output_root = args.get_output_path();
    let per_deck_dirs = args.deck_path.is_dir();

    println!(
        "{} {} deck(s)",
        "Reading schedule".bright_green().bold(),
        decks.len().to_string().bright_white().bold()
    );

    let mut stats = ProcessingStats::default();
    for deck in &decks {
        let log = parser
            .parse(deck)
            .with_context(|| format!("Failed to parse {}", deck.display()))?;
        stats.decks_processed += 1;
        stats.events += log.len();

        if args.summary {
            print_deck_summary(deck, &log);
            continue;
        }

        let output_dir = if per_deck_dirs {
            output_root.join(deck_stem(deck))
        } else {
            output_root.clone()
        };
        let writer = TableWriter::new(output_dir, output_config.clone());
        let written = writer
            .write_log(&log)
            .with_context(|| format!("Failed to write tables for {}", deck.display()))?;

        for table in &written {
            info!("{}: {} rows -> {}", table.keyword, table.rows, table.path.display());
        }
        stats.tables_written += written.len();
        stats.total_rows += written.iter().map(|t| t.rows).sum::<usize>();
    }

    stats.processing_time_ms = start_time.elapsed().as_millis();
    print_run_summary(&stats, args.summary);
    Ok(stats)
}

fn deck_stem(deck: &Path) -> String {
    deck.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "deck".to_string())
}

fn print_deck_summary(deck: &Path, log: &EventLog) {
    println!("\n{}", deck.display().to_string().bright_green().bold());

    let dates = log.dates();
    if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
        println!(
            "  {} {} .. {} ({} markers)",
            "Dates:".bright_cyan(),
            first.bright_white(),
            last.bright_white(),
            dates.len()
        );
    }
    for (keyword, count) in log.keyword_counts() {
        println!(
            "  {:<10} {}",
            keyword.bright_cyan(),
            count.to_string().bright_white()
        );
    }
}

fn print_run_summary(stats: &ProcessingStats, summary_only: bool) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Decks processed:".bright_cyan(),
        stats.decks_processed.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Events:".bright_cyan(),
        stats.events.to_string().bright_white()
    );
    if !summary_only {
        println!(
            "  {} {}",
            "Tables written:".bright_cyan(),
            stats.tables_written.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Total rows:".bright_cyan(),
            stats.total_rows.to_string().bright_white().bold()
        );
    }
}

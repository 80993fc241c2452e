//! Configuration management.
//!
//! Provides the deck reader settings (encoding, start date, include
//! guarding) and the table output settings used by the CLI writer.

use crate::constants::DEFAULT_START_DATE;
use crate::encoding::TextEncoding;
use crate::error::{Result, ScheduleError};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Settings for reading a deck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Text encoding for the root deck and every include
    pub encoding: TextEncoding,

    /// Narrate each file read at info level
    pub verbose: bool,

    /// Start date that takes precedence over the deck's START keyword
    pub start_date: Option<String>,

    /// Start date used when no START keyword exists
    pub default_start_date: String,

    /// Fail with `CyclicInclude` when an include re-enters an open file
    pub guard_include_cycles: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::default(),
            verbose: false,
            start_date: None,
            default_start_date: DEFAULT_START_DATE.to_string(),
            guard_include_cycles: true,
        }
    }
}

impl ReaderConfig {
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Override the deck's START date
    pub fn with_start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    /// Disable include cycle detection (unbounded recursion on a cycle)
    pub fn without_cycle_guard(mut self) -> Self {
        self.guard_include_cycles = false;
        self
    }
}

/// Table file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Parquet,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Parquet => "parquet",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "parquet" => Ok(OutputFormat::Parquet),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(ScheduleError::configuration(format!(
                "Unknown output format '{}' (expected parquet or csv)",
                other
            ))),
        }
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    #[default]
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(ScheduleError::configuration(format!(
                "Unknown compression '{}' (expected snappy, zstd, lz4 or none)",
                other
            ))),
        }
    }
}

/// Settings for writing projected tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub compression: CompressionAlgorithm,
    /// Keywords to write; empty means every keyword with a table schema
    pub keywords: Vec<String>,
}

impl OutputConfig {
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords
            .into_iter()
            .map(|kw| kw.to_ascii_uppercase())
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_defaults() {
        let config = ReaderConfig::default();
        assert_eq!(config.encoding, TextEncoding::Cp1252);
        assert_eq!(config.default_start_date, "01 JAN 1900");
        assert!(config.start_date.is_none());
        assert!(config.guard_include_cycles);
    }

    #[test]
    fn test_reader_builders() {
        let config = ReaderConfig::default()
            .with_encoding(TextEncoding::Utf8)
            .with_start_date("1 JAN 2020")
            .without_cycle_guard();
        assert_eq!(config.encoding, TextEncoding::Utf8);
        assert_eq!(config.start_date.as_deref(), Some("1 JAN 2020"));
        assert!(!config.guard_include_cycles);
    }

    #[test]
    fn test_parse_output_options() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!(
            "none".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Uncompressed
        );
        assert!("gzip".parse::<CompressionAlgorithm>().is_err());
    }

    #[test]
    fn test_keywords_are_uppercased() {
        let config = OutputConfig::default().with_keywords(vec!["compdat".to_string()]);
        assert_eq!(config.keywords, vec!["COMPDAT".to_string()]);
    }
}

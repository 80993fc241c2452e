//! Table output.
//!
//! Writes projected keyword tables to one Parquet or CSV file per keyword
//! under an output directory.

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::models::EventLog;
use crate::projector::{extract_dates, extract_keyword, project};
use crate::schema::{schema_for, supported_keywords};
use polars::prelude::{CsvWriter, DataFrame, ParquetWriter, SerWriter};
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::{debug, info};

/// Keyword name that selects the date marker table
const DATES_TABLE: &str = "DATES";

/// One table written to disk
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenTable {
    pub keyword: String,
    pub path: PathBuf,
    pub rows: usize,
}

#[derive(Debug)]
pub struct TableWriter {
    output_dir: PathBuf,
    config: OutputConfig,
}

impl TableWriter {
    pub fn new(output_dir: impl Into<PathBuf>, config: OutputConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            config,
        }
    }

    /// `<dir>/<KEYWORD>.<ext>`
    pub fn table_path(&self, keyword: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}.{}",
            keyword.to_ascii_uppercase(),
            self.config.format.extension()
        ))
    }

    /// Write one table; returns the number of rows written
    pub fn write(&self, keyword: &str, df: &mut DataFrame) -> Result<usize> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.table_path(keyword);
        let file = File::create(&path)?;

        match self.config.format {
            OutputFormat::Parquet => {
                ParquetWriter::new(file)
                    .with_compression(self.config.compression.to_polars_compression())
                    .finish(df)?;
            }
            OutputFormat::Csv => {
                CsvWriter::new(file).include_header(true).finish(df)?;
            }
        }

        debug!("Wrote {} rows to {}", df.height(), path.display());
        Ok(df.height())
    }

    /// Keywords to write for `log`: the configured list, or every schema
    /// keyword that has records
    pub fn selected_keywords(&self, log: &EventLog) -> Vec<String> {
        if !self.config.keywords.is_empty() {
            return self.config.keywords.clone();
        }
        supported_keywords()
            .into_iter()
            .filter(|keyword| log.records(keyword).next().is_some())
            .map(str::to_string)
            .collect()
    }

    /// Project and write every selected keyword of a parsed deck
    pub fn write_log(&self, log: &EventLog) -> Result<Vec<WrittenTable>> {
        let mut written = Vec::new();
        for keyword in self.selected_keywords(log) {
            let mut df = if keyword == DATES_TABLE {
                extract_dates(log)?
            } else if schema_for(&keyword).is_some() {
                extract_keyword(log, &keyword)?
            } else {
                project(log, &keyword, None)?
            };

            let rows = self.write(&keyword, &mut df)?;
            written.push(WrittenTable {
                path: self.table_path(&keyword),
                keyword,
                rows,
            });
        }

        info!(
            "Wrote {} tables to {}",
            written.len(),
            self.output_dir.display()
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompressionAlgorithm;
    use crate::parser::parse_deck;
    use crate::parser::tests::write_deck;
    use polars::prelude::*;
    use tempfile::TempDir;

    const DECK: &str = "START\n1 JAN 2000 /\nSCHEDULE\nWELSPECS\n'P1' 'G1' 2 3 1* 'OIL' /\n/\nCOMPDAT\n'P1' 1* 1* 1 2 /\n/\nWELOPEN\n'P1' 'SHUT' /\n/\nDATES\n1 FEB 2000 /\n/\n";

    fn parsed(temp_dir: &TempDir) -> EventLog {
        let deck = write_deck(temp_dir.path(), "CASE.DATA", DECK);
        parse_deck(&deck).unwrap()
    }

    #[test]
    fn test_default_selection_writes_schema_keywords() {
        let temp_dir = TempDir::new().unwrap();
        let log = parsed(&temp_dir);
        let out = temp_dir.path().join("tables");

        let writer = TableWriter::new(&out, OutputConfig::default());
        let written = writer.write_log(&log).unwrap();

        let keywords: Vec<&str> = written.iter().map(|t| t.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["WELSPECS", "COMPDAT"]);
        assert!(out.join("WELSPECS.parquet").exists());
        assert!(out.join("COMPDAT.parquet").exists());
        assert!(!out.join("WELOPEN.parquet").exists());

        let df = ParquetReader::new(File::open(out.join("COMPDAT.parquet")).unwrap())
            .finish()
            .unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 15);
    }

    #[test]
    fn test_explicit_keywords_as_csv() {
        let temp_dir = TempDir::new().unwrap();
        let log = parsed(&temp_dir);
        let out = temp_dir.path().join("csv");

        let config = OutputConfig::default()
            .with_format(OutputFormat::Csv)
            .with_keywords(vec!["welopen".to_string(), "dates".to_string()]);
        let writer = TableWriter::new(&out, config);
        let written = writer.write_log(&log).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(written[0].path, out.join("WELOPEN.csv"));
        assert_eq!(written[1].rows, 2);

        let text = fs::read_to_string(out.join("WELOPEN.csv")).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("date,1,2"));
        assert!(lines.next().unwrap().ends_with(",P1,SHUT"));
    }

    #[test]
    fn test_uncompressed_parquet() {
        let temp_dir = TempDir::new().unwrap();
        let config = OutputConfig::default().with_compression(CompressionAlgorithm::Uncompressed);
        let writer = TableWriter::new(temp_dir.path(), config);

        let mut df = df!("a" => [1i64, 2, 3]).unwrap();
        let rows = writer.write("custom", &mut df).unwrap();
        assert_eq!(rows, 3);
        assert!(temp_dir.path().join("CUSTOM.parquet").exists());
    }
}

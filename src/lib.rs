//! Schedule Reader Library
//!
//! Reads reservoir-simulation schedule decks (a root deck plus the files it
//! includes) into a flat, date-ordered event log, and projects well keywords
//! out of that log into typed polars tables.
//!
//! This library provides tools for:
//! - Parsing schedule sections with INCLUDE splicing and PATHS variables
//! - Expanding `N*` default shorthand and padding fixed-width records
//! - Projecting WELSPECS, COMPDAT, WCON* and other keywords by date
//! - Writing keyword tables to Parquet or CSV

pub mod cli;
pub mod config;
pub mod constants;
pub mod dates;
pub mod encoding;
pub mod error;
pub mod header;
pub mod include;
pub mod keywords;
pub mod models;
pub mod parser;
pub mod projector;
pub mod properties;
pub mod records;
pub mod schema;
pub mod writer;

pub use config::{OutputConfig, ReaderConfig};
pub use encoding::TextEncoding;
pub use error::{Result, ScheduleError};
pub use models::{Event, EventLog, KeyedEvent};
pub use parser::{DeckParser, parse_deck};
pub use projector::{
    KeywordTable, extract_compdat, extract_compdatl, extract_compdatm, extract_dates,
    extract_keyword, extract_welspec2, extract_welspecl, extract_wellspec, extract_welspecs,
    extract_wconhist, extract_wconinje, extract_wconinjh, extract_wconprod, project,
};
pub use properties::{expand_keyword, ijk_index, read_keyword_from_include};
pub use writer::TableWriter;

use polars::prelude::DataFrame;
use std::path::Path;

fn read_with(path: &Path, encoding: TextEncoding, verbose: bool) -> Result<EventLog> {
    let config = ReaderConfig::default()
        .with_encoding(encoding)
        .with_verbose(verbose);
    DeckParser::new(config).parse(path)
}

/// Parse a deck and return its COMPDAT table
pub fn compdat2df(
    path: impl AsRef<Path>,
    encoding: TextEncoding,
    verbose: bool,
) -> Result<DataFrame> {
    extract_compdat(&read_with(path.as_ref(), encoding, verbose)?)
}

/// Parse a deck and return its WELSPECS table
pub fn welspecs2df(
    path: impl AsRef<Path>,
    encoding: TextEncoding,
    verbose: bool,
) -> Result<DataFrame> {
    extract_welspecs(&read_with(path.as_ref(), encoding, verbose)?)
}

//! Root deck header scanning.
//!
//! Extracts the START date and the PATHS variable table from a root deck
//! and locates the SCHEDULE section. Both header scans look at the whole
//! document, not only the schedule section.

use crate::constants::{PATHS_KEYWORD, SCHEDULE_KEYWORD, START_KEYWORD};
use crate::models::PathTable;
use crate::records::{
    is_block_terminator, is_skippable, path_record_body, record_body, strip_quotes, tokenize,
};
use tracing::{debug, warn};

/// Header information of a root deck
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeckHeader {
    pub start_date: Option<String>,
    pub paths: PathTable,
}

/// Extract the START date and PATHS table from a root deck
pub fn scan_deck_header(lines: &[&str]) -> DeckHeader {
    let mut header = DeckHeaderBuilder::new();
    let mut line = 0;

    while line < lines.len() {
        match first_token_upper(lines[line]).as_deref() {
            Some(START_KEYWORD) if header.start_date.is_none() => {
                line = header.read_start(lines, line + 1);
            }
            Some(PATHS_KEYWORD) => {
                line = header.read_paths(lines, line + 1);
            }
            _ => line += 1,
        }
    }

    header.build()
}

/// Index of the SCHEDULE section line, if the deck has one
pub fn locate_schedule(lines: &[&str]) -> Option<usize> {
    lines.iter().position(|line| {
        first_token_upper(line).is_some_and(|token| token.starts_with(SCHEDULE_KEYWORD))
    })
}

/// Uppercased first whitespace-delimited token of a data line
pub fn first_token_upper(line: &str) -> Option<String> {
    if is_skippable(line) {
        return None;
    }
    line.split_whitespace()
        .next()
        .map(|token| token.to_ascii_uppercase())
}

/// Builder for header extraction
struct DeckHeaderBuilder {
    start_date: Option<String>,
    paths: PathTable,
}

impl DeckHeaderBuilder {
    fn new() -> Self {
        Self {
            start_date: None,
            paths: PathTable::new(),
        }
    }

    /// Read the date line after START; returns the next line to scan
    fn read_start(&mut self, lines: &[&str], mut line: usize) -> usize {
        while line < lines.len() {
            let text = lines[line];
            line += 1;
            if is_skippable(text) || is_block_terminator(text) {
                continue;
            }
            let date = record_body(text).trim().to_string();
            debug!("Found START date: {}", date);
            self.start_date = Some(date);
            break;
        }
        line
    }

    /// Read `'NAME' 'VALUE' /` lines until a `/` line; returns the next line to scan
    fn read_paths(&mut self, lines: &[&str], mut line: usize) -> usize {
        while line < lines.len() {
            let text = lines[line];
            line += 1;
            if is_skippable(text) {
                continue;
            }
            if is_block_terminator(text) {
                break;
            }

            let tokens = tokenize(path_record_body(text));
            match (tokens.first(), tokens.get(1)) {
                (Some(name), Some(value)) => {
                    let name = strip_quotes(name).to_string();
                    let value = strip_quotes(value).to_string();
                    debug!("Found PATHS entry: {} -> {}", name, value);
                    self.paths.entry(name).or_insert(value);
                }
                _ => warn!("Ignoring incomplete PATHS entry: {}", text.trim()),
            }
        }
        line
    }

    fn build(self) -> DeckHeader {
        DeckHeader {
            start_date: self.start_date,
            paths: self.paths,
        }
    }
}

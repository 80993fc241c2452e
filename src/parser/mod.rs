//! Schedule deck parser.
//!
//! Walks a root deck line by line, dispatching each keyword line to the
//! block grammar given by [`KeywordKind`], and recursively parses INCLUDE
//! files, splicing their events in at the point of inclusion. Every event
//! gets a key from a counter shared across the whole recursive parse, so
//! the final log is in document order across all files.

mod vfp;

#[cfg(test)]
pub mod tests;

use crate::config::ReaderConfig;
use crate::error::{Result, ScheduleError};
use crate::header::{first_token_upper, locate_schedule, scan_deck_header};
use crate::include::resolve_include;
use crate::keywords::{KeywordKind, VfpFlavor};
use crate::models::{Event, EventLog, PathTable};
use crate::records::{
    expand_repeats, is_block_terminator, is_skippable, pad_to, parse_record_line, record_body,
    terminator_position, tokenize,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Parse a deck with the default reader configuration
pub fn parse_deck(path: impl AsRef<Path>) -> Result<EventLog> {
    DeckParser::new(ReaderConfig::default()).parse(path)
}

/// Entry point for parsing root decks
#[derive(Debug, Clone, Default)]
pub struct DeckParser {
    config: ReaderConfig,
}

impl DeckParser {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Parse a root deck and every file it includes
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<EventLog> {
        let path = path.as_ref();
        let mut context = ParseContext::new(&self.config);
        let log = parse_document(path, self.config.start_date.clone(), &mut context, true)?;

        debug!(
            "Parsed {} events from {} ({} dates)",
            log.len(),
            path.display(),
            log.dates().len()
        );
        Ok(log)
    }
}

/// State shared by every document of one parse
struct ParseContext<'cfg> {
    config: &'cfg ReaderConfig,
    next_key: usize,
    paths: PathTable,
    include_stack: Vec<PathBuf>,
}

impl<'cfg> ParseContext<'cfg> {
    fn new(config: &'cfg ReaderConfig) -> Self {
        Self {
            config,
            next_key: 0,
            paths: PathTable::new(),
            include_stack: Vec::new(),
        }
    }

    fn next_key(&mut self) -> usize {
        let key = self.next_key;
        self.next_key += 1;
        key
    }

    /// Push a file onto the include stack, failing if it is already open
    fn enter(&mut self, path: &Path) -> Result<()> {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if self.config.guard_include_cycles && self.include_stack.contains(&canonical) {
            let mut chain = self.include_stack.clone();
            chain.push(canonical);
            return Err(ScheduleError::CyclicInclude { chain });
        }
        self.include_stack.push(canonical);
        Ok(())
    }

    fn leave(&mut self) {
        self.include_stack.pop();
    }
}

/// Parse one document; `is_root` enables header scanning and date seeding
fn parse_document(
    path: &Path,
    inherited_date: Option<String>,
    context: &mut ParseContext<'_>,
    is_root: bool,
) -> Result<EventLog> {
    if !path.exists() {
        return Err(ScheduleError::NotFound {
            path: path.to_path_buf(),
        });
    }

    if context.config.verbose {
        info!("Reading file: {}", path.display());
    } else {
        debug!("Reading file: {}", path.display());
    }

    context.enter(path)?;

    let text = context.config.encoding.read_to_string(path)?;
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();

    let mut log = EventLog::new();
    let mut current_date = inherited_date;

    if is_root {
        let header = scan_deck_header(&lines);
        context.paths = header.paths;

        let start = current_date
            .or(header.start_date)
            .unwrap_or_else(|| context.config.default_start_date.clone());
        log.push(context.next_key(), Event::DateMarker { date: start.clone() });
        current_date = Some(start);
    }

    let schedule_line = locate_schedule(&lines).unwrap_or_else(|| {
        debug!(
            "No SCHEDULE section in {}, reading the whole file",
            path.display()
        );
        0
    });

    let mut reader = DocumentReader {
        path,
        lines: &lines,
        pos: schedule_line,
        context: &mut *context,
        log,
        current_date,
    };
    reader.run()?;
    let log = reader.log;

    context.leave();
    Ok(log)
}

/// Cursor over one document's lines
struct DocumentReader<'a, 'cfg> {
    path: &'a Path,
    lines: &'a [&'a str],
    pos: usize,
    context: &'a mut ParseContext<'cfg>,
    log: EventLog,
    current_date: Option<String>,
}

impl DocumentReader<'_, '_> {
    fn run(&mut self) -> Result<()> {
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            let Some(token) = first_token_upper(line) else {
                self.pos += 1;
                continue;
            };

            match KeywordKind::classify(&token) {
                KeywordKind::Dates => self.read_dates(),
                KeywordKind::Fixed(count) => self.read_fixed(&token, count)?,
                KeywordKind::Include => self.read_include()?,
                KeywordKind::Toggle => {
                    self.emit(Event::Scalar {
                        keyword: token,
                        value: None,
                    });
                    self.pos += 1;
                }
                KeywordKind::OneLine => self.read_scalars(&token, 1),
                KeywordKind::ThreeRecord => self.read_scalars(&token, 3),
                KeywordKind::Generic if terminator_position(line).is_none() => {
                    self.read_generic(&token)
                }
                KeywordKind::VfpTable(flavor) => self.read_vfp(&token, flavor),
                // Unknown keywords and stray data lines are skipped on purpose
                KeywordKind::Generic | KeywordKind::Unknown => self.pos += 1,
            }
        }
        Ok(())
    }

    fn emit(&mut self, event: Event) {
        let key = self.context.next_key();
        self.log.push(key, event);
    }

    /// Advance to the next line holding data; returns its index
    fn next_data_line(&mut self) -> Option<usize> {
        while self.pos < self.lines.len() {
            let idx = self.pos;
            self.pos += 1;
            if !is_skippable(self.lines[idx]) {
                return Some(idx);
            }
        }
        None
    }

    /// Advance to the next record line of a `/`-terminated block
    ///
    /// Returns `None` at the block terminator or end of file.
    fn next_block_line(&mut self) -> Option<usize> {
        let idx = self.next_data_line()?;
        if is_block_terminator(self.lines[idx]) {
            None
        } else {
            Some(idx)
        }
    }

    fn read_dates(&mut self) {
        self.pos += 1;
        while let Some(idx) = self.next_block_line() {
            let date = record_body(self.lines[idx]).trim().to_string();
            self.current_date = Some(date.clone());
            self.emit(Event::DateMarker { date });
        }
    }

    fn read_fixed(&mut self, keyword: &str, count: usize) -> Result<()> {
        self.pos += 1;
        while let Some(idx) = self.next_block_line() {
            let line = self.lines[idx];
            let end = terminator_position(line).ok_or_else(|| ScheduleError::MalformedRecord {
                path: self.path.to_path_buf(),
                line: idx + 1,
                keyword: keyword.to_string(),
            })?;

            let mut fields = expand_repeats(tokenize(&line[..end]), count);
            if fields.len() > count {
                warn!(
                    "{} record at {}:{} has {} items, keeping the first {}",
                    keyword,
                    self.path.display(),
                    idx + 1,
                    fields.len(),
                    count
                );
                fields.truncate(count);
            }
            pad_to(&mut fields, count);

            self.emit(Event::Record {
                keyword: keyword.to_string(),
                fields,
            });
        }
        Ok(())
    }

    fn read_include(&mut self) -> Result<()> {
        self.pos += 1;
        let Some(idx) = self.next_data_line() else {
            warn!("INCLUDE without a file name at end of {}", self.path.display());
            return Ok(());
        };

        let target = resolve_include(self.lines[idx], &self.context.paths, self.path)?;
        let included = parse_document(
            &target,
            self.current_date.clone(),
            &mut *self.context,
            false,
        )?;

        if let Some(date) = included.last_date() {
            self.current_date = Some(date.to_string());
        }
        debug!(
            "Spliced {} events from {} into {}",
            included.len(),
            target.display(),
            self.path.display()
        );
        self.log.splice(included);
        Ok(())
    }

    fn read_scalars(&mut self, keyword: &str, records: usize) {
        self.pos += 1;
        for _ in 0..records {
            let Some(idx) = self.next_data_line() else {
                warn!(
                    "{} ended early at end of {}",
                    keyword,
                    self.path.display()
                );
                return;
            };
            let value = record_body(self.lines[idx]).trim().to_string();
            self.emit(Event::Scalar {
                keyword: keyword.to_string(),
                value: Some(value),
            });
        }
    }

    /// Read records of unknown width and pad them to this block's widest row
    fn read_generic(&mut self, keyword: &str) {
        self.pos += 1;
        let mut rows = Vec::new();
        while let Some(idx) = self.next_block_line() {
            let line = self.lines[idx];
            if starts_keyword_block(line) {
                // Unterminated block: leave the keyword line for the dispatcher
                self.pos = idx;
                break;
            }
            rows.push(parse_record_line(line));
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for mut fields in rows {
            pad_to(&mut fields, width);
            self.emit(Event::Record {
                keyword: keyword.to_string(),
                fields,
            });
        }
    }

    fn read_vfp(&mut self, keyword: &str, flavor: VfpFlavor) {
        let table = vfp::read_vfp_table(self.lines, self.pos + 1, flavor);
        if !table.complete {
            warn!(
                "{} table in {} ended before all rows were read",
                keyword,
                self.path.display()
            );
        }
        self.pos = table.next_line;
        self.emit(Event::Blob {
            keyword: keyword.to_string(),
            text: table.text,
        });
    }
}

/// A line without `/` whose first token is a recognized keyword
fn starts_keyword_block(line: &str) -> bool {
    terminator_position(line).is_none()
        && first_token_upper(line)
            .is_some_and(|token| KeywordKind::classify(&token) != KeywordKind::Unknown)
}

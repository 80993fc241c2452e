//! Core data structures for parsed schedule decks.
//!
//! Defines the event variants emitted by the parser, the ordered event log
//! handed to the projector, and the path-variable table.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Mapping from `PATHS` variable name to its substitution
pub type PathTable = HashMap<String, String>;

/// One parsed item of a schedule deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// The simulation date advanced to (or started at) this raw date string
    DateMarker { date: String },
    /// One data row of a record keyword
    Record { keyword: String, fields: Vec<String> },
    /// A keyword without rows: a toggle (`None`) or a short fixed record
    Scalar {
        keyword: String,
        value: Option<String>,
    },
    /// Raw text of a nested table keyword that is not decomposed
    Blob { keyword: String, text: String },
}

impl Event {
    /// Keyword the event belongs to; date markers have none
    pub fn keyword(&self) -> Option<&str> {
        match self {
            Event::DateMarker { .. } => None,
            Event::Record { keyword, .. }
            | Event::Scalar { keyword, .. }
            | Event::Blob { keyword, .. } => Some(keyword),
        }
    }
}

/// An event with its globally ordered key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedEvent {
    pub key: usize,
    pub event: Event,
}

/// Ordered events of a deck and all of its includes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<KeyedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, key: usize, event: Event) {
        self.events.push(KeyedEvent { key, event });
    }

    /// Append an included document's events at the current position
    pub(crate) fn splice(&mut self, included: EventLog) {
        self.events.extend(included.events);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyedEvent> {
        self.events.iter()
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().map(|keyed| &keyed.event)
    }

    /// Raw date strings of every date marker, in log order
    pub fn dates(&self) -> Vec<&str> {
        self.events()
            .filter_map(|event| match event {
                Event::DateMarker { date } => Some(date.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Most recent date marker value, if any
    pub fn last_date(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|keyed| match &keyed.event {
            Event::DateMarker { date } => Some(date.as_str()),
            _ => None,
        })
    }

    /// Field lists of every record of `keyword`
    pub fn records<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a [String]> + 'a {
        self.events().filter_map(move |event| match event {
            Event::Record { keyword: kw, fields } if kw.eq_ignore_ascii_case(keyword) => {
                Some(fields.as_slice())
            }
            _ => None,
        })
    }

    /// Number of events per keyword, date markers under `DATES`
    pub fn keyword_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for event in self.events() {
            let name = event.keyword().unwrap_or("DATES").to_string();
            *counts.entry(name).or_insert(0) += 1;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a KeyedEvent;
    type IntoIter = std::slice::Iter<'a, KeyedEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Summary of one processed deck
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub decks_processed: usize,
    pub events: usize,
    pub tables_written: usize,
    pub total_rows: usize,
    pub processing_time_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> EventLog {
        let mut log = EventLog::new();
        log.push(
            0,
            Event::DateMarker {
                date: "1 JAN 2000".to_string(),
            },
        );
        log.push(
            1,
            Event::Record {
                keyword: "WELSPECS".to_string(),
                fields: vec!["'P1'".to_string(), "'G1'".to_string()],
            },
        );
        log.push(
            2,
            Event::Scalar {
                keyword: "ECHO".to_string(),
                value: None,
            },
        );
        log.push(
            3,
            Event::DateMarker {
                date: "1 FEB 2000".to_string(),
            },
        );
        log
    }

    #[test]
    fn test_dates_and_last_date() {
        let log = sample_log();
        assert_eq!(log.dates(), vec!["1 JAN 2000", "1 FEB 2000"]);
        assert_eq!(log.last_date(), Some("1 FEB 2000"));
        assert_eq!(log.len(), 4);
    }

    #[test]
    fn test_records_match_case_insensitively() {
        let log = sample_log();
        assert_eq!(log.records("welspecs").count(), 1);
        assert_eq!(log.records("COMPDAT").count(), 0);
    }

    #[test]
    fn test_keyword_counts() {
        let counts = sample_log().keyword_counts();
        assert_eq!(counts.get("DATES"), Some(&2));
        assert_eq!(counts.get("WELSPECS"), Some(&1));
        assert_eq!(counts.get("ECHO"), Some(&1));
    }
}

//! Parser tests against decks written to temporary directories

pub mod include_handling;

use crate::models::{Event, EventLog};
use std::fs;
use std::path::{Path, PathBuf};

/// Write a deck file under `dir`, creating parent directories
pub(crate) fn write_deck(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Events of the log without their keys
pub(crate) fn events(log: &EventLog) -> Vec<Event> {
    log.events().cloned().collect()
}

pub(crate) fn date(value: &str) -> Event {
    Event::DateMarker {
        date: value.to_string(),
    }
}

pub(crate) fn record(keyword: &str, fields: &[&str]) -> Event {
    Event::Record {
        keyword: keyword.to_string(),
        fields: fields.iter().map(|f| f.to_string()).collect(),
    }
}

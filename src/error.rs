//! Error handling for schedule deck parsing and projection.
//!
//! Every parse-time error is fatal: it propagates straight to the caller
//! of the top-level parse and no partial event log is returned.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Deck file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Malformed {keyword} record in {path} at line {line}: missing '/' terminator")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        keyword: String,
    },

    #[error("Path variable '${variable}' used in {path} is not defined in PATHS")]
    UndefinedPathVariable { variable: String, path: PathBuf },

    #[error("Include cycle detected: {}", chain.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(" -> "))]
    CyclicInclude { chain: Vec<PathBuf> },

    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("No table schema for keyword: {keyword}")]
    UnknownKeyword { keyword: String },
}

impl ScheduleError {
    pub(crate) fn invalid_date(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

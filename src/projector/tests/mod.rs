//! Projection tests over parsed fixture decks


use crate::models::EventLog;
use crate::parser::parse_deck;
use crate::parser::tests::write_deck;
use polars::prelude::*;
use tempfile::TempDir;

/// Parse a deck written from `content`
pub(crate) fn parse_text(content: &str) -> EventLog {
    let temp_dir = TempDir::new().unwrap();
    let deck = write_deck(temp_dir.path(), "CASE.DATA", content);
    parse_deck(&deck).unwrap()
}

pub(crate) fn ints(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_iter()
        .collect()
}

pub(crate) fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

/// Values of a string or categorical column
pub(crate) fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    let column = df.column(name).unwrap().cast(&DataType::String).unwrap();
    column
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

/// `date` column rendered as `YYYY-MM-DD`
pub(crate) fn days(df: &DataFrame) -> Vec<String> {
    let millis = df
        .column("date")
        .unwrap()
        .cast(&DataType::Int64)
        .unwrap();
    millis
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_iter()
        .map(|ms| {
            chrono::DateTime::from_timestamp_millis(ms.unwrap())
                .unwrap()
                .format("%Y-%m-%d")
                .to_string()
        })
        .collect()
}

//! Keyword projection from the event log to tables.
//!
//! The projector walks the event log once, carrying the most recent date
//! marker along as the `date` of each row. [`KeywordTable`] is the raw string
//! form; [`project`] and the `extract_*` shortcuts turn it into typed polars
//! frames.

mod conversion;
mod locations;

#[cfg(test)]
pub mod tests;

pub use locations::WellLocations;

use crate::error::{Result, ScheduleError};
use crate::models::{Event, EventLog};
use crate::records::pad_to;
use crate::schema::{self, ColumnKind, DATE_COLUMN, KeywordSchema};
use conversion::{build_column, categorize, clean_value, date_column, infer_kind};
use polars::prelude::*;
use tracing::debug;

/// Rows of one keyword with their effective dates, as raw tokens
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTable {
    keyword: String,
    columns: Vec<String>,
    dates: Vec<Option<String>>,
    rows: Vec<Vec<String>>,
}

impl KeywordTable {
    /// Collect every row of `keyword`.
    ///
    /// Without `field_names` the columns are `date`, `1`, `2`, ... up to the
    /// widest row. With names, rows are cut or filled to fit them, and a
    /// leading `date` name is added when missing.
    pub fn from_log(log: &EventLog, keyword: &str, field_names: Option<&[&str]>) -> Self {
        let mut current_date: Option<&str> = None;
        let mut dates = Vec::new();
        let mut rows = Vec::new();

        for event in log.events() {
            let row = match event {
                Event::DateMarker { date } => {
                    current_date = Some(date);
                    continue;
                }
                Event::Record { keyword: kw, fields } if kw.eq_ignore_ascii_case(keyword) => {
                    fields.clone()
                }
                Event::Scalar { keyword: kw, value } if kw.eq_ignore_ascii_case(keyword) => {
                    value.iter().cloned().collect()
                }
                Event::Blob { keyword: kw, text } if kw.eq_ignore_ascii_case(keyword) => {
                    vec![text.clone()]
                }
                _ => continue,
            };
            dates.push(current_date.map(str::to_string));
            rows.push(row);
        }

        let columns: Vec<String> = match field_names {
            Some(names) => {
                let mut columns: Vec<String> = names.iter().map(|n| n.to_string()).collect();
                if columns.first().map(String::as_str) != Some(DATE_COLUMN) {
                    columns.insert(0, DATE_COLUMN.to_string());
                }
                columns
            }
            None => {
                let width = rows.iter().map(Vec::len).max().unwrap_or(0);
                std::iter::once(DATE_COLUMN.to_string())
                    .chain((1..=width).map(|i| i.to_string()))
                    .collect()
            }
        };

        let width = columns.len() - 1;
        for row in &mut rows {
            row.truncate(width);
            pad_to(row, width);
        }

        debug!("Collected {} {} rows", rows.len(), keyword);
        Self {
            keyword: keyword.to_ascii_uppercase(),
            columns,
            dates,
            rows,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Column names, `date` first
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw date string of each row
    pub fn dates(&self) -> &[Option<String>] {
        &self.dates
    }

    /// Raw tokens of each row, without the date
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cleaned values of data column `index` (0 is the first item after `date`)
    fn values(&self, index: usize) -> Vec<Option<String>> {
        self.rows
            .iter()
            .map(|row| row.get(index).and_then(|raw| clean_value(raw)))
            .collect()
    }

    /// Frame with inferred column types
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns = vec![date_column(&self.dates)?];
        for (index, name) in self.columns[1..].iter().enumerate() {
            let values = self.values(index);
            columns.push(build_column(name, &values, infer_kind(&values)));
        }
        Ok(DataFrame::new(columns)?)
    }

    /// Frame typed by `schema`; category columns are left as strings
    fn to_schema_frame(&self, schema: &KeywordSchema) -> Result<DataFrame> {
        let mut columns = vec![date_column(&self.dates)?];
        for (index, spec) in schema.columns.iter().enumerate() {
            let mut values = self.values(index);
            if let Some(default) = spec.default {
                for value in values.iter_mut().filter(|v| v.is_none()) {
                    *value = Some(default.to_string());
                }
            }
            columns.push(build_column(spec.name, &values, spec.kind));
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Generic projection of any keyword into a typed frame
pub fn project(log: &EventLog, keyword: &str, field_names: Option<&[&str]>) -> Result<DataFrame> {
    KeywordTable::from_log(log, keyword, field_names).to_frame()
}

/// Projection of a keyword with a fixed schema
pub fn extract_keyword(log: &EventLog, keyword: &str) -> Result<DataFrame> {
    let schema = schema::schema_for(keyword).ok_or_else(|| ScheduleError::UnknownKeyword {
        keyword: keyword.to_string(),
    })?;
    match schema.keyword {
        "COMPDAT" | "COMPDATL" | "COMPDATM" => extract_completions(log, schema),
        _ => extract_with_schema(log, schema),
    }
}

fn schema_table(log: &EventLog, schema: &KeywordSchema) -> Result<DataFrame> {
    let names = schema.field_names();
    KeywordTable::from_log(log, schema.keyword, Some(&names)).to_schema_frame(schema)
}

fn category_columns(schema: &KeywordSchema) -> Vec<&'static str> {
    schema
        .columns
        .iter()
        .filter(|c| c.kind == ColumnKind::Category)
        .map(|c| c.name)
        .collect()
}

fn extract_with_schema(log: &EventLog, schema: &KeywordSchema) -> Result<DataFrame> {
    let mut df = schema_table(log, schema)?;
    categorize(&mut df, &category_columns(schema))?;
    Ok(df)
}

/// Completion table with defaulted I/J taken from the wells' locations
fn extract_completions(log: &EventLog, schema: &KeywordSchema) -> Result<DataFrame> {
    let mut df = schema_table(log, schema)?;
    if needs_location(&df)? {
        let locations = WellLocations::from_frame(&welspec2_frame(log)?)?;
        locations.fill_coordinates(&mut df)?;
    }
    categorize(&mut df, &category_columns(schema))?;
    Ok(df)
}

fn needs_location(df: &DataFrame) -> Result<bool> {
    for name in ["I", "J"] {
        let column = df.column(name)?.as_materialized_series().i64()?;
        if column.null_count() > 0 || column.into_iter().any(|v| v == Some(0)) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// WELSPECS, WELSPECL and WELLSPEC rows stacked, categories still strings
fn welspec2_frame(log: &EventLog) -> Result<DataFrame> {
    let mut present = Vec::new();
    for schema in [schema::WELSPECS, schema::WELSPECL, schema::WELLSPEC] {
        let df = schema_table(log, &schema)?;
        if df.height() > 0 {
            present.push(df);
        }
    }

    match present.len() {
        0 => schema_table(log, &schema::WELSPECS),
        1 => Ok(present.remove(0)),
        _ => {
            let frames: Vec<LazyFrame> = present.into_iter().map(DataFrame::lazy).collect();
            let union = UnionArgs {
                diagonal: true,
                ..Default::default()
            };
            Ok(concat(frames, union)?.collect()?)
        }
    }
}

pub fn extract_welspecs(log: &EventLog) -> Result<DataFrame> {
    extract_with_schema(log, &schema::WELSPECS)
}

pub fn extract_welspecl(log: &EventLog) -> Result<DataFrame> {
    extract_with_schema(log, &schema::WELSPECL)
}

pub fn extract_wellspec(log: &EventLog) -> Result<DataFrame> {
    extract_with_schema(log, &schema::WELLSPEC)
}

/// Every well location keyword in one table.
///
/// Columns are the union of the three layouts. With no location rows at all
/// the result is an empty WELSPECS table.
pub fn extract_welspec2(log: &EventLog) -> Result<DataFrame> {
    let mut df = welspec2_frame(log)?;
    categorize(&mut df, &["well", "group", "preferred phase"])?;
    Ok(df)
}

pub fn extract_compdat(log: &EventLog) -> Result<DataFrame> {
    extract_completions(log, &schema::COMPDAT)
}

pub fn extract_compdatl(log: &EventLog) -> Result<DataFrame> {
    extract_completions(log, &schema::COMPDATL)
}

pub fn extract_compdatm(log: &EventLog) -> Result<DataFrame> {
    extract_completions(log, &schema::COMPDATM)
}

pub fn extract_wconprod(log: &EventLog) -> Result<DataFrame> {
    extract_with_schema(log, &schema::WCONPROD)
}

pub fn extract_wconhist(log: &EventLog) -> Result<DataFrame> {
    extract_with_schema(log, &schema::WCONHIST)
}

pub fn extract_wconinje(log: &EventLog) -> Result<DataFrame> {
    extract_with_schema(log, &schema::WCONINJE)
}

pub fn extract_wconinjh(log: &EventLog) -> Result<DataFrame> {
    extract_with_schema(log, &schema::WCONINJH)
}

/// One `date` row per date marker
pub fn extract_dates(log: &EventLog) -> Result<DataFrame> {
    let dates: Vec<Option<String>> = log.dates().into_iter().map(|d| Some(d.to_string())).collect();
    Ok(DataFrame::new(vec![date_column(&dates)?])?)
}

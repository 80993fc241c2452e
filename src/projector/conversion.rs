//! Raw token to typed column conversion.

use crate::constants::PLACEHOLDER;
use crate::dates::parse_deck_date;
use crate::error::Result;
use crate::records::strip_quotes;
use crate::schema::{ColumnKind, DATE_COLUMN};
use polars::prelude::*;
use tracing::warn;

/// Unquoted value of a token; placeholders and empty tokens are missing
pub(crate) fn clean_value(raw: &str) -> Option<String> {
    let value = strip_quotes(raw);
    if value.is_empty() || value == PLACEHOLDER {
        None
    } else {
        Some(value.to_string())
    }
}

pub(crate) fn parse_int(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().or_else(|| {
        parse_float(value)
            .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
            .map(|v| v as i64)
    })
}

/// Accepts Fortran `D` exponents (`1.5D3`)
pub(crate) fn parse_float(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .or_else(|| value.replace(['D', 'd'], "E").parse::<f64>().ok())
}

/// Narrowest kind that parses every present value
pub(crate) fn infer_kind(values: &[Option<String>]) -> ColumnKind {
    let present: Vec<&str> = values.iter().flatten().map(String::as_str).collect();
    if present.is_empty() {
        ColumnKind::Text
    } else if present.iter().all(|v| v.parse::<i64>().is_ok()) {
        ColumnKind::Int
    } else if present.iter().all(|v| parse_float(v).is_some()) {
        ColumnKind::Float
    } else {
        ColumnKind::Text
    }
}

/// Build a column of `kind`; category columns stay strings until [`categorize`]
pub(crate) fn build_column(name: &str, values: &[Option<String>], kind: ColumnKind) -> Column {
    match kind {
        ColumnKind::Int => {
            let parsed: Vec<Option<i64>> = values
                .iter()
                .map(|v| convert(name, v.as_deref(), parse_int))
                .collect();
            Column::new(name.into(), parsed)
        }
        ColumnKind::Float => {
            let parsed: Vec<Option<f64>> = values
                .iter()
                .map(|v| convert(name, v.as_deref(), parse_float))
                .collect();
            Column::new(name.into(), parsed)
        }
        ColumnKind::Category | ColumnKind::Text => {
            let strings: Vec<Option<&str>> = values.iter().map(Option::as_deref).collect();
            Column::new(name.into(), strings)
        }
    }
}

fn convert<T>(column: &str, value: Option<&str>, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let value = value?;
    let parsed = parse(value);
    if parsed.is_none() {
        warn!("Column '{}': cannot convert '{}', storing null", column, value);
    }
    parsed
}

/// `date` column of millisecond timestamps
pub(crate) fn date_column(dates: &[Option<String>]) -> Result<Column> {
    let millis = dates
        .iter()
        .map(|d| {
            d.as_deref()
                .map(|raw| parse_deck_date(raw).map(|dt| dt.and_utc().timestamp_millis()))
                .transpose()
        })
        .collect::<Result<Vec<Option<i64>>>>()?;

    let column = Column::new(DATE_COLUMN.into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    Ok(column)
}

/// Cast string columns to categoricals
pub(crate) fn categorize(df: &mut DataFrame, names: &[&str]) -> Result<()> {
    for name in names {
        let Ok(column) = df.column(name) else {
            continue;
        };
        let categorical = column.cast(&ColumnKind::Category.dtype())?;
        df.with_column(categorical)?;
    }
    Ok(())
}

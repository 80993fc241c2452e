//! DATES record parsing.
//!
//! Converts raw date strings such as `1 JAN 2000`, `01 'JLY' 2010 /` or
//! `15 MAR 2021 12:30:00` into calendar timestamps.

use crate::constants::MONTHS;
use crate::error::{Result, ScheduleError};
use crate::records::{record_body, strip_quotes};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Parse one `DD MMM YYYY [HH:MM:SS[.ffff]]` date
pub fn parse_deck_date(raw: &str) -> Result<NaiveDateTime> {
    let parts: Vec<&str> = record_body(raw).split_whitespace().collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(ScheduleError::invalid_date(
            raw,
            "expected 'DD MMM YYYY' with an optional HH:MM:SS",
        ));
    }

    let day = parts[0]
        .parse::<u32>()
        .map_err(|e| ScheduleError::invalid_date(raw, format!("bad day: {}", e)))?;
    let month = month_number(strip_quotes(parts[1]))
        .ok_or_else(|| ScheduleError::invalid_date(raw, "unknown month code"))?;
    let year = parts[2]
        .parse::<i32>()
        .map_err(|e| ScheduleError::invalid_date(raw, format!("bad year: {}", e)))?;

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ScheduleError::invalid_date(raw, "day out of range for month"))?;

    let time = match parts.get(3) {
        Some(clock) => parse_clock(clock)
            .ok_or_else(|| ScheduleError::invalid_date(raw, "bad time of day"))?,
        None => NaiveTime::MIN,
    };

    Ok(date.and_time(time))
}

fn month_number(code: &str) -> Option<u32> {
    let code = code.to_ascii_uppercase();
    MONTHS
        .iter()
        .find(|(name, _)| *name == code)
        .map(|(_, number)| *number)
}

/// `HH`, `HH:MM` or `HH:MM:SS[.fraction]`
fn parse_clock(clock: &str) -> Option<NaiveTime> {
    let mut pieces = clock.split(':');
    let hour = pieces.next()?.parse::<u32>().ok()?;
    let minute = match pieces.next() {
        Some(m) => m.parse::<u32>().ok()?,
        None => 0,
    };
    let seconds = match pieces.next() {
        Some(s) => s.parse::<f64>().ok()?,
        None => 0.0,
    };
    if pieces.next().is_some() || !(0.0..60.0).contains(&seconds) {
        return None;
    }
    let whole = seconds.trunc() as u32;
    let micros = ((seconds - seconds.trunc()) * 1_000_000.0).round() as u32;
    NaiveTime::from_hms_micro_opt(hour, minute, whole, micros.min(999_999))
}

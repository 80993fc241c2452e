//! Well head locations over time, for completions that default I/J.

use crate::error::Result;
use crate::schema::DATE_COLUMN;
use polars::prelude::*;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Location {
    date: Option<i64>,
    i: Option<i64>,
    j: Option<i64>,
}

/// Location history per well, in table order
#[derive(Debug, Default, Clone)]
pub struct WellLocations {
    wells: HashMap<String, Vec<Location>>,
}

impl WellLocations {
    /// Build from a projected location table (`date`, `well`, `I`, `J` columns)
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let mut wells: HashMap<String, Vec<Location>> = HashMap::new();
        if df.height() == 0 {
            return Ok(Self { wells });
        }

        let dates = timestamps(df)?;
        let names = df.column("well")?.cast(&DataType::String)?;
        let names = names.as_materialized_series().str()?;
        let i = df.column("I")?.cast(&DataType::Int64)?;
        let j = df.column("J")?.cast(&DataType::Int64)?;
        let i = i.as_materialized_series().i64()?;
        let j = j.as_materialized_series().i64()?;

        for (row, name) in names.into_iter().enumerate() {
            let Some(name) = name else {
                continue;
            };
            wells.entry(name.to_string()).or_default().push(Location {
                date: dates[row],
                i: i.get(row),
                j: j.get(row),
            });
        }

        debug!("Indexed locations of {} wells", wells.len());
        Ok(Self { wells })
    }

    /// Latest known (I, J) of `well` at or before `date`
    pub fn lookup(&self, well: &str, date: Option<i64>) -> Option<(Option<i64>, Option<i64>)> {
        self.wells
            .get(well)?
            .iter()
            .filter(|loc| match (loc.date, date) {
                (Some(defined), Some(at)) => defined <= at,
                _ => true,
            })
            .max_by_key(|loc| loc.date)
            .map(|loc| (loc.i, loc.j))
    }

    /// Replace null or zero `I`/`J` cells of a completion table
    pub fn fill_coordinates(&self, df: &mut DataFrame) -> Result<()> {
        let dates = timestamps(df)?;
        let names = df.column("well")?.cast(&DataType::String)?;
        let names = names.as_materialized_series().str()?;
        let i = df.column("I")?.as_materialized_series().i64()?;
        let j = df.column("J")?.as_materialized_series().i64()?;

        let mut filled_i = Vec::with_capacity(df.height());
        let mut filled_j = Vec::with_capacity(df.height());

        for row in 0..df.height() {
            let (mut ci, mut cj) = (i.get(row), j.get(row));
            if is_defaulted(ci) || is_defaulted(cj) {
                let known = names.get(row).and_then(|well| self.lookup(well, dates[row]));
                match known {
                    Some((wi, wj)) => {
                        if is_defaulted(ci) {
                            ci = wi;
                        }
                        if is_defaulted(cj) {
                            cj = wj;
                        }
                    }
                    None => {
                        warn!(
                            "No location for well {:?} at row {}, leaving I/J unset",
                            names.get(row),
                            row
                        );
                        ci = ci.filter(|v| *v != 0);
                        cj = cj.filter(|v| *v != 0);
                    }
                }
            }
            filled_i.push(ci);
            filled_j.push(cj);
        }

        df.with_column(Column::new("I".into(), filled_i))?;
        df.with_column(Column::new("J".into(), filled_j))?;
        Ok(())
    }
}

fn is_defaulted(value: Option<i64>) -> bool {
    matches!(value, None | Some(0))
}

/// `date` column as epoch milliseconds
fn timestamps(df: &DataFrame) -> Result<Vec<Option<i64>>> {
    let dates = df.column(DATE_COLUMN)?.cast(&DataType::Int64)?;
    Ok(dates.as_materialized_series().i64()?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location_frame() -> DataFrame {
        df!(
            "date" => [Some(0i64), Some(1_000), Some(2_000)],
            "well" => ["P1", "P2", "P1"],
            "I" => [Some(2i64), Some(7), Some(4)],
            "J" => [Some(3i64), Some(8), None]
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_takes_latest_before_date() {
        let locations = WellLocations::from_frame(&location_frame()).unwrap();
        assert_eq!(locations.lookup("P1", Some(500)), Some((Some(2), Some(3))));
        assert_eq!(locations.lookup("P1", Some(2_000)), Some((Some(4), None)));
        assert_eq!(locations.lookup("P2", Some(500)), None);
        assert_eq!(locations.lookup("P9", Some(500)), None);
    }

    #[test]
    fn test_fill_coordinates() {
        let locations = WellLocations::from_frame(&location_frame()).unwrap();
        let mut completions = df!(
            "date" => [Some(1_500i64), Some(1_500), Some(1_500)],
            "well" => ["P1", "P2", "P3"],
            "I" => [None, Some(0i64), Some(0)],
            "J" => [Some(9i64), None, Some(5)]
        )
        .unwrap();

        locations.fill_coordinates(&mut completions).unwrap();

        let i: Vec<Option<i64>> = completions
            .column("I")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        let j: Vec<Option<i64>> = completions
            .column("J")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(i, vec![Some(2), Some(7), None]);
        assert_eq!(j, vec![Some(9), Some(8), Some(5)]);
    }
}

//! Grid property helpers.
//!
//! Small utilities for property include files (PORO, PERMX, ...): pulling a
//! keyword's data out of a file, expanding `N*value` runs and building the
//! cell index that matches the expanded value order.

use crate::constants::{COMMENT_PREFIX, PLACEHOLDER};
use crate::encoding::TextEncoding;
use crate::error::{Result, ScheduleError};
use crate::header::first_token_upper;
use crate::records::terminator_position;
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Data of `keyword` up to its `/`, comments removed
pub fn read_keyword_from_include(
    path: impl AsRef<Path>,
    keyword: &str,
    encoding: TextEncoding,
) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ScheduleError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let text = encoding.read_to_string(path)?;
    let keyword = keyword.to_ascii_uppercase();

    let mut lines = text.lines().map(strip_comment);
    if !lines
        .by_ref()
        .any(|line| first_token_upper(line).as_deref() == Some(keyword.as_str()))
    {
        return Err(ScheduleError::configuration(format!(
            "Keyword {} not found in {}",
            keyword,
            path.display()
        )));
    }

    let mut data = Vec::new();
    for line in lines {
        match terminator_position(line) {
            Some(end) => {
                data.push(line[..end].trim());
                break;
            }
            None => data.push(line.trim()),
        }
    }

    let data: Vec<&str> = data.into_iter().filter(|l| !l.is_empty()).collect();
    debug!(
        "Read {} data lines of {} from {}",
        data.len(),
        keyword,
        path.display()
    );
    Ok(data.join("\n"))
}

fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_PREFIX) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Expand `N*value` into N copies of `value`; a bare `N*` gives N placeholders
pub fn expand_keyword(data: &str) -> String {
    let mut expanded = Vec::new();
    for token in data.split_whitespace() {
        let repeat = token
            .split_once('*')
            .and_then(|(count, value)| count.parse::<usize>().ok().map(|n| (n, value)));
        match repeat {
            Some((count, "")) => expanded.extend(std::iter::repeat_n(PLACEHOLDER, count)),
            Some((count, value)) => expanded.extend(std::iter::repeat_n(value, count)),
            None => expanded.push(token),
        }
    }
    expanded.join(" ")
}

/// 1-based (i, j, k) of every cell, I varying fastest then J then K
pub fn ijk_index(ni: u32, nj: u32, nk: u32) -> Result<DataFrame> {
    let cells = (ni as usize)
        .checked_mul(nj as usize)
        .and_then(|cells| cells.checked_mul(nk as usize))
        .ok_or_else(|| {
            ScheduleError::configuration(format!("Grid {}x{}x{} is too large", ni, nj, nk))
        })?;
    let mut i = Vec::with_capacity(cells);
    let mut j = Vec::with_capacity(cells);
    let mut k = Vec::with_capacity(cells);

    for kk in 1..=nk {
        for jj in 1..=nj {
            for ii in 1..=ni {
                i.push(ii);
                j.push(jj);
                k.push(kk);
            }
        }
    }

    Ok(DataFrame::new(vec![
        Column::new("i".into(), i),
        Column::new("j".into(), j),
        Column::new("k".into(), k),
    ])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_keyword_data() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("poro.inc");
        fs::write(
            &path,
            "-- porosity\nPERMX\n100 /\nPORO\n0.2 0.25 -- layer 1\n-- layer 2\n3*0.3 /\n",
        )
        .unwrap();

        let data = read_keyword_from_include(&path, "poro", TextEncoding::Utf8).unwrap();
        assert_eq!(data, "0.2 0.25\n3*0.3");
    }

    #[test]
    fn test_missing_keyword() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("perm.inc");
        fs::write(&path, "PERMX\n100 /\n").unwrap();

        let err = read_keyword_from_include(&path, "PORO", TextEncoding::Utf8).unwrap_err();
        assert!(matches!(err, ScheduleError::Configuration { .. }));
        assert!(err.to_string().contains("PORO"));
    }

    #[test]
    fn test_expand_keyword() {
        assert_eq!(expand_keyword("0.2 3*0.3\n1"), "0.2 0.3 0.3 0.3 1");
        assert_eq!(expand_keyword("2* 5"), "1* 1* 5");
        assert_eq!(expand_keyword("a*b"), "a*b");
    }

    #[test]
    fn test_ijk_overflowing_grid() {
        let err = ijk_index(u32::MAX, u32::MAX, u32::MAX).unwrap_err();
        assert!(matches!(err, ScheduleError::Configuration { .. }));
    }

    #[test]
    fn test_ijk_order() {
        let df = ijk_index(2, 2, 2).unwrap();
        assert_eq!(df.height(), 8);

        let column = |name: &str| -> Vec<Option<u32>> {
            df.column(name)
                .unwrap()
                .as_materialized_series()
                .u32()
                .unwrap()
                .into_iter()
                .collect()
        };
        assert_eq!(column("i")[..4], [Some(1), Some(2), Some(1), Some(2)]);
        assert_eq!(column("j")[..4], [Some(1), Some(1), Some(2), Some(2)]);
        assert_eq!(column("k")[3..5], [Some(1), Some(2)]);
    }
}

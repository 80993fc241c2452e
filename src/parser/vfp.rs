//! VFPPROD / VFPINJ table extent.
//!
//! A VFP table has no closing `/` line. Its header records list the axis
//! values, and the body holds one record per axis combination, so the block
//! ends after `product(axis lengths)` body records. Records may span several
//! lines; each ends at its `/`.

use crate::keywords::VfpFlavor;
use crate::records::{is_skippable, terminator_position, tokenize};
use regex::Regex;
use std::sync::LazyLock;

static REPEATED_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\*").expect("valid repeat regex"));

/// Raw text of one VFP table
#[derive(Debug)]
pub(crate) struct VfpTable {
    pub text: String,
    pub next_line: usize,
    pub complete: bool,
}

/// Collect a VFP table starting at the line after the keyword
pub(crate) fn read_vfp_table(lines: &[&str], start: usize, flavor: VfpFlavor) -> VfpTable {
    let mut raw = Vec::new();
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut current = Vec::new();
    let mut line = start;

    while line < lines.len() {
        let text = lines[line];
        line += 1;
        if is_skippable(text) {
            continue;
        }
        raw.push(text.trim());

        match terminator_position(text) {
            Some(end) => {
                current.extend(tokenize(&text[..end]));
                records.push(std::mem::take(&mut current));
            }
            None => {
                current.extend(tokenize(text));
                continue;
            }
        }

        if expected_records(&records, flavor).is_some_and(|total| records.len() >= total) {
            return VfpTable {
                text: raw.join("\n"),
                next_line: line,
                complete: true,
            };
        }
    }

    VfpTable {
        text: raw.join("\n"),
        next_line: line,
        complete: false,
    }
}

/// Total record count once the axis header records are known
fn expected_records(records: &[Vec<String>], flavor: VfpFlavor) -> Option<usize> {
    match flavor {
        // table, flow, THP, WFR, GFR, ALQ axes, then NTHP*NWFR*NGFR*NALQ rows
        VfpFlavor::Production if records.len() >= 6 => {
            let rows: usize = records[2..6].iter().map(|r| axis_length(r)).product();
            Some(6 + rows)
        }
        // table, flow, THP axes, then NTHP rows
        VfpFlavor::Injection if records.len() >= 3 => Some(3 + axis_length(&records[2])),
        _ => None,
    }
}

/// Number of values in an axis record, counting `N*value` as N
fn axis_length(tokens: &[String]) -> usize {
    let count: usize = tokens
        .iter()
        .map(|token| {
            REPEATED_VALUE
                .captures(token)
                .and_then(|caps| caps[1].parse::<usize>().ok())
                .unwrap_or(1)
        })
        .sum();
    count.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injection_table_extent() {
        let deck = [
            "1 2000 'WAT' 'THP' /",
            "100 200 300 /",
            "50 150 /",
            "1 1000 1100 1200 /",
            "-- second THP",
            "2 1050",
            "   1150 1250 /",
            "WCONINJE",
        ];
        let table = read_vfp_table(&deck, 0, VfpFlavor::Injection);
        assert!(table.complete);
        assert_eq!(table.next_line, 7);
        assert!(table.text.starts_with("1 2000 'WAT' 'THP' /"));
        assert!(!table.text.contains("second THP"));
    }

    #[test]
    fn test_production_table_extent() {
        let deck = [
            "3 2500 'LIQ' 'WCT' 'GOR' 'THP' ' ' 'METRIC' 'BHP' /",
            "100 500 /",
            "2*20 /",
            "0 0.5 /",
            "100 /",
            "0 /",
            "1 1 1 1 200 210 /",
            "2 1 1 1 220 230 /",
            "1 2 1 1 240 250 /",
            "2 2 1 1 260 270 /",
            "DATES",
        ];
        let table = read_vfp_table(&deck, 0, VfpFlavor::Production);
        assert!(table.complete);
        assert_eq!(table.next_line, 10);
    }

    #[test]
    fn test_truncated_table() {
        let deck = ["1 2000 'WAT' 'THP' /", "100 200 /"];
        let table = read_vfp_table(&deck, 0, VfpFlavor::Injection);
        assert!(!table.complete);
        assert_eq!(table.next_line, 2);
    }

    #[test]
    fn test_axis_length() {
        let tokens: Vec<String> = ["2*20", "30", "1*"].iter().map(|s| s.to_string()).collect();
        assert_eq!(axis_length(&tokens), 4);
        assert_eq!(axis_length(&[]), 1);
    }
}

//! INCLUDE splicing, path variables and date inheritance

use super::{date, events, record, write_deck};
use crate::parser::parse_deck;
use tempfile::TempDir;

#[test]
fn test_include_spliced_in_document_order() {
    let temp_dir = TempDir::new().unwrap();
    write_deck(
        temp_dir.path(),
        "wells.inc",
        "WELSPECS\n'P1' 'G1' 2 3 /\n/\nDATES\n1 MAR 2000 /\n/\n",
    );
    let deck = write_deck(
        temp_dir.path(),
        "CASE.DATA",
        "START\n1 JAN 2000 /\nSCHEDULE\nDATES\n1 FEB 2000 /\n/\nINCLUDE\n'wells.inc' /\nDATES\n1 APR 2000 /\n/\n",
    );

    let log = parse_deck(&deck).unwrap();
    let parsed = events(&log);

    assert_eq!(parsed.len(), 5);
    assert_eq!(parsed[0], date("1 JAN 2000"));
    assert_eq!(parsed[1], date("1 FEB 2000"));
    assert!(matches!(&parsed[2], crate::models::Event::Record { keyword, .. } if keyword == "WELSPECS"));
    assert_eq!(parsed[3], date("1 MAR 2000"));
    assert_eq!(parsed[4], date("1 APR 2000"));

    let keys: Vec<usize> = log.iter().map(|keyed| keyed.key).collect();
    assert_eq!(keys, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_included_file_does_not_reseed_date() {
    let temp_dir = TempDir::new().unwrap();
    write_deck(
        temp_dir.path(),
        "sched.inc",
        "START\n1 JAN 1990 /\nCOMPDAT\n'P1' 2 3 1 1 /\n/\n",
    );
    let deck = write_deck(
        temp_dir.path(),
        "CASE.DATA",
        "START\n1 JAN 2000 /\nSCHEDULE\nINCLUDE\nsched.inc /\n",
    );

    let log = parse_deck(&deck).unwrap();
    assert_eq!(log.dates(), vec!["1 JAN 2000"]);
    assert_eq!(log.records("COMPDAT").count(), 1);
}

#[test]
fn test_nested_includes_relative_to_including_file() {
    let temp_dir = TempDir::new().unwrap();
    write_deck(
        temp_dir.path(),
        "include/wells.inc",
        "INCLUDE\n'deeper/comp.inc' /\n",
    );
    write_deck(
        temp_dir.path(),
        "include/deeper/comp.inc",
        "COMPDAT\n'P1' 2 3 1 1 /\n/\n",
    );
    let deck = write_deck(
        temp_dir.path(),
        "CASE.DATA",
        "SCHEDULE\nINCLUDE\n'include/wells.inc' /\n",
    );

    let log = parse_deck(&deck).unwrap();
    assert_eq!(log.records("COMPDAT").count(), 1);
}

#[test]
fn test_path_variable_substitution() {
    let temp_dir = TempDir::new().unwrap();
    write_deck(
        temp_dir.path(),
        "root/sub/file.inc",
        "WCONPROD\n'P1' 'OPEN' 'ORAT' 1000 /\n/\n",
    );
    let deck = write_deck(
        temp_dir.path(),
        "CASE.DATA",
        "PATHS\n'INC' 'sub' /\n/\nSCHEDULE\nINCLUDE\n'root/$INC/file.inc' /\n",
    );

    let log = parse_deck(&deck).unwrap();
    let fields = log.records("WCONPROD").next().unwrap();
    assert_eq!(fields.len(), 20);
    assert_eq!(fields[0], "'P1'");
}

#[test]
fn test_path_variables_visible_in_nested_includes() {
    let temp_dir = TempDir::new().unwrap();
    write_deck(temp_dir.path(), "a.inc", "INCLUDE\n'$DIR/b.inc' /\n");
    write_deck(temp_dir.path(), "lib/b.inc", "WELSPECS\n'P9' 'G1' 1 1 /\n/\n");
    let deck = write_deck(
        temp_dir.path(),
        "CASE.DATA",
        "PATHS\n'DIR' 'lib' /\n/\nSCHEDULE\nINCLUDE\n'a.inc' /\n",
    );

    let log = parse_deck(&deck).unwrap();
    assert_eq!(log.records("WELSPECS").count(), 1);
}

#[test]
fn test_same_file_included_twice() {
    let temp_dir = TempDir::new().unwrap();
    write_deck(temp_dir.path(), "w.inc", "WELSPECS\n'P1' 'G1' 1 1 /\n/\n");
    let deck = write_deck(
        temp_dir.path(),
        "CASE.DATA",
        "SCHEDULE\nINCLUDE\n'w.inc' /\nDATES\n1 FEB 2000 /\n/\nINCLUDE\n'w.inc' /\n",
    );

    let log = parse_deck(&deck).unwrap();
    let parsed = events(&log);
    assert_eq!(parsed.len(), 4);
    assert_eq!(
        parsed[3],
        record(
            "WELSPECS",
            &[
                "'P1'", "'G1'", "1", "1", "1*", "1*", "1*", "1*", "1*", "1*", "1*", "1*", "1*",
                "1*", "1*", "1*", "1*"
            ]
        )
    );
}

#[test]
fn test_windows_separators_in_include() {
    let temp_dir = TempDir::new().unwrap();
    write_deck(temp_dir.path(), "inc/w.inc", "WELSPECS\n'P1' 'G1' 1 1 /\n/\n");
    let deck = write_deck(
        temp_dir.path(),
        "CASE.DATA",
        "SCHEDULE\nINCLUDE\n'inc\\w.inc' /\n",
    );

    let log = parse_deck(&deck).unwrap();
    assert_eq!(log.records("WELSPECS").count(), 1);
}

#[test]
fn test_unquoted_target_with_directory() {
    let temp_dir = TempDir::new().unwrap();
    write_deck(temp_dir.path(), "inc/w.inc", "WELSPECS\n'P1' 'G1' 2 3 /\n/\n");
    let deck = write_deck(temp_dir.path(), "CASE.DATA", "SCHEDULE\nINCLUDE\ninc/w.inc /\n");

    let log = parse_deck(&deck).unwrap();
    assert_eq!(log.records("WELSPECS").count(), 1);
}

#[test]
fn test_unquoted_variable_target_with_file_name() {
    let temp_dir = TempDir::new().unwrap();
    write_deck(temp_dir.path(), "sched/wells/comp.inc", "COMPDAT\n'P1' 2 3 1 1 /\n/\n");
    let deck = write_deck(
        temp_dir.path(),
        "CASE.DATA",
        "PATHS\n'WELLS' 'sched/wells' /\n/\nSCHEDULE\nINCLUDE\n$WELLS/comp.inc / -- completions\n",
    );

    let log = parse_deck(&deck).unwrap();
    assert_eq!(log.records("COMPDAT").count(), 1);
}

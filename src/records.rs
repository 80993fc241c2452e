//! Record line tokenization.
//!
//! Splits a data line at its `/` terminator, tokenizes it on whitespace,
//! expands `N*` repeat shorthand into placeholders and pads records to a
//! keyword's item count. Quoted strings are kept whole.

use crate::constants::{COMMENT_PREFIX, MAX_RECORD_ITEMS, PLACEHOLDER, TERMINATOR};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

static REPEAT_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\*$").expect("valid repeat regex"));

/// Byte offset of the first `/` outside quotes
pub fn terminator_position(line: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, c) in line.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, TERMINATOR) => return Some(idx),
            (None, _) => {}
        }
    }
    None
}

/// Text before the terminator (or the whole line when there is none)
pub fn record_body(line: &str) -> &str {
    match terminator_position(line) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Text before a path record's terminator
///
/// File names contain `/`, so only a `/` outside quotes that ends the line or
/// is followed by whitespace terminates the record.
pub fn path_record_body(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut chars = line.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, TERMINATOR)
                if chars.peek().is_none_or(|(_, next)| next.is_whitespace()) =>
            {
                return &line[..idx];
            }
            (None, _) => {}
        }
    }
    line
}

/// Whitespace tokenizer that keeps quoted strings as one token
pub fn tokenize(body: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in body.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => {
                if c == '\'' || c == '"' {
                    quote = Some(c);
                }
                current.push(c);
            }
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Expand `N*` tokens into N placeholders, never growing past `max_items`
///
/// `0*` is not a repeat count and is kept verbatim. A repeat that would
/// overflow `max_items` is cut to the room left.
pub fn expand_repeats(tokens: Vec<String>, max_items: usize) -> Vec<String> {
    let mut expanded = Vec::with_capacity(tokens.len().min(max_items));
    for token in tokens {
        let count = REPEAT_DEFAULT
            .captures(&token)
            .and_then(|caps| caps[1].parse::<usize>().ok());
        match count {
            Some(0) => {
                warn!("Repeat count '{}' is not positive, keeping it verbatim", token);
                expanded.push(token);
            }
            Some(n) => {
                let room = max_items.saturating_sub(expanded.len());
                if n > room {
                    warn!(
                        "Repeat count '{}' exceeds the {} items left in the record",
                        token, room
                    );
                }
                expanded.extend(std::iter::repeat_n(PLACEHOLDER.to_string(), n.min(room)));
            }
            None => expanded.push(token),
        }
    }
    expanded
}

/// Right-pad with placeholders up to `width`
pub fn pad_to(fields: &mut Vec<String>, width: usize) {
    if fields.len() < width {
        fields.resize(width, PLACEHOLDER.to_string());
    }
}

/// Tokenize and expand one record line (terminator and trailing comment dropped)
pub fn parse_record_line(line: &str) -> Vec<String> {
    expand_repeats(tokenize(record_body(line)), MAX_RECORD_ITEMS)
}

/// Blank lines and `--` comments carry no data
pub fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX)
}

/// A line whose first character is `/` closes a block
pub fn is_block_terminator(line: &str) -> bool {
    line.trim_start().starts_with(TERMINATOR)
}

/// Remove one pair of surrounding single or double quotes
pub fn strip_quotes(value: &str) -> &str {
    let trimmed = value.trim();
    trimmed
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .or_else(|| trimmed.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_expands_to_placeholders() {
        let fields = parse_record_line("'P1' 3* 'OIL' /");
        assert_eq!(fields, vec!["'P1'", "1*", "1*", "1*", "'OIL'"]);
    }

    #[test]
    fn test_single_placeholder_stays_single() {
        assert_eq!(parse_record_line("1* 2 /"), vec!["1*", "2"]);
    }

    #[test]
    fn test_zero_repeat_kept_verbatim() {
        assert_eq!(parse_record_line("'P1' 0* 5 /"), vec!["'P1'", "0*", "5"]);
    }

    #[test]
    fn test_huge_repeat_is_bounded() {
        let fields = parse_record_line("'P1' 4000000000* 1 /");
        assert_eq!(fields.len(), MAX_RECORD_ITEMS + 1);
        assert_eq!(fields.last().map(String::as_str), Some("1"));

        let fixed = expand_repeats(tokenize("'P1' 30000000* 1"), 14);
        assert_eq!(fixed.len(), 15);
        assert!(fixed[1..14].iter().all(|f| f == PLACEHOLDER));
    }

    #[test]
    fn test_value_repeat_is_not_a_placeholder() {
        assert_eq!(parse_record_line("3*250 /"), vec!["3*250"]);
    }

    #[test]
    fn test_comment_after_terminator_dropped() {
        assert_eq!(
            parse_record_line("'P1' 'G1' 2 3 / producer -- north"),
            vec!["'P1'", "'G1'", "2", "3"]
        );
    }

    #[test]
    fn test_quoted_tokens_keep_spaces_and_slashes() {
        let line = "'WELL 1' 'a/b' 4 /";
        assert_eq!(terminator_position(line), Some(line.len() - 1));
        assert_eq!(parse_record_line(line), vec!["'WELL 1'", "'a/b'", "4"]);
    }

    #[test]
    fn test_path_body_keeps_directory_separators() {
        assert_eq!(path_record_body("inc/w.inc /"), "inc/w.inc ");
        assert_eq!(path_record_body("$INC/w.inc / -- wells"), "$INC/w.inc ");
        assert_eq!(path_record_body("w.inc/"), "w.inc");
        assert_eq!(path_record_body("'a/ b' /"), "'a/ b' ");
        assert_eq!(path_record_body("inc/w.inc"), "inc/w.inc");
    }

    #[test]
    fn test_pad_to_width() {
        let mut fields = parse_record_line("'P1' 1 2 3 4 /");
        pad_to(&mut fields, 14);
        assert_eq!(fields.len(), 14);
        assert!(fields[5..].iter().all(|f| f == PLACEHOLDER));

        let mut long = vec!["a".to_string(); 3];
        pad_to(&mut long, 2);
        assert_eq!(long.len(), 3);
    }

    #[test]
    fn test_line_classification() {
        assert!(is_skippable("   "));
        assert!(is_skippable("-- comment"));
        assert!(!is_skippable("'P1' /"));
        assert!(is_block_terminator("  / -- end"));
        assert!(!is_block_terminator("'P1' /"));
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("'P1'"), "P1");
        assert_eq!(strip_quotes("\"G1\""), "G1");
        assert_eq!(strip_quotes("OPEN"), "OPEN");
        assert_eq!(strip_quotes("'"), "'");
    }
}

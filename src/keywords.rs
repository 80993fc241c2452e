//! Keyword grammar table.
//!
//! Every keyword line is classified once into a [`KeywordKind`], which tells
//! the parser which sub-grammar reads the block that follows.

use crate::constants::{
    FIXED_RECORD_KEYWORDS, GENERIC_KEYWORD_PREFIXES, INCLUDE_KEYWORD, MAX_KEYWORD_LENGTH,
    ONE_LINE_KEYWORDS, THREE_RECORD_KEYWORDS, TOGGLE_KEYWORDS, VFP_INJECTION_KEYWORD,
    VFP_PRODUCTION_KEYWORD,
};

/// Block grammar for a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
    /// One date per line until a `/` line
    Dates,
    /// One record per line, padded to a fixed item count
    Fixed(usize),
    /// Next line names another deck file
    Include,
    /// No data, no terminator
    Toggle,
    /// Exactly one record line
    OneLine,
    /// Exactly three record lines
    ThreeRecord,
    /// Completion/well/group/user keyword with unknown width, padded per block
    Generic,
    /// Nested VFP table kept as raw text
    VfpTable(VfpFlavor),
    /// Not modelled; the line is skipped
    Unknown,
}

/// Which VFP layout governs the table body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VfpFlavor {
    Production,
    Injection,
}

impl KeywordKind {
    /// Classify the first token of a line.
    ///
    /// Exact table entries win over the generic C/W/G/U family; anything that
    /// is not keyword-shaped or not in a known family is `Unknown`.
    pub fn classify(token: &str) -> Self {
        let name = token.to_ascii_uppercase();

        if name == "DATES" {
            return KeywordKind::Dates;
        }
        if name == INCLUDE_KEYWORD {
            return KeywordKind::Include;
        }
        if let Some((_, count)) = FIXED_RECORD_KEYWORDS.iter().find(|(kw, _)| *kw == name) {
            return KeywordKind::Fixed(*count);
        }
        if TOGGLE_KEYWORDS.contains(&name.as_str()) {
            return KeywordKind::Toggle;
        }
        if ONE_LINE_KEYWORDS.contains(&name.as_str()) {
            return KeywordKind::OneLine;
        }
        if THREE_RECORD_KEYWORDS.contains(&name.as_str()) {
            return KeywordKind::ThreeRecord;
        }
        if name == VFP_PRODUCTION_KEYWORD {
            return KeywordKind::VfpTable(VfpFlavor::Production);
        }
        if name == VFP_INJECTION_KEYWORD {
            return KeywordKind::VfpTable(VfpFlavor::Injection);
        }
        if is_keyword_shaped(&name)
            && name
                .chars()
                .next()
                .is_some_and(|c| GENERIC_KEYWORD_PREFIXES.contains(&c))
        {
            return KeywordKind::Generic;
        }

        KeywordKind::Unknown
    }
}

/// A keyword is 1-8 ASCII letters, digits or underscores, starting with a letter
pub fn is_keyword_shaped(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    token.len() <= MAX_KEYWORD_LENGTH
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

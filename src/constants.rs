//! Constants for schedule deck parsing
//!
//! Marker keywords, the placeholder literal, calendar codes and the
//! keyword families recognized by the parser.

// =============================================================================
// Deck Markers
// =============================================================================

/// Canonical placeholder token for a defaulted value
pub const PLACEHOLDER: &str = "1*";

/// Upper bound on the items of a record whose keyword has no fixed count
pub const MAX_RECORD_ITEMS: usize = 256;

/// Start date used when neither the caller nor the deck provides one
pub const DEFAULT_START_DATE: &str = "01 JAN 1900";

/// Line comment prefix
pub const COMMENT_PREFIX: &str = "--";

/// Record and block terminator
pub const TERMINATOR: char = '/';

/// Section and header keywords scanned in the root deck
pub const START_KEYWORD: &str = "START";
pub const PATHS_KEYWORD: &str = "PATHS";
pub const SCHEDULE_KEYWORD: &str = "SCHEDULE";

/// Include keyword and path variable sigil
pub const INCLUDE_KEYWORD: &str = "INCLUDE";
pub const PATH_VARIABLE_SIGIL: char = '$';

/// Longest keyword name the format allows
pub const MAX_KEYWORD_LENGTH: usize = 8;

// =============================================================================
// Calendar
// =============================================================================

/// Month codes accepted in DATES and START records (JLY and JUL both mean July)
pub const MONTHS: &[(&str, u32)] = &[
    ("JAN", 1),
    ("FEB", 2),
    ("MAR", 3),
    ("APR", 4),
    ("MAY", 5),
    ("JUN", 6),
    ("JLY", 7),
    ("JUL", 7),
    ("AUG", 8),
    ("SEP", 9),
    ("OCT", 10),
    ("NOV", 11),
    ("DEC", 12),
];

// =============================================================================
// Keyword Families
// =============================================================================

/// Keywords with a fixed number of items per record
pub const FIXED_RECORD_KEYWORDS: &[(&str, usize)] = &[
    ("COMPDAT", 14),
    ("COMPDATL", 15),
    ("COMPDATM", 15),
    ("WELSPECS", 17),
    ("WELSPECL", 18),
    ("WELLSPEC", 7),
    ("WCONPROD", 20),
    ("WCONHIST", 12),
    ("WCONINJE", 15),
    ("WCONINJH", 12),
];

/// Keywords that take no data at all
pub const TOGGLE_KEYWORDS: &[&str] = &[
    "ECHO", "NOECHO", "SKIP", "SKIP100", "SKIP300", "ENDSKIP", "NOWARN", "WARN", "RPTONLY",
    "RPTONLYO", "NOSIM", "END",
];

/// Keywords followed by exactly one record line
pub const ONE_LINE_KEYWORDS: &[&str] = &[
    "NEXTSTEP", "NEXTSTPL", "NEXT", "GCONTOL", "NUPCOL", "DRSDT", "DRVDT", "DRSDTR", "DRVDTR",
    "RPTSCHED", "RPTRST", "TSTEP", "MESSAGES", "PRIORITY",
];

/// Keywords followed by exactly three record lines
pub const THREE_RECORD_KEYWORDS: &[&str] = &["TUNING"];

/// Vertical flow performance tables with nested record structure
pub const VFP_PRODUCTION_KEYWORD: &str = "VFPPROD";
pub const VFP_INJECTION_KEYWORD: &str = "VFPINJ";

/// First letters of completion, well, group and user keywords read generically
pub const GENERIC_KEYWORD_PREFIXES: &[char] = &['C', 'W', 'G', 'U'];

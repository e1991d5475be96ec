// ScanLogs - core/line.rs
//
// Line classification: tags each trimmed, non-empty report line with its
// structural role. Pure function of the line plus whether the parser is
// currently inside a CSV block.

use crate::util::constants::{
    BLOCK_SEPARATOR_PREFIX, COURSE_HEADER_PREFIX, CSV_HEADER_FIRST_COLUMN,
    EXPORTED_HEADER_PREFIX,
};
use regex::Regex;
use std::sync::OnceLock;

/// Which header a `Header` line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    Course,
    Exported,
}

/// Structural role of one report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `Course Name: <value>` or `Exported on: <value>`; value is trimmed.
    Header { kind: HeaderKind, value: &'a str },

    /// `url,<col2>,...`; columns are trimmed and lower-cased.
    CsvHeader(Vec<String>),

    /// A line starting with `"--- "`.
    Separator,

    /// A line outside a CSV block that starts with `scheme://`,
    /// split on commas and trimmed.
    FreeformRow(Vec<&'a str>),

    /// Any other line inside a CSV block, split on commas and trimmed.
    PlainCsvRow(Vec<&'a str>),

    /// Anything else outside a CSV block. Carries no data.
    Other,
}

fn url_prefix() -> &'static Regex {
    static URL_PREFIX: OnceLock<Regex> = OnceLock::new();
    URL_PREFIX.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("url prefix regex is valid")
    })
}

/// Split on commas and trim each token.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

/// Classify one line. `line` must already be trimmed and non-empty; blank
/// lines are discarded by the caller before classification.
///
/// Check order matters: headers win over everything, then the CSV header,
/// then the block separator, then the row shapes.
pub fn classify(line: &str, in_csv_block: bool) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix(COURSE_HEADER_PREFIX) {
        return LineKind::Header {
            kind: HeaderKind::Course,
            value: rest.trim(),
        };
    }
    if let Some(rest) = line.strip_prefix(EXPORTED_HEADER_PREFIX) {
        return LineKind::Header {
            kind: HeaderKind::Exported,
            value: rest.trim(),
        };
    }

    let first_token = line.split(',').next().unwrap_or("").trim();
    if first_token.eq_ignore_ascii_case(CSV_HEADER_FIRST_COLUMN) {
        let columns = split_fields(line)
            .into_iter()
            .map(str::to_lowercase)
            .collect();
        return LineKind::CsvHeader(columns);
    }

    if line.starts_with(BLOCK_SEPARATOR_PREFIX) {
        return LineKind::Separator;
    }

    if in_csv_block {
        LineKind::PlainCsvRow(split_fields(line))
    } else if url_prefix().is_match(line) {
        LineKind::FreeformRow(split_fields(line))
    } else {
        LineKind::Other
    }
}

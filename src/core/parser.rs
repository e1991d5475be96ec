// ScanLogs - core/parser.rs
//
// Report text parsing. Consumes classified lines, tracks the current
// course / export-timestamp context, and emits one ScanRecord per data row.
// Core layer: accepts the already-fetched report text, never touches the
// filesystem. Never fails: malformed rows degrade to sparse records.

use crate::core::label;
use crate::core::line::{classify, HeaderKind, LineKind};
use crate::core::model::{RawFields, ReportMarker, ScanRecord};
use crate::util::logging::preview;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Keywords that mark a freeform tail token as the row's label.
/// Substring match, so "phishing" and "unsafe" are covered.
const FREEFORM_LABEL_HINTS: &[&str] = &[
    "benign",
    "safe",
    "suspicious",
    "phish",
    "malware",
    "malicious",
    "adult",
];

/// Parser state: either between blocks or inside a CSV table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ParserState {
    #[default]
    Idle,
    InCsvBlock,
}

/// Result of parsing one report text.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    /// Records in parse order (not yet sorted).
    pub records: Vec<ScanRecord>,
    /// Block separator lines, in order of appearance.
    pub markers: Vec<ReportMarker>,
    /// Non-blank lines seen.
    pub lines_processed: usize,
    /// Rows produced from CSV tables.
    pub csv_rows: usize,
    /// Rows produced from freeform URL lines.
    pub freeform_rows: usize,
    /// Lines outside any CSV block that carried no recognisable data.
    pub ignored_lines: usize,
    /// `Exported on:` headers whose timestamp could not be parsed.
    pub timestamp_failures: usize,
}

/// Stateful line-by-line parser for report exports.
#[derive(Debug, Default)]
pub struct LogTextParser {
    state: ParserState,
    current_course: String,
    current_exported: String,
    current_exported_at: Option<DateTime<Utc>>,
    header_columns: Vec<String>,
    outcome: ParseOutcome,
}

impl LogTextParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw line. Blank lines are discarded here.
    pub fn parse_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        self.outcome.lines_processed += 1;

        // A header or separator inside a CSV block closes the block and is
        // then handled again as the first line of the next block.
        loop {
            let in_csv = self.state == ParserState::InCsvBlock;
            match classify(line, in_csv) {
                LineKind::Header { .. } | LineKind::Separator if in_csv => {
                    tracing::trace!(line = preview(line), "CSV block closed");
                    self.state = ParserState::Idle;
                }
                kind => {
                    self.apply(kind, line);
                    break;
                }
            }
        }
    }

    /// Finish the pass and hand back everything produced.
    pub fn finish(self) -> ParseOutcome {
        self.outcome
    }

    fn apply(&mut self, kind: LineKind<'_>, line: &str) {
        match kind {
            LineKind::Header {
                kind: HeaderKind::Course,
                value,
            } => {
                self.current_course = value.to_string();
            }
            LineKind::Header {
                kind: HeaderKind::Exported,
                value,
            } => {
                self.current_exported = value.to_string();
                self.current_exported_at = parse_export_timestamp(value);
                if self.current_exported_at.is_none() && !value.is_empty() {
                    self.outcome.timestamp_failures += 1;
                    tracing::warn!(
                        raw = preview(value),
                        "Unparsable export timestamp; rows will sort last"
                    );
                }
            }
            LineKind::CsvHeader(columns) => {
                tracing::debug!(columns = ?columns, "CSV header");
                self.header_columns = columns;
                self.state = ParserState::InCsvBlock;
            }
            LineKind::Separator => {
                self.outcome.markers.push(parse_marker(line));
            }
            LineKind::PlainCsvRow(values) => {
                let raw = self.zip_csv_row(&values);
                self.emit(&raw);
                self.outcome.csv_rows += 1;
            }
            LineKind::FreeformRow(parts) => {
                let raw = freeform_fields(&parts);
                self.emit(&raw);
                self.outcome.freeform_rows += 1;
            }
            LineKind::Other => {
                self.outcome.ignored_lines += 1;
                tracing::trace!(line = preview(line), "Line ignored");
            }
        }
    }

    /// Zip a data row against the header columns. Missing trailing values
    /// read as empty; values beyond the header width are dropped.
    fn zip_csv_row(&self, values: &[&str]) -> RawFields {
        if values.len() != self.header_columns.len() {
            tracing::debug!(
                expected = self.header_columns.len(),
                found = values.len(),
                "CSV row width differs from header"
            );
        }
        self.header_columns
            .iter()
            .enumerate()
            .map(|(idx, col)| (col.clone(), values.get(idx).copied().unwrap_or("")))
            .collect()
    }

    fn emit(&mut self, raw: &RawFields) {
        let normalized = label::normalize(raw);
        let confidence = raw.get("confidence");
        let record = ScanRecord {
            course: self.current_course.clone(),
            exported: self.current_exported.clone(),
            exported_at: self.current_exported_at,
            url: raw.get("url").to_string(),
            raw_label: label::display_label(raw, normalized),
            normalized_label: normalized,
            confidence: (!confidence.is_empty()).then(|| confidence.to_string()),
            source: raw.get("source").to_string(),
            author: raw
                .first_non_empty(&["authorusername", "author", "authorname"])
                .to_string(),
        };
        self.outcome.records.push(record);
    }
}

/// Parse a whole report text in one pass.
pub fn parse_report(text: &str) -> ParseOutcome {
    let mut parser = LogTextParser::new();
    for line in text.lines() {
        parser.parse_line(line);
    }
    let outcome = parser.finish();

    tracing::debug!(
        lines = outcome.lines_processed,
        records = outcome.records.len(),
        csv_rows = outcome.csv_rows,
        freeform_rows = outcome.freeform_rows,
        ignored = outcome.ignored_lines,
        blocks = outcome.markers.len(),
        timestamp_failures = outcome.timestamp_failures,
        "Report parsed"
    );
    outcome
}

// =============================================================================
// Freeform rows
// =============================================================================

fn numeric_token() -> &'static Regex {
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    NUMERIC.get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("numeric regex is valid"))
}

/// Build raw fields for `<url>, <label>, <confidence>, <source>, <author>`.
///
/// The label is the first tail token containing a label keyword and the
/// confidence the last purely numeric tail token, wherever they sit.
/// Source and author are the two tokens following the confidence; without
/// a confidence they are read from their usual positions.
fn freeform_fields(parts: &[&str]) -> RawFields {
    let mut raw = RawFields::new();
    raw.insert("url", parts.first().copied().unwrap_or(""));
    let tail = parts.get(1..).unwrap_or(&[]);

    let lowered: Vec<String> = tail.iter().map(|p| p.to_lowercase()).collect();
    if let Some(label) = lowered
        .iter()
        .find(|t| FREEFORM_LABEL_HINTS.iter().any(|k| t.contains(k)))
    {
        raw.insert("pred_label", label.as_str());
    }
    let conf_idx = tail.iter().rposition(|t| numeric_token().is_match(t));
    if let Some(idx) = conf_idx {
        raw.insert("confidence", tail[idx]);
    }
    let source_idx = conf_idx.map_or(2, |idx| idx + 1);
    if let Some(source) = tail.get(source_idx) {
        raw.insert("source", *source);
    }
    if let Some(author) = tail.get(source_idx + 1) {
        raw.insert("author", *author);
    }
    raw
}

// =============================================================================
// Separator markers
// =============================================================================

fn marker_pattern() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"Report\s+(\S+)\s+\(([^)]+)\)").expect("marker regex is valid")
    })
}

/// Extract `Report <id> (<date>)` from a separator line when present.
pub fn parse_marker(line: &str) -> ReportMarker {
    let caps = marker_pattern().captures(line);
    ReportMarker {
        id: caps
            .as_ref()
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string()),
        date: caps
            .as_ref()
            .and_then(|c| c.get(2))
            .map(|m| m.as_str().trim().to_string()),
        line: line.trim().to_string(),
    }
}

// =============================================================================
// Timestamp parsing
// =============================================================================

/// Parse an `Exported on:` value. Naive timestamps are taken as UTC.
///
/// Strategy:
///   1. RFC 3339 (explicit offset).
///   2. `YYYY-MM-DD HH:MM[:SS[.fff]]`, after normalising `/` to `-` and
///      `T` to a space.
///   3. Date only, as midnight.
///
/// Returns `None` when nothing matches; callers sort such rows last.
pub fn parse_export_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.into());
    }

    let normalised = trimmed.replace('/', "-").replace('T', " ");
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(&normalised, format) {
            return Some(ndt.and_utc());
        }
    }

    NaiveDate::parse_from_str(&normalised, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}

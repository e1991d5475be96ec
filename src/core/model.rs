// ScanLogs - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Scan record (normalised output of parsing)
// =============================================================================

/// A single scanned URL from a report export, normalised across the CSV and
/// freeform report shapes.
///
/// Records are built once per parse pass and never mutated afterwards. They
/// carry no identity beyond their field values; duplicates are legal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanRecord {
    /// Course named by the most recent `Course Name:` header (may be empty).
    pub course: String,

    /// Export timestamp text exactly as it appeared in the header.
    pub exported: String,

    /// Parsed export timestamp. `None` if absent or unparsable; such records
    /// sort as if exported at the Unix epoch.
    pub exported_at: Option<DateTime<Utc>>,

    /// Scanned URL (may be empty for malformed CSV rows).
    pub url: String,

    /// Best available original status text, uppercased for display.
    pub raw_label: String,

    /// Canonical category.
    pub normalized_label: Label,

    /// Confidence as written in the report. Parsed numerically only when
    /// filtering.
    pub confidence: Option<String>,

    /// Where the URL was collected from (may be empty).
    pub source: String,

    /// Who posted the URL (may be empty).
    pub author: String,
}

impl ScanRecord {
    /// Timestamp used for ordering and date filtering.
    pub fn sort_key(&self) -> DateTime<Utc> {
        self.exported_at.unwrap_or_default()
    }

    /// Numeric confidence, using the same leading-number rule as the
    /// minimum-confidence filter input.
    pub fn confidence_value(&self) -> Option<f64> {
        self.confidence.as_deref().and_then(parse_number_prefix)
    }
}

// =============================================================================
// Label
// =============================================================================

/// The closed label taxonomy every record is classified into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    #[default]
    Benign,
    Suspicious,
    Phish,
    Malware,
    Adult,
}

impl Label {
    /// Returns all variants in display order.
    pub fn all() -> &'static [Label] {
        &[
            Label::Benign,
            Label::Suspicious,
            Label::Phish,
            Label::Malware,
            Label::Adult,
        ]
    }

    /// Lower-case identifier, as used in filter selections.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Benign => "benign",
            Label::Suspicious => "suspicious",
            Label::Phish => "phish",
            Label::Malware => "malware",
            Label::Adult => "adult",
        }
    }

    /// Parse a lower-case identifier (case-insensitive, trimmed).
    pub fn from_name(name: &str) -> Option<Label> {
        let name = name.trim().to_lowercase();
        Label::all().iter().copied().find(|l| l.as_str() == name)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Label counts
// =============================================================================

/// Per-category record counts for the summary row above the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub benign: usize,
    pub suspicious: usize,
    pub phish: usize,
    pub malware: usize,
    pub adult: usize,
}

impl LabelCounts {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ScanRecord>,
    {
        let mut counts = Self::default();
        for record in records {
            counts.add(record.normalized_label);
        }
        counts
    }

    pub fn add(&mut self, label: Label) {
        match label {
            Label::Benign => self.benign += 1,
            Label::Suspicious => self.suspicious += 1,
            Label::Phish => self.phish += 1,
            Label::Malware => self.malware += 1,
            Label::Adult => self.adult += 1,
        }
    }

    pub fn get(&self, label: Label) -> usize {
        match label {
            Label::Benign => self.benign,
            Label::Suspicious => self.suspicious,
            Label::Phish => self.phish,
            Label::Malware => self.malware,
            Label::Adult => self.adult,
        }
    }

    pub fn total(&self) -> usize {
        self.benign + self.suspicious + self.phish + self.malware + self.adult
    }
}

// =============================================================================
// Raw fields (parser -> normaliser hand-off)
// =============================================================================

/// Field mapping for one data row before normalisation.
///
/// Keys are lower-cased column names (CSV rows) or the synthetic keys the
/// freeform heuristics fill in. Missing keys read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    fields: HashMap<String, String>,
}

impl RawFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, trimmed; empty if the field is absent.
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(|v| v.trim()).unwrap_or("")
    }

    /// First non-empty value among `keys`, in order.
    pub fn first_non_empty(&self, keys: &[&str]) -> &str {
        keys.iter()
            .map(|k| self.get(k))
            .find(|v| !v.is_empty())
            .unwrap_or("")
    }

    pub fn has(&self, key: &str) -> bool {
        !self.get(key).is_empty()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawFields {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut raw = RawFields::new();
        for (k, v) in iter {
            raw.insert(k, v);
        }
        raw
    }
}

// =============================================================================
// Report marker
// =============================================================================

/// A block separator line (`--- Report 46 (2025-11-07) ---`), kept so the
/// separator's content survives parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMarker {
    /// Report identifier, when the line follows the `Report <id> (<date>)` shape.
    pub id: Option<String>,

    /// Date text inside the parentheses, when present.
    pub date: Option<String>,

    /// The full trimmed separator line.
    pub line: String,
}

// =============================================================================
// Number parsing
// =============================================================================

/// Parse the longest numeric prefix of `text` (after leading whitespace).
///
/// `"0.93"` -> 0.93, `"87%"` -> 87.0, `".5"` -> 0.5, `"high"` -> None.
/// Used for both record confidences and the minimum-confidence input so
/// the two sides of the comparison read numbers the same way.
pub fn parse_number_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when followed by at least one digit.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: Label, confidence: Option<&str>) -> ScanRecord {
        ScanRecord {
            course: "CS101".to_string(),
            exported: String::new(),
            exported_at: None,
            url: "http://a.com".to_string(),
            raw_label: label.as_str().to_uppercase(),
            normalized_label: label,
            confidence: confidence.map(str::to_string),
            source: String::new(),
            author: String::new(),
        }
    }

    #[test]
    fn test_label_from_name_is_case_insensitive() {
        assert_eq!(Label::from_name(" PHISH "), Some(Label::Phish));
        assert_eq!(Label::from_name("adult"), Some(Label::Adult));
        assert_eq!(Label::from_name("phishing"), None);
    }

    #[test]
    fn test_label_default_is_benign() {
        assert_eq!(Label::default(), Label::Benign);
    }

    #[test]
    fn test_label_serialises_lowercase() {
        let json = serde_json::to_string(&Label::Malware).unwrap();
        assert_eq!(json, "\"malware\"");
    }

    #[test]
    fn test_sort_key_defaults_to_epoch() {
        let r = record(Label::Benign, None);
        assert_eq!(r.sort_key().timestamp(), 0);
    }

    #[test]
    fn test_label_counts() {
        let records = vec![
            record(Label::Phish, None),
            record(Label::Phish, None),
            record(Label::Adult, None),
            record(Label::Benign, None),
        ];
        let counts = LabelCounts::from_records(&records);
        assert_eq!(counts.phish, 2);
        assert_eq!(counts.adult, 1);
        assert_eq!(counts.get(Label::Benign), 1);
        assert_eq!(counts.malware, 0);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_raw_fields_missing_key_reads_empty() {
        let raw: RawFields = [("url", " http://a.com "), ("label", "")]
            .into_iter()
            .collect();
        assert_eq!(raw.get("url"), "http://a.com");
        assert_eq!(raw.get("label"), "");
        assert_eq!(raw.get("nope"), "");
        assert!(!raw.has("label"));
        assert_eq!(raw.first_non_empty(&["label", "url"]), "http://a.com");
    }

    #[test]
    fn test_parse_number_prefix() {
        assert_eq!(parse_number_prefix("0.93"), Some(0.93));
        assert_eq!(parse_number_prefix("  87%"), Some(87.0));
        assert_eq!(parse_number_prefix(".5"), Some(0.5));
        assert_eq!(parse_number_prefix("-2"), Some(-2.0));
        assert_eq!(parse_number_prefix("1e3x"), Some(1000.0));
        assert_eq!(parse_number_prefix("3e"), Some(3.0));
        assert_eq!(parse_number_prefix("high"), None);
        assert_eq!(parse_number_prefix(""), None);
        assert_eq!(parse_number_prefix("-"), None);
        assert_eq!(parse_number_prefix("."), None);
    }

    #[test]
    fn test_confidence_value() {
        assert_eq!(record(Label::Benign, Some("0.7")).confidence_value(), Some(0.7));
        assert_eq!(record(Label::Benign, Some("n/a")).confidence_value(), None);
        assert_eq!(record(Label::Benign, None).confidence_value(), None);
    }
}

// ScanLogs - core/filter.rs
//
// Composable filter engine for scan records.
// All active filters are AND-combined.
// Core layer: pure logic, no I/O dependencies.

use crate::core::model::{parse_number_prefix, Label, ScanRecord};
use crate::util::error::FilterError;
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Selection value meaning "no restriction" in the course and label pickers.
pub const ALL: &str = "all";

/// Complete filter state. All fields are AND-combined when applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Exact course to include. None = all courses.
    pub course: Option<String>,

    /// Normalised label to include. None = all labels.
    pub label: Option<Label>,

    /// First day included (from 00:00:00). None = no lower bound.
    pub date_from: Option<NaiveDate>,

    /// Last day included (up to 23:59:59.999). None = no upper bound.
    pub date_to: Option<NaiveDate>,

    /// Case-insensitive substring matched against the URL. Empty = no filter.
    pub url_search: String,

    /// Minimum numeric confidence. None = no threshold.
    pub min_confidence: Option<f64>,
}

impl FilterState {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.course.is_none()
            && self.label.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.url_search.trim().is_empty()
            && self.min_confidence.is_none()
    }

    /// Set the course from a selector value; `"all"` or empty clears it.
    pub fn set_course(&mut self, value: &str) {
        let value = value.trim();
        self.course = if value.is_empty() || value == ALL {
            None
        } else {
            Some(value.to_string())
        };
    }

    /// Set the label from a selector value; `"all"` or empty clears it.
    pub fn set_label(&mut self, value: &str) -> Result<(), FilterError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            self.label = None;
            return Ok(());
        }
        let label = Label::from_name(trimmed).ok_or_else(|| FilterError::UnknownLabel {
            value: value.to_string(),
        })?;
        self.label = Some(label);
        Ok(())
    }

    /// Set the lower date bound from `YYYY-MM-DD`; empty clears it.
    pub fn set_date_from(&mut self, value: &str) -> Result<(), FilterError> {
        self.date_from = parse_date_input(value)?;
        Ok(())
    }

    /// Set the upper date bound from `YYYY-MM-DD`; empty clears it.
    pub fn set_date_to(&mut self, value: &str) -> Result<(), FilterError> {
        self.date_to = parse_date_input(value)?;
        Ok(())
    }

    pub fn set_url_search(&mut self, value: &str) {
        self.url_search = value.trim().to_string();
    }

    /// Set the minimum confidence from free text. Text that does not start
    /// with a number clears the threshold rather than failing.
    pub fn set_min_confidence(&mut self, value: &str) {
        self.min_confidence = parse_number_prefix(value);
    }

    /// Inclusive lower bound as an instant.
    fn from_instant(&self) -> Option<DateTime<Utc>> {
        self.date_from
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|ndt| ndt.and_utc())
    }

    /// Inclusive upper bound: the whole "to" day, i.e. to + 24h - 1ms.
    /// `None` when the next day is past the calendar's end, which leaves
    /// nothing to exclude.
    fn to_instant(&self) -> Option<DateTime<Utc>> {
        self.date_to
            .and_then(|d| d.succ_opt())
            .and_then(|next| next.and_hms_opt(0, 0, 0))
            .and_then(|ndt| ndt.and_utc().checked_sub_signed(Duration::milliseconds(1)))
    }
}

fn parse_date_input(value: &str) -> Result<Option<NaiveDate>, FilterError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| FilterError::InvalidDate {
            value: value.to_string(),
            source: e,
        })
}

/// Bounds and lowered search text computed once per filter pass.
struct Prepared<'a> {
    filter: &'a FilterState,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    url_lower: String,
}

/// Apply filters to a slice of records, returning indices of matching records.
///
/// Always evaluated against the full record slice handed in; results from a
/// previous pass are never narrowed further.
pub fn apply_filters(records: &[ScanRecord], filter: &FilterState) -> Vec<usize> {
    if filter.is_empty() {
        return (0..records.len()).collect();
    }

    let prepared = Prepared {
        filter,
        from: filter.from_instant(),
        to: filter.to_instant(),
        url_lower: filter.url_search.trim().to_lowercase(),
    };

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_all(record, &prepared))
        .map(|(idx, _)| idx)
        .collect()
}

/// Check if a single record matches all active filters.
fn matches_all(record: &ScanRecord, prepared: &Prepared<'_>) -> bool {
    let filter = prepared.filter;

    if let Some(ref course) = filter.course {
        if record.course != *course {
            return false;
        }
    }

    if let Some(label) = filter.label {
        if record.normalized_label != label {
            return false;
        }
    }

    // Records without a parsed timestamp sit at the epoch for range checks.
    let ts = record.sort_key();
    if prepared.from.is_some_and(|from| ts < from) {
        return false;
    }
    if prepared.to.is_some_and(|to| ts > to) {
        return false;
    }

    if !prepared.url_lower.is_empty() && !record.url.to_lowercase().contains(&prepared.url_lower)
    {
        return false;
    }

    if let Some(min) = filter.min_confidence {
        match record.confidence_value() {
            Some(value) if value >= min => {}
            _ => return false,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_export_timestamp;

    fn make_record(course: &str, exported: &str, url: &str, label: Label, conf: &str) -> ScanRecord {
        ScanRecord {
            course: course.to_string(),
            exported: exported.to_string(),
            exported_at: parse_export_timestamp(exported),
            url: url.to_string(),
            raw_label: label.as_str().to_uppercase(),
            normalized_label: label,
            confidence: (!conf.is_empty()).then(|| conf.to_string()),
            source: String::new(),
            author: String::new(),
        }
    }

    fn sample() -> Vec<ScanRecord> {
        vec![
            make_record("CS101", "2025-11-07 10:00", "http://Evil.com/login", Label::Phish, "0.9"),
            make_record("CS101", "2025-11-06 23:59:59", "http://good.org", Label::Benign, "0.2"),
            make_record("BIO200", "2025-11-08 00:00", "http://adult.example", Label::Adult, ""),
            make_record("BIO200", "garbled", "http://evil.net", Label::Malware, "high"),
        ]
    }

    #[test]
    fn test_empty_filter_returns_all() {
        let records = sample();
        let result = apply_filters(&records, &FilterState::default());
        assert_eq!(result, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_course_filter_exact_match() {
        let records = sample();
        let mut filter = FilterState::default();
        filter.set_course("BIO200");
        assert_eq!(apply_filters(&records, &filter), vec![2, 3]);
        filter.set_course("bio200");
        assert!(apply_filters(&records, &filter).is_empty());
        filter.set_course("all");
        assert!(filter.is_empty());
    }

    #[test]
    fn test_label_filter() {
        let records = sample();
        let mut filter = FilterState::default();
        filter.set_label("phish").unwrap();
        assert_eq!(apply_filters(&records, &filter), vec![0]);
        filter.set_label("ALL").unwrap();
        assert_eq!(filter.label, None);
    }

    #[test]
    fn test_unknown_label_rejected() {
        let mut filter = FilterState::default();
        let err = filter.set_label("spam").unwrap_err();
        assert!(matches!(err, FilterError::UnknownLabel { .. }));
    }

    #[test]
    fn test_date_range_includes_whole_to_day() {
        let records = sample();
        let mut filter = FilterState::default();
        filter.set_date_from("2025-11-06").unwrap();
        filter.set_date_to("2025-11-07").unwrap();
        // 11-06 23:59:59 and 11-07 10:00 are in; 11-08 00:00 and epoch are out.
        assert_eq!(apply_filters(&records, &filter), vec![0, 1]);
    }

    #[test]
    fn test_to_bound_is_last_millisecond_of_day() {
        let mut filter = FilterState::default();
        filter.set_date_to("2025-11-07").unwrap();
        let to = filter.to_instant().unwrap();
        assert_eq!(
            to.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            "2025-11-07 23:59:59.999"
        );
    }

    #[test]
    fn test_to_bound_on_last_calendar_day_does_not_overflow() {
        let records = sample();
        let mut filter = FilterState::default();
        filter.set_date_to("+262142-12-31").unwrap();
        assert_eq!(filter.to_instant(), None);
        assert_eq!(apply_filters(&records, &filter).len(), records.len());
    }

    #[test]
    fn test_unparsed_timestamp_sits_at_epoch() {
        let records = sample();
        let mut filter = FilterState::default();
        filter.set_date_to("1970-01-01").unwrap();
        assert_eq!(apply_filters(&records, &filter), vec![3]);
    }

    #[test]
    fn test_invalid_date_rejected() {
        let mut filter = FilterState::default();
        assert!(filter.set_date_from("11/07/2025").is_err());
        assert!(filter.set_date_from("").is_ok());
        assert_eq!(filter.date_from, None);
    }

    #[test]
    fn test_url_search_case_insensitive() {
        let records = sample();
        let mut filter = FilterState::default();
        filter.set_url_search("  EVIL ");
        assert_eq!(apply_filters(&records, &filter), vec![0, 3]);
    }

    #[test]
    fn test_min_confidence_excludes_unparsable() {
        let records = sample();
        let mut filter = FilterState::default();
        filter.set_min_confidence("0.5");
        assert_eq!(apply_filters(&records, &filter), vec![0]);
    }

    #[test]
    fn test_min_confidence_text_clears_threshold() {
        let records = sample();
        let mut filter = FilterState::default();
        filter.set_min_confidence("abc");
        assert_eq!(filter.min_confidence, None);
        assert_eq!(apply_filters(&records, &filter).len(), 4);
    }

    #[test]
    fn test_min_confidence_above_all_values_yields_nothing() {
        let records = sample();
        let mut filter = FilterState::default();
        filter.set_min_confidence("0.95");
        assert!(apply_filters(&records, &filter).is_empty());
    }

    #[test]
    fn test_combined_filters() {
        let records = sample();
        let mut filter = FilterState::default();
        filter.set_course("CS101");
        filter.set_url_search("good");
        filter.set_min_confidence("0.1");
        assert_eq!(apply_filters(&records, &filter), vec![1]);
    }
}

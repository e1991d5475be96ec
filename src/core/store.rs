// ScanLogs - core/store.rs
//
// Immutable record set for one loaded report, in canonical order
// (most recent export first). A new report replaces the whole store.

use crate::core::filter::{apply_filters, FilterState};
use crate::core::model::{LabelCounts, ReportMarker, ScanRecord};
use crate::core::parser::{parse_report, ParseOutcome};

/// The parsed records of one report, sorted newest first.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<ScanRecord>,
    markers: Vec<ReportMarker>,
}

impl RecordStore {
    /// Parse `text` and build a store from the result.
    pub fn from_text(text: &str) -> Self {
        Self::from_outcome(parse_report(text))
    }

    pub fn from_outcome(outcome: ParseOutcome) -> Self {
        let mut store = Self::from_records(outcome.records);
        store.markers = outcome.markers;
        store
    }

    /// Build a store from records in parse order.
    ///
    /// Sorted descending by export time; the sort is stable so rows sharing
    /// a timestamp keep parse order. Unparsed timestamps sort last.
    pub fn from_records(mut records: Vec<ScanRecord>) -> Self {
        records.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
        Self {
            records,
            markers: Vec::new(),
        }
    }

    /// A new store holding only `course`'s records (exact match).
    pub fn scoped_to_course(&self, course: &str) -> Self {
        let records: Vec<ScanRecord> = self
            .records
            .iter()
            .filter(|r| r.course == course)
            .cloned()
            .collect();
        tracing::debug!(
            course,
            kept = records.len(),
            total = self.records.len(),
            "Store scoped to course"
        );
        Self {
            records,
            markers: self.markers.clone(),
        }
    }

    pub fn records(&self) -> &[ScanRecord] {
        &self.records
    }

    pub fn markers(&self) -> &[ReportMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Indices of records passing `filter`, in canonical order.
    pub fn filter_indices(&self, filter: &FilterState) -> Vec<usize> {
        apply_filters(&self.records, filter)
    }

    /// Records passing `filter`, in canonical order.
    pub fn filtered(&self, filter: &FilterState) -> Vec<&ScanRecord> {
        self.filter_indices(filter)
            .into_iter()
            .map(|idx| &self.records[idx])
            .collect()
    }

    /// Distinct non-empty course names, sorted, for a course selector.
    pub fn courses(&self) -> Vec<&str> {
        let mut courses: Vec<&str> = self
            .records
            .iter()
            .map(|r| r.course.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        courses.sort_unstable();
        courses.dedup();
        courses
    }

    /// Whether records from more than one course are present.
    pub fn spans_multiple_courses(&self) -> bool {
        let mut iter = self.records.iter().map(|r| r.course.as_str());
        match iter.next() {
            Some(first) => iter.any(|c| c != first),
            None => false,
        }
    }

    pub fn label_counts(&self) -> LabelCounts {
        LabelCounts::from_records(&self.records)
    }
}

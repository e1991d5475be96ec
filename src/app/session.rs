// ScanLogs - app/session.rs
//
// Per-report session state: the immutable record store plus the caller's
// current filters and page. Built fresh for every report load and owned
// by the caller; there is no process-wide mutable state.

use crate::core::export::{self, CsvLayout, ExportScope};
use crate::core::filter::FilterState;
use crate::core::model::{LabelCounts, ScanRecord};
use crate::core::paginate::Page;
use crate::core::store::RecordStore;
use crate::util::constants::{
    ALL_COURSES_EXPORT_PREFIX, COURSE_EXPORT_PREFIX, EMPTY_NO_DATA_MESSAGE,
    EMPTY_NO_MATCH_MESSAGE,
};
use crate::util::error::ExportError;
use chrono::NaiveDate;

/// Why there is nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The report produced no records at all.
    NoData,
    /// Records exist but none pass the current filters.
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoData => EMPTY_NO_DATA_MESSAGE,
            EmptyState::NoMatches => EMPTY_NO_MATCH_MESSAGE,
        }
    }
}

/// The visible page plus its navigation state.
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    pub page: Page,
    pub records: Vec<&'a ScanRecord>,
    pub status: String,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

/// What the table shows right now.
#[derive(Debug, Clone)]
pub enum TableView<'a> {
    Empty(EmptyState),
    Page(PageView<'a>),
}

/// Session over one loaded report.
#[derive(Debug)]
pub struct ReportSession {
    store: RecordStore,
    course_scope: Option<String>,
    filter: FilterState,
    page_size: usize,
    current_page: usize,
    /// Indices into `store.records()` passing `filter`.
    filtered: Vec<usize>,
}

impl ReportSession {
    /// Session over every course in `store`.
    pub fn new(store: RecordStore, page_size: usize) -> Self {
        let filtered = (0..store.len()).collect();
        Self {
            store,
            course_scope: None,
            filter: FilterState::default(),
            page_size: page_size.max(1),
            current_page: 1,
            filtered,
        }
    }

    /// Session pre-scoped to a single course.
    pub fn for_course(store: &RecordStore, course: &str, page_size: usize) -> Self {
        let mut session = Self::new(store.scoped_to_course(course), page_size);
        session.course_scope = Some(course.to_string());
        session
    }

    /// Parse `text` and start a session over it.
    pub fn load(text: &str, page_size: usize) -> Self {
        let store = RecordStore::from_text(text);
        tracing::info!(records = store.len(), "Report loaded");
        Self::new(store, page_size)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn course_scope(&self) -> Option<&str> {
        self.course_scope.as_deref()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Replace the filters: recompute from the full store, back to page 1.
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.refilter();
    }

    /// Edit the filters in place. Whatever the closure returns is passed
    /// back, so fallible setters can be used with `?`. The filtered set is
    /// recomputed and the page reset even if the closure reports an error.
    pub fn update_filter<R>(&mut self, edit: impl FnOnce(&mut FilterState) -> R) -> R {
        let result = edit(&mut self.filter);
        self.refilter();
        result
    }

    fn refilter(&mut self) {
        self.filtered = self.store.filter_indices(&self.filter);
        self.current_page = 1;
        tracing::debug!(
            matched = self.filtered.len(),
            total = self.store.len(),
            "Filters applied"
        );
    }

    /// Move to `page`, clamped into the valid range.
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page =
            crate::core::paginate::clamp_page(self.filtered.len(), page, self.page_size);
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.current_page.saturating_sub(1));
    }

    /// Every record passing the filters, in canonical order.
    pub fn filtered_records(&self) -> Vec<&ScanRecord> {
        let records = self.store.records();
        self.filtered.iter().map(|&idx| &records[idx]).collect()
    }

    /// Current page, or `None` when the filtered set is empty.
    pub fn page(&self) -> Option<Page> {
        Page::compute(self.filtered.len(), self.current_page, self.page_size)
    }

    /// Records on the current page.
    pub fn visible_records(&self) -> Vec<&ScanRecord> {
        let records = self.store.records();
        self.page()
            .map(|page| {
                self.filtered[page.range()]
                    .iter()
                    .map(|&idx| &records[idx])
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn view(&self) -> TableView<'_> {
        if self.store.is_empty() {
            return TableView::Empty(EmptyState::NoData);
        }
        match self.page() {
            None => TableView::Empty(EmptyState::NoMatches),
            Some(page) => TableView::Page(PageView {
                page,
                records: self.visible_records(),
                status: page.status_line(),
                prev_disabled: page.prev_disabled(),
                next_disabled: page.next_disabled(),
            }),
        }
    }

    /// Per-label counts over the filtered set.
    pub fn label_counts(&self) -> LabelCounts {
        let records = self.store.records();
        LabelCounts::from_records(self.filtered.iter().map(|&idx| &records[idx]))
    }

    /// Course column only when the session is not scoped to one course.
    pub fn csv_layout(&self) -> CsvLayout {
        if self.course_scope.is_some() {
            CsvLayout::SingleCourse
        } else {
            CsvLayout::MultiCourse
        }
    }

    pub fn export_records(&self, scope: ExportScope) -> Vec<&ScanRecord> {
        match scope {
            ExportScope::Page => self.visible_records(),
            ExportScope::Filtered => self.filtered_records(),
        }
    }

    /// CSV text for `scope`. An empty filtered set yields the header row only.
    pub fn export_csv(&self, scope: ExportScope) -> Result<String, ExportError> {
        let records = self.export_records(scope);
        export::render_csv(&records, self.csv_layout())
    }

    /// Default export prefix for this session's page context.
    pub fn default_export_prefix(&self) -> &'static str {
        if self.course_scope.is_some() {
            COURSE_EXPORT_PREFIX
        } else {
            ALL_COURSES_EXPORT_PREFIX
        }
    }

    pub fn export_file_name(&self, date: NaiveDate) -> String {
        export::export_file_name(self.default_export_prefix(), date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Label;
    use std::fmt::Write as _;

    /// 45 freeform rows across two courses, newest row first after sorting.
    fn big_report() -> String {
        let mut text = String::new();
        for i in 0..45 {
            let course = if i % 3 == 0 { "Art" } else { "Math" };
            let label = if i % 5 == 0 { "phishing" } else { "safe" };
            writeln!(text, "Course Name: {course}").unwrap();
            writeln!(text, "Exported on: 2025-01-{:02} 10:00", (i % 28) + 1).unwrap();
            writeln!(text, "http://site-{i}.com, {label}, 0.{i:02}").unwrap();
        }
        text
    }

    #[test]
    fn test_pagination_over_forty_five_rows() {
        let mut session = ReportSession::load(&big_report(), 20);
        match session.view() {
            TableView::Page(view) => {
                assert_eq!(view.records.len(), 20);
                assert!(view.prev_disabled);
                assert!(!view.next_disabled);
                assert_eq!(view.status, "Page 1 of 3 • Showing 20 of 45 rows");
            }
            other => panic!("expected a page, got {other:?}"),
        }

        session.go_to_page(3);
        match session.view() {
            TableView::Page(view) => {
                assert_eq!(view.records.len(), 5);
                assert!(view.next_disabled);
            }
            other => panic!("expected a page, got {other:?}"),
        }
    }

    #[test]
    fn test_next_and_prev_clamp() {
        let mut session = ReportSession::load(&big_report(), 20);
        session.prev_page();
        assert_eq!(session.current_page(), 1);
        for _ in 0..10 {
            session.next_page();
        }
        assert_eq!(session.current_page(), 3);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut session = ReportSession::load(&big_report(), 20);
        session.go_to_page(2);
        session.update_filter(|f| f.set_course("Math"));
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.filtered_records().len(), 30);
    }

    #[test]
    fn test_filters_recomputed_from_full_store() {
        let mut session = ReportSession::load(&big_report(), 20);
        session.update_filter(|f| f.set_course("Art"));
        assert_eq!(session.filtered_records().len(), 15);
        session.update_filter(|f| f.set_course("all"));
        assert_eq!(session.filtered_records().len(), 45);
    }

    #[test]
    fn test_update_filter_propagates_errors() {
        let mut session = ReportSession::load(&big_report(), 20);
        let result = session.update_filter(|f| f.set_label("spam"));
        assert!(result.is_err());
        assert_eq!(session.filtered_records().len(), 45);
    }

    #[test]
    fn test_empty_states() {
        let session = ReportSession::load("no data here", 20);
        assert!(matches!(session.view(), TableView::Empty(EmptyState::NoData)));
        assert_eq!(EmptyState::NoData.message(), "No logs found.");

        let mut session = ReportSession::load(&big_report(), 20);
        session.update_filter(|f| f.set_min_confidence("5"));
        match session.view() {
            TableView::Empty(state) => {
                assert_eq!(state, EmptyState::NoMatches);
                assert_eq!(state.message(), "No logs match your filters.");
            }
            other => panic!("expected empty view, got {other:?}"),
        }
        assert!(session.visible_records().is_empty());
    }

    #[test]
    fn test_label_counts_follow_filters() {
        let mut session = ReportSession::load(&big_report(), 20);
        assert_eq!(session.label_counts().get(Label::Phish), 9);
        session.update_filter(|f| f.set_course("Art"));
        // i % 15 == 0 -> 0, 15, 30
        assert_eq!(session.label_counts().get(Label::Phish), 3);
        assert_eq!(session.label_counts().total(), 15);
    }

    #[test]
    fn test_course_scoped_session_exports_single_course_layout() {
        let store = RecordStore::from_text(&big_report());
        let session = ReportSession::for_course(&store, "Art", 10);
        assert_eq!(session.course_scope(), Some("Art"));
        assert_eq!(session.csv_layout(), CsvLayout::SingleCourse);

        let csv = session.export_csv(ExportScope::Page).unwrap();
        assert!(csv.starts_with("exported,url,label,confidence,source,author\n"));
        assert_eq!(csv.lines().count(), 11, "header plus ten visible rows");

        let all = session.export_csv(ExportScope::Filtered).unwrap();
        assert_eq!(all.lines().count(), 16);

        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(
            session.export_file_name(date),
            "manual_scan_logs_2026-10-19.csv"
        );
    }

    #[test]
    fn test_all_courses_session_exports_multi_course_layout() {
        let session = ReportSession::load(&big_report(), 20);
        let csv = session.export_csv(ExportScope::Filtered).unwrap();
        assert!(csv.starts_with("course,exported,"));
        assert_eq!(csv.lines().count(), 46);
    }

    #[test]
    fn test_export_of_empty_set_is_header_only() {
        let mut session = ReportSession::load(&big_report(), 20);
        session.update_filter(|f| f.set_url_search("nowhere"));
        let csv = session.export_csv(ExportScope::Filtered).unwrap();
        assert_eq!(csv, "course,exported,url,label,confidence,source,author\n");
        let page = session.export_csv(ExportScope::Page).unwrap();
        assert_eq!(page.lines().count(), 1);
    }
}

// ScanLogs - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "ScanLogs";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "ScanLogs";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Report text markers
// =============================================================================

/// Prefix of the header line naming the course a report block belongs to.
pub const COURSE_HEADER_PREFIX: &str = "Course Name:";

/// Prefix of the header line carrying the export timestamp of a block.
pub const EXPORTED_HEADER_PREFIX: &str = "Exported on:";

/// Prefix of the line separating report blocks.
pub const BLOCK_SEPARATOR_PREFIX: &str = "--- ";

/// First column name that marks a line as a CSV header.
pub const CSV_HEADER_FIRST_COLUMN: &str = "url";

// =============================================================================
// Parsing limits
// =============================================================================

/// Maximum size of a report file accepted by the CLI.
///
/// Reports are processed in memory in a single pass, so the whole blob is
/// held at once. 256 MB is far beyond any real export.
pub const MAX_REPORT_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Maximum length of a report line included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 120;

// =============================================================================
// Pagination
// =============================================================================

/// Rows per page in the all-courses log view.
pub const ALL_COURSES_PAGE_SIZE: usize = 20;

/// Rows per page in the compact course list of the manual scan page.
pub const COMPACT_PAGE_SIZE: usize = 10;

/// Default page size when neither the CLI nor config.toml set one.
pub const DEFAULT_PAGE_SIZE: usize = ALL_COURSES_PAGE_SIZE;

/// Minimum user-configurable page size.
pub const MIN_PAGE_SIZE: usize = 1;

/// Maximum user-configurable page size.
pub const MAX_PAGE_SIZE: usize = 500;

// =============================================================================
// Display and export
// =============================================================================

/// Placeholder rendered for missing optional fields (confidence, source,
/// author) in the display mapping and in CSV exports.
pub const MISSING_FIELD_PLACEHOLDER: &str = "—";

/// Shown when the report contained no records at all.
pub const EMPTY_NO_DATA_MESSAGE: &str = "No logs found.";

/// Shown when records exist but none pass the active filters.
pub const EMPTY_NO_MATCH_MESSAGE: &str = "No logs match your filters.";

/// Export file name prefix for the all-courses view.
pub const ALL_COURSES_EXPORT_PREFIX: &str = "scanned_logs";

/// Export file name prefix for a course-scoped session.
pub const COURSE_EXPORT_PREFIX: &str = "manual_scan_logs";

/// Maximum length of a user-configured export prefix.
pub const MAX_EXPORT_PREFIX_LEN: usize = 64;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

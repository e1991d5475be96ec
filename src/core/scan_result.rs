// ScanLogs - core/scan_result.rs
//
// Summary of a single manual scan result, as printed by the scanner job:
//
//   --- Report 46 (2025-11-07) ---
//   Total Links: 12
//   Safe Links: 10
//   Suspicious: 1, Malicious: 1
//   Unsafe URLs:
//   - http://bad.example/login

use crate::core::parser::parse_marker;
use crate::util::constants::BLOCK_SEPARATOR_PREFIX;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Parsed manual scan result. Counts are kept as text, like the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResultSummary {
    pub report_id: Option<String>,
    pub report_date: Option<String>,
    pub total_links: Option<String>,
    pub safe_links: Option<String>,
    pub suspicious: Option<String>,
    pub malicious: Option<String>,
    pub unsafe_urls: Vec<String>,
}

impl ScanResultSummary {
    pub fn has_unsafe_urls(&self) -> bool {
        !self.unsafe_urls.is_empty()
    }
}

fn counts_pattern() -> &'static Regex {
    static COUNTS: OnceLock<Regex> = OnceLock::new();
    COUNTS.get_or_init(|| {
        Regex::new(r"Suspicious:\s*([^,]+),\s*Malicious:\s*(.+)").expect("counts regex is valid")
    })
}

/// Value after the first `:`, trimmed; `None` if empty.
fn after_colon(line: &str) -> Option<String> {
    line.split_once(':')
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a manual scan result. Unknown lines are ignored.
pub fn parse_scan_result(text: &str) -> ScanResultSummary {
    let mut summary = ScanResultSummary::default();
    let mut in_unsafe_section = false;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with(BLOCK_SEPARATOR_PREFIX) {
            let marker = parse_marker(line);
            if marker.id.is_some() {
                summary.report_id = marker.id;
                summary.report_date = marker.date;
            }
        } else if line.starts_with("Total Links:") {
            summary.total_links = after_colon(line);
        } else if line.starts_with("Safe Links:") {
            summary.safe_links = after_colon(line);
        } else if line.starts_with("Suspicious:") {
            if let Some(caps) = counts_pattern().captures(line) {
                summary.suspicious = caps.get(1).map(|m| m.as_str().trim().to_string());
                summary.malicious = caps.get(2).map(|m| m.as_str().trim().to_string());
            }
        } else if line.starts_with("Unsafe URLs:") {
            in_unsafe_section = true;
        } else if in_unsafe_section {
            if let Some(url) = line.strip_prefix("- ") {
                summary.unsafe_urls.push(url.trim().to_string());
            }
        }
    }

    tracing::debug!(
        report = summary.report_id.as_deref().unwrap_or("-"),
        unsafe_urls = summary.unsafe_urls.len(),
        "Scan result parsed"
    );
    summary
}

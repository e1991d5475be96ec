// ScanLogs - core/export.rs
//
// CSV and JSON export of scan records.
// Core layer: writes to any Write trait object; choosing and creating the
// destination file is the caller's job.

use crate::core::model::ScanRecord;
use crate::util::constants::MISSING_FIELD_PLACEHOLDER;
use crate::util::error::ExportError;
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;

/// Pseudo-path used in errors for exports rendered into memory.
const IN_MEMORY: &str = "<memory>";

/// Column set of a CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    /// One course in scope: `exported,url,label,confidence,source,author`.
    SingleCourse,
    /// Several courses in scope: a leading `course` column is added.
    MultiCourse,
}

impl CsvLayout {
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            CsvLayout::SingleCourse => {
                &["exported", "url", "label", "confidence", "source", "author"]
            }
            CsvLayout::MultiCourse => &[
                "course",
                "exported",
                "url",
                "label",
                "confidence",
                "source",
                "author",
            ],
        }
    }
}

/// Which records an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    /// Only the rows on the current page.
    #[default]
    Page,
    /// Every row passing the current filters, ignoring pagination.
    Filtered,
}

impl ExportScope {
    pub fn from_name(name: &str) -> Option<ExportScope> {
        match name.trim().to_lowercase().as_str() {
            "page" => Some(ExportScope::Page),
            "filtered" | "all" => Some(ExportScope::Filtered),
            _ => None,
        }
    }
}

/// A record as shown in the table: display label, placeholders for
/// missing optional fields. The stored record is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub course: String,
    pub exported: String,
    pub url: String,
    pub label: String,
    pub confidence: String,
    pub source: String,
    pub author: String,
}

impl DisplayRow {
    pub fn from_record(record: &ScanRecord) -> Self {
        Self {
            course: record.course.clone(),
            exported: record.exported.clone(),
            url: record.url.clone(),
            label: record.raw_label.clone(),
            confidence: or_placeholder(record.confidence.as_deref().unwrap_or("")),
            source: or_placeholder(&record.source),
            author: or_placeholder(&record.author),
        }
    }

    /// Field values in `layout` column order.
    pub fn fields(&self, layout: CsvLayout) -> Vec<&str> {
        let tail = [
            self.exported.as_str(),
            self.url.as_str(),
            self.label.as_str(),
            self.confidence.as_str(),
            self.source.as_str(),
            self.author.as_str(),
        ];
        match layout {
            CsvLayout::SingleCourse => tail.to_vec(),
            CsvLayout::MultiCourse => std::iter::once(self.course.as_str()).chain(tail).collect(),
        }
    }
}

fn or_placeholder(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        MISSING_FIELD_PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

/// Export records to CSV.
///
/// The header row is plain; every data field is quoted with inner quotes
/// doubled. Returns the number of data rows written.
pub fn export_csv<W: Write>(
    records: &[&ScanRecord],
    layout: CsvLayout,
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let io_err = |e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    };
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    writer
        .write_all(layout.headers().join(",").as_bytes())
        .and_then(|_| writer.write_all(b"\n"))
        .map_err(io_err)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    let mut count = 0;
    for record in records {
        let row = DisplayRow::from_record(record);
        csv_writer.write_record(row.fields(layout)).map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(io_err)?;

    tracing::debug!(path = %export_path.display(), rows = count, "CSV export written");
    Ok(count)
}

/// Render a CSV export into a string.
pub fn render_csv(records: &[&ScanRecord], layout: CsvLayout) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    export_csv(records, layout, &mut buf, Path::new(IN_MEMORY))?;
    String::from_utf8(buf).map_err(|e| ExportError::Encoding { source: e })
}

/// Export records to JSON format (array of objects).
pub fn export_json<W: Write>(
    records: &[&ScanRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(records.len())
}

/// `<prefix>_<YYYY-MM-DD>.csv`
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.csv", date.format("%Y-%m-%d"))
}

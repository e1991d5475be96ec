// ScanLogs - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Report loading, filtering, and pagination
// 4. Output: text table, JSON page, CSV export, or scan result summary

use clap::Parser;
use scanlogs::app::session::{ReportSession, TableView};
use scanlogs::core::export::{self, CsvLayout, DisplayRow, ExportScope};
use scanlogs::core::filter::FilterState;
use scanlogs::core::model::{Label, ScanRecord};
use scanlogs::core::scan_result::{parse_scan_result, ScanResultSummary};
use scanlogs::core::store::RecordStore;
use scanlogs::platform::{self, config::AppConfig};
use scanlogs::util::{self, error::ExportError, error::ScanLogsError};
use std::path::{Path, PathBuf};

/// ScanLogs - browse, filter, and export scanned-link reports.
///
/// Reads a report exported by the link scanner (header lines, CSV blocks,
/// and freeform rows), classifies every link, and shows one page at a time.
#[derive(Parser, Debug)]
#[command(name = "scanlogs", version, about)]
struct Cli {
    /// Report text file to read.
    report: PathBuf,

    /// Restrict the session to one course (single-course export layout).
    #[arg(long = "course-scope", value_name = "NAME")]
    course_scope: Option<String>,

    /// Course filter ("all" for every course).
    #[arg(long)]
    course: Option<String>,

    /// Label filter: all, benign, suspicious, phish, malware, adult.
    #[arg(short = 'l', long)]
    label: Option<String>,

    /// Earliest export date, inclusive (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    from: Option<String>,

    /// Latest export date, inclusive (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    to: Option<String>,

    /// Case-insensitive URL substring.
    #[arg(short = 'u', long = "url", value_name = "TEXT")]
    url: Option<String>,

    /// Minimum confidence; non-numeric values disable the threshold.
    #[arg(long = "min-confidence", value_name = "VALUE")]
    min_confidence: Option<String>,

    /// Page to show (clamped into range).
    #[arg(short = 'p', long, default_value_t = 1)]
    page: usize,

    /// Rows per page (overrides config.toml).
    #[arg(long = "page-size", value_parser = clap::value_parser!(u64).range(1..=500))]
    page_size: Option<u64>,

    /// Print the visible page as JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// Write a CSV export into this directory.
    #[arg(short = 'e', long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// Export scope: page or filtered (overrides config.toml).
    #[arg(long = "export-scope", value_parser = parse_scope)]
    export_scope: Option<ExportScope>,

    /// Treat the input as a manual scan result and print its summary.
    #[arg(long = "scan-result")]
    scan_result: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn parse_scope(value: &str) -> Result<ExportScope, String> {
    ExportScope::from_name(value)
        .ok_or_else(|| format!("expected \"page\" or \"filtered\", got \"{value}\""))
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(platform::config::default_config_path);
    let (config, config_warnings) = platform::config::load_config(&config_path);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "ScanLogs starting"
    );
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    if let Err(e) = run(&cli, &config) {
        tracing::error!(error = %e, "ScanLogs failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, config: &AppConfig) -> Result<(), ScanLogsError> {
    let text = platform::fs::read_report(&cli.report)?;

    if cli.scan_result {
        let summary = parse_scan_result(&text);
        if cli.json {
            print_json(&summary, &cli.report)?;
        } else {
            print_scan_result(&summary);
        }
        return Ok(());
    }

    let store = RecordStore::from_text(&text);
    let page_size = cli
        .page_size
        .map_or(config.page_size, |size| size as usize);

    let mut session = match cli.course_scope.as_deref() {
        Some(course) => ReportSession::for_course(&store, course, page_size),
        None => ReportSession::new(store, page_size),
    };
    session.update_filter(|filter| apply_cli_filters(filter, cli))?;
    session.go_to_page(cli.page);

    if let Some(ref dir) = cli.export {
        let scope = cli.export_scope.unwrap_or(config.export_scope);
        return export_session(&session, dir, scope, config);
    }

    if cli.json {
        let records = session.visible_records();
        let stdout = std::io::stdout();
        export::export_json(&records, stdout.lock(), Path::new("<stdout>"))?;
        println!();
        if let Some(page) = session.page() {
            tracing::info!("{}", page.status_line());
        }
        return Ok(());
    }

    print_table(&session);
    Ok(())
}

/// Copy CLI filter arguments into `filter`. Stops at the first bad value.
fn apply_cli_filters(
    filter: &mut FilterState,
    cli: &Cli,
) -> Result<(), scanlogs::util::error::FilterError> {
    if let Some(ref course) = cli.course {
        filter.set_course(course);
    }
    if let Some(ref label) = cli.label {
        filter.set_label(label)?;
    }
    if let Some(ref from) = cli.from {
        filter.set_date_from(from)?;
    }
    if let Some(ref to) = cli.to {
        filter.set_date_to(to)?;
    }
    if let Some(ref url) = cli.url {
        filter.set_url_search(url);
    }
    if let Some(ref threshold) = cli.min_confidence {
        filter.set_min_confidence(threshold);
    }
    Ok(())
}

fn export_session(
    session: &ReportSession,
    dir: &Path,
    scope: ExportScope,
    config: &AppConfig,
) -> Result<(), ScanLogsError> {
    let records = session.export_records(scope);
    if records.is_empty() {
        tracing::warn!("No rows match the filters; writing header only");
    }

    let today = chrono::Local::now().date_naive();
    let file_name = match config.export_prefix.as_deref() {
        Some(prefix) => export::export_file_name(prefix, today),
        None => session.export_file_name(today),
    };
    let layout = session.csv_layout();

    let (path, rows) = platform::fs::write_export(dir, &file_name, |writer, path| {
        export::export_csv(&records, layout, writer, path)
    })?;
    println!("Exported {rows} rows to {}", path.display());
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T, source: &Path) -> Result<(), ScanLogsError> {
    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), value).map_err(|e| ExportError::Json {
        path: source.to_path_buf(),
        source: e,
    })?;
    println!();
    Ok(())
}

fn print_table(session: &ReportSession) {
    let layout = session.csv_layout();
    match session.view() {
        TableView::Empty(state) => println!("{}", state.message()),
        TableView::Page(view) => {
            println!("{}", layout.headers().join(" | "));
            for record in &view.records {
                println!("{}", table_row(record, layout));
            }
            println!();
            println!("{}", view.status);

            let counts = session.label_counts();
            let summary: Vec<String> = Label::all()
                .iter()
                .map(|label| format!("{label}: {}", counts.get(*label)))
                .collect();
            println!("{}", summary.join("  "));

            if session.course_scope().is_none() && session.store().spans_multiple_courses() {
                println!("Courses: {}", session.store().courses().join(", "));
            }
        }
    }
}

fn table_row(record: &ScanRecord, layout: CsvLayout) -> String {
    DisplayRow::from_record(record).fields(layout).join(" | ")
}

fn print_scan_result(summary: &ScanResultSummary) {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    println!(
        "Report {} ({})",
        or_dash(&summary.report_id),
        or_dash(&summary.report_date)
    );
    println!("Total links: {}", or_dash(&summary.total_links));
    println!("Safe links:  {}", or_dash(&summary.safe_links));
    println!(
        "Suspicious:  {}  Malicious: {}",
        or_dash(&summary.suspicious),
        or_dash(&summary.malicious)
    );
    if summary.has_unsafe_urls() {
        println!("Unsafe URLs:");
        for url in &summary.unsafe_urls {
            println!("  - {url}");
        }
    }
}

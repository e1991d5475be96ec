// ScanLogs - util/logging.rs
//
// Structured logging with runtime-selectable debug mode.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - CLI flag: --debug
//   - Config file: [logging] level = "debug"
//
// Output: stderr, so stdout carries only tables, JSON, or CSV paths.
// Never logs full report lines; previews are capped.

use tracing_subscriber::EnvFilter;

/// Initialise the logging subsystem.
///
/// Priority: RUST_LOG env var > CLI --debug flag > config level > default "info".
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = config_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(super::constants::DEFAULT_LOG_LEVEL)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(debug_flag)
        .with_line_number(debug_flag)
        .compact()
        .init();

    tracing::debug!(
        app = super::constants::APP_NAME,
        version = super::constants::APP_VERSION,
        "Logging initialised"
    );
}

/// Truncate a report line for inclusion in debug output.
pub fn preview(line: &str) -> &str {
    let max = super::constants::DEBUG_MAX_LINE_PREVIEW;
    match line.char_indices().nth(max) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_line_unchanged() {
        assert_eq!(preview("http://a.com, safe"), "http://a.com, safe");
    }

    #[test]
    fn test_preview_caps_long_line_on_char_boundary() {
        let long = "é".repeat(500);
        let p = preview(&long);
        assert_eq!(
            p.chars().count(),
            crate::util::constants::DEBUG_MAX_LINE_PREVIEW
        );
    }
}

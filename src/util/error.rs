// ScanLogs - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// The parsing core never fails; errors only arise at the edges
// (user-supplied filter text, report file reading, export, config).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all ScanLogs operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum ScanLogsError {
    /// Report input could not be read.
    Input(InputError),

    /// Filter input could not be interpreted.
    Filter(FilterError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading failed.
    Config(ConfigError),
}

impl fmt::Display for ScanLogsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(e) => write!(f, "Input error: {e}"),
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for ScanLogsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            Self::Filter(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

/// Errors reading the raw report text.
#[derive(Debug)]
pub enum InputError {
    /// The report file does not exist.
    NotFound { path: PathBuf },

    /// The report file exceeds the maximum accepted size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// I/O error while reading the report.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "Report file '{}' does not exist", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Report '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "I/O error reading report '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<InputError> for ScanLogsError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors interpreting filter values supplied as text.
#[derive(Debug)]
pub enum FilterError {
    /// Label name is neither "all" nor one of the five categories.
    UnknownLabel { value: String },

    /// Date bound is not a valid YYYY-MM-DD date.
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLabel { value } => write!(
                f,
                "Unknown label '{value}'. Expected one of: all, benign, suspicious, \
                 phish, malware, adult"
            ),
            Self::InvalidDate { value, source } => {
                write!(f, "Invalid date '{value}' (expected YYYY-MM-DD): {source}")
            }
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidDate { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<FilterError> for ScanLogsError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// In-memory export produced bytes that are not UTF-8.
    Encoding { source: std::string::FromUtf8Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::Encoding { source } => write!(f, "Export produced invalid UTF-8: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Encoding { source } => Some(source),
        }
    }
}

impl From<ExportError> for ScanLogsError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for ScanLogsError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for ScanLogs results.
pub type Result<T> = std::result::Result<T, ScanLogsError>;

// ScanLogs - platform/config.rs
//
// Config directory resolution and config.toml loading with startup
// validation. Invalid values never abort startup: they are reported as
// warnings and the default is kept.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::export::ExportScope;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for ScanLogs configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/scanlogs/ or %APPDATA%\ScanLogs\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

/// Platform default location of config.toml.
pub fn default_config_path() -> PathBuf {
    PlatformPaths::resolve().config_file()
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so a newer config file still loads.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[pagination]` section.
    pub pagination: PaginationSection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[pagination]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct PaginationSection {
    /// Rows per page.
    pub page_size: Option<i64>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// File name prefix overriding the per-view default.
    pub file_prefix: Option<String>,
    /// "page" or "filtered".
    pub scope: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub page_size: usize,
    /// `None` keeps the per-view default prefix.
    pub export_prefix: Option<String>,
    pub export_scope: ExportScope,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: constants::DEFAULT_PAGE_SIZE,
            export_prefix: None,
            export_scope: ExportScope::default(),
            log_level: None,
        }
    }
}

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Read and deserialise config.toml without validating values.
pub fn read_raw_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_page_size(value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value)
        .ok()
        .filter(|v| (constants::MIN_PAGE_SIZE..=constants::MAX_PAGE_SIZE).contains(v))
        .ok_or_else(|| ConfigError::ValueOutOfRange {
            field: "pagination.page_size".to_string(),
            value: value.to_string(),
            expected: format!("{}-{}", constants::MIN_PAGE_SIZE, constants::MAX_PAGE_SIZE),
        })
}

fn validate_prefix(value: &str) -> Result<Option<String>, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !allowed || value.len() > constants::MAX_EXPORT_PREFIX_LEN {
        return Err(ConfigError::ValueOutOfRange {
            field: "export.file_prefix".to_string(),
            value: value.to_string(),
            expected: format!(
                "up to {} characters from [A-Za-z0-9_-]",
                constants::MAX_EXPORT_PREFIX_LEN
            ),
        });
    }
    Ok(Some(value.to_string()))
}

fn validate_scope(value: &str) -> Result<ExportScope, ConfigError> {
    ExportScope::from_name(value).ok_or_else(|| ConfigError::ValueOutOfRange {
        field: "export.scope".to_string(),
        value: value.to_string(),
        expected: "\"page\" or \"filtered\"".to_string(),
    })
}

fn validate_log_level(value: &str) -> Result<String, ConfigError> {
    let lower = value.to_lowercase();
    if VALID_LOG_LEVELS.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        Err(ConfigError::ValueOutOfRange {
            field: "logging.level".to_string(),
            value: value.to_string(),
            expected: VALID_LOG_LEVELS.join(", "),
        })
    }
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults with one warning.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let raw = match read_raw_config(config_path) {
        Ok(raw) => raw,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let mut config = AppConfig::default();

    if let Some(size) = raw.pagination.page_size {
        match validate_page_size(size) {
            Ok(size) => config.page_size = size,
            Err(e) => warnings.push(format!(
                "{e}. Using default ({}).",
                constants::DEFAULT_PAGE_SIZE
            )),
        }
    }

    if let Some(ref prefix) = raw.export.file_prefix {
        match validate_prefix(prefix) {
            Ok(prefix) => config.export_prefix = prefix,
            Err(e) => warnings.push(format!("{e}. Using the default prefix.")),
        }
    }

    if let Some(ref scope) = raw.export.scope {
        match validate_scope(scope) {
            Ok(scope) => config.export_scope = scope,
            Err(e) => warnings.push(format!("{e}. Using default (page).")),
        }
    }

    if let Some(ref level) = raw.logging.level {
        match validate_log_level(level) {
            Ok(level) => config.log_level = Some(level),
            Err(e) => warnings.push(format!(
                "{e}. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL
            )),
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_config() {
        let file = write_config(
            "[pagination]\npage_size = 50\n\n[export]\nfile_prefix = \"course_logs\"\nscope = \"filtered\"\n\n[logging]\nlevel = \"DEBUG\"\n",
        );
        let (config, warnings) = load_config(file.path());
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.export_prefix.as_deref(), Some("course_logs"));
        assert_eq!(config.export_scope, ExportScope::Filtered);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_warn_and_keep_defaults() {
        let file = write_config(
            "[pagination]\npage_size = 0\n\n[export]\nfile_prefix = \"../etc\"\nscope = \"everything\"\n\n[logging]\nlevel = \"loud\"\n",
        );
        let (config, warnings) = load_config(file.path());
        assert_eq!(warnings.len(), 4);
        assert_eq!(config, AppConfig::default());
        assert!(warnings[0].contains("pagination.page_size"));
    }

    #[test]
    fn test_unparseable_file_warns() {
        let file = write_config("[pagination\npage_size = ");
        let (config, warnings) = load_config(file.path());
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Config parse error"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let file = write_config("[ui]\ntheme = \"dark\"\n[pagination]\npage_size = 10\n");
        let (config, warnings) = load_config(file.path());
        assert!(warnings.is_empty());
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_empty_prefix_keeps_default() {
        assert_eq!(validate_prefix("   ").unwrap(), None);
    }

    #[test]
    fn test_config_file_name() {
        let paths = PlatformPaths {
            config_dir: PathBuf::from("/tmp/scanlogs"),
        };
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/scanlogs/config.toml"));
    }
}

//! Telemetry and tracing utilities
//!
//! The crate only emits `tracing` events (targets `provision_licenses::http`
//! and `provision_licenses::provider`). Host applications that do not install
//! their own subscriber can use the helpers here.
//!
//! ## Example
//!
//! ```rust,ignore
//! use provision_licenses::telemetry::{init_subscriber, OutputFormat, SubscriberConfig};
//!
//! let config = SubscriberConfig::builder()
//!     .log_level(tracing::Level::DEBUG)
//!     .output_format(OutputFormat::Json)
//!     .log_file("logs/provision.log".into())
//!     .build();
//! let _guard = init_subscriber(config)?;
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

/// Environment variable holding the log level.
pub const LOG_LEVEL_VAR: &str = "PROVISION_LOG_LEVEL";
/// Environment variable holding the output format.
pub const LOG_FORMAT_VAR: &str = "PROVISION_LOG_FORMAT";
/// Environment variable holding the log file path.
pub const LOG_FILE_VAR: &str = "PROVISION_LOG_FILE";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Telemetry initialization failed: {0}")]
    Init(String),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format
    Json,
    /// Compact JSON format
    JsonCompact,
}

impl std::str::FromStr for OutputFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "json-compact" => Ok(OutputFormat::JsonCompact),
            _ => Err(TelemetryError::Init(format!(
                "Invalid log format: {s}. Valid options: text, json, json-compact"
            ))),
        }
    }
}

/// Configuration for tracing subscriber
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub log_level: tracing::Level,
    pub output_format: OutputFormat,
    /// Write to stdout
    pub enable_console: bool,
    /// Also write to this file
    pub log_file: Option<PathBuf>,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
            enable_console: true,
            log_file: None,
        }
    }
}

impl SubscriberConfig {
    pub fn builder() -> SubscriberConfigBuilder {
        SubscriberConfigBuilder::default()
    }

    /// Debug level, text output on the console.
    pub fn debug() -> Self {
        Self {
            log_level: tracing::Level::DEBUG,
            ..Self::default()
        }
    }

    /// Warnings and errors as JSON into `log_file` only.
    pub fn production(log_file: PathBuf) -> Self {
        Self {
            log_level: tracing::Level::WARN,
            output_format: OutputFormat::Json,
            enable_console: false,
            log_file: Some(log_file),
        }
    }

    /// Build from the raw values of the `PROVISION_LOG_*` variables.
    pub fn from_vars(
        level: Option<&str>,
        format: Option<&str>,
        file: Option<&str>,
    ) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(level) = level {
            builder = builder.log_level_str(level)?;
        }
        if let Some(format) = format {
            builder = builder.output_format(format.parse()?);
        }
        if let Some(file) = file.filter(|f| !f.trim().is_empty()) {
            builder = builder.log_file(PathBuf::from(file));
        }
        Ok(builder.build())
    }
}

/// Builder for SubscriberConfig
#[derive(Debug, Default)]
pub struct SubscriberConfigBuilder {
    log_level: Option<tracing::Level>,
    output_format: Option<OutputFormat>,
    enable_console: Option<bool>,
    log_file: Option<PathBuf>,
}

impl SubscriberConfigBuilder {
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set the log level from a string
    pub fn log_level_str(mut self, level: &str) -> Result<Self> {
        let parsed = match level.trim().to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => {
                return Err(TelemetryError::Init(format!(
                    "Invalid log level: {level}. Valid options: trace, debug, info, warn, error"
                )));
            }
        };
        self.log_level = Some(parsed);
        Ok(self)
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn enable_console(mut self, enable: bool) -> Self {
        self.enable_console = Some(enable);
        self
    }

    pub fn log_file(mut self, path: PathBuf) -> Self {
        self.log_file = Some(path);
        self
    }

    pub fn build(self) -> SubscriberConfig {
        SubscriberConfig {
            log_level: self.log_level.unwrap_or(tracing::Level::INFO),
            output_format: self.output_format.unwrap_or_default(),
            enable_console: self.enable_console.unwrap_or(true),
            log_file: self.log_file,
        }
    }
}

fn filter_directive(level: tracing::Level) -> String {
    format!("provision_licenses={}", level.as_str().to_lowercase())
}

fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| TelemetryError::Init(format!("Invalid log file path: {}", path.display())))?;
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|e| TelemetryError::Init(format!("Failed to open log file: {e}")))
}

/// Initialize tracing subscriber with the given configuration
///
/// Returns a [`WorkerGuard`] when file logging is enabled; keep it alive for
/// as long as logs should be flushed. An already installed global subscriber
/// is left in place.
pub fn init_subscriber(config: SubscriberConfig) -> Result<Option<WorkerGuard>> {
    let filter = filter_directive(config.log_level);

    let (writer, guard) = match &config.log_file {
        Some(path) => {
            let (file, guard) = tracing_appender::non_blocking(file_appender(path)?);
            let writer = if config.enable_console {
                BoxMakeWriter::new(file.and(std::io::stdout))
            } else {
                BoxMakeWriter::new(file)
            };
            (writer, Some(guard))
        }
        None if config.enable_console => (BoxMakeWriter::new(std::io::stdout), None),
        None => (BoxMakeWriter::new(std::io::sink), None),
    };
    let ansi = config.log_file.is_none();

    let init_result = match config.output_format {
        OutputFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .json()
            .try_init(),
        OutputFormat::JsonCompact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .json()
            .flatten_event(true)
            .try_init(),
        OutputFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(true)
            .try_init(),
    };

    match init_result {
        Ok(()) => Ok(guard),
        Err(e) => {
            let error_msg = e.to_string();
            if error_msg.contains("global default trace dispatcher has already been set") {
                Ok(None)
            } else {
                Err(TelemetryError::Init(format!(
                    "Failed to initialize tracing: {e}"
                )))
            }
        }
    }
}

/// Initialize tracing subscriber with default configuration
pub fn init_default() -> Result<Option<WorkerGuard>> {
    init_subscriber(SubscriberConfig::default())
}

/// Initialize tracing subscriber for debugging
pub fn init_debug() -> Result<Option<WorkerGuard>> {
    init_subscriber(SubscriberConfig::debug())
}

/// Initialize tracing subscriber for production
pub fn init_production(log_file: PathBuf) -> Result<Option<WorkerGuard>> {
    init_subscriber(SubscriberConfig::production(log_file))
}

/// Initialize tracing subscriber from environment variables
///
/// - `PROVISION_LOG_LEVEL`: trace, debug, info, warn, error
/// - `PROVISION_LOG_FORMAT`: text, json, json-compact
/// - `PROVISION_LOG_FILE`: log file path
pub fn init_from_env() -> Result<Option<WorkerGuard>> {
    let level = std::env::var(LOG_LEVEL_VAR).ok();
    let format = std::env::var(LOG_FORMAT_VAR).ok();
    let file = std::env::var(LOG_FILE_VAR).ok();

    let config = SubscriberConfig::from_vars(level.as_deref(), format.as_deref(), file.as_deref())?;
    init_subscriber(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = SubscriberConfig::builder().build();
        assert_eq!(config.log_level, tracing::Level::INFO);
        assert_eq!(config.output_format, OutputFormat::Text);
        assert!(config.enable_console);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn levels_parse_case_insensitively() {
        let config = SubscriberConfig::builder()
            .log_level_str("WARN")
            .unwrap()
            .build();
        assert_eq!(config.log_level, tracing::Level::WARN);
        assert!(SubscriberConfig::builder().log_level_str("loud").is_err());
    }

    #[test]
    fn formats_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "JSON-compact".parse::<OutputFormat>().unwrap(),
            OutputFormat::JsonCompact
        );
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn config_from_environment_values() {
        let config =
            SubscriberConfig::from_vars(Some("debug"), Some("json"), Some("/tmp/provision.log"))
                .unwrap();
        assert_eq!(config.log_level, tracing::Level::DEBUG);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/provision.log")));

        let config = SubscriberConfig::from_vars(None, None, Some("")).unwrap();
        assert!(config.log_file.is_none());

        assert!(SubscriberConfig::from_vars(Some("nope"), None, None).is_err());
    }

    #[test]
    fn filter_targets_this_crate() {
        assert_eq!(filter_directive(tracing::Level::DEBUG), "provision_licenses=debug");
    }

    #[test]
    fn file_appender_creates_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provision.log");

        file_appender(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn production_logs_to_file_only() {
        let config = SubscriberConfig::production(PathBuf::from("provision.log"));
        assert!(!config.enable_console);
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_init_default() {
        let _guard = init_default();
    }
}

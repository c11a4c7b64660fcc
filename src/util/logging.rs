//! Structured logging setup for toolharvest
//!
//! Console output goes to stderr so machine-readable command output on stdout
//! stays clean. `RUST_LOG`, when set, takes precedence over the configured
//! level. A dated log file can be added as a second writer.
//!
//! ```no_run
//! use toolharvest::util::{init_logging, LoggingConfig};
//! use tracing::Level;
//!
//! init_logging(LoggingConfig::with_level(Level::DEBUG));
//! tracing::info!("Application started");
//! ```

use chrono::Local;
use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use tracing::Level;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., toolharvest::pipeline) in logs
    pub include_target: bool,

    /// Directory for a `toolharvest_YYYYMMDD.log` file, if any
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            use_json: false,
            include_target: true,
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    pub fn with_json(mut self, use_json: bool) -> Self {
        self.use_json = use_json;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}

/// Parses a log level from a string
///
/// Accepts `warning` as an alias for `warn`. Unknown values fall back to WARN.
///
/// ```
/// use toolharvest::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("WARNING"), Level::WARN);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" | "critical" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to WARN. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::WARN
        }
    }
}

/// File name for today's log, e.g. `toolharvest_20250301.log`
pub fn log_file_name() -> String {
    format!("toolharvest_{}.log", Local::now().format("%Y%m%d"))
}

fn file_layer(dir: &Path, config: &LoggingConfig) -> io::Result<BoxedLayer> {
    std::fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(log_file_name()))?;

    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(config.include_target)
        .with_writer(Mutex::new(file));

    Ok(if config.use_json {
        layer.json().boxed()
    } else {
        layer.boxed()
    })
}

fn console_layer(config: &LoggingConfig) -> BoxedLayer {
    let layer = fmt::layer()
        .with_target(config.include_target)
        .with_writer(io::stderr);

    if config.use_json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

fn build_filter(level: Level) -> EnvFilter {
    let mut filter = EnvFilter::from_default_env();
    if env::var("RUST_LOG").is_err() {
        for directive in [
            format!("toolharvest={}", level),
            format!("genai={}", Level::WARN),
            format!("hyper={}", Level::WARN),
            format!("reqwest={}", Level::WARN),
        ] {
            if let Ok(directive) = directive.parse() {
                filter = filter.add_directive(directive);
            }
        }
    }
    filter
}

/// Initializes the logging system; later calls are ignored
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut layers = vec![console_layer(&config)];

        if let Some(dir) = &config.log_dir {
            match file_layer(dir, &config) {
                Ok(layer) => layers.push(layer),
                Err(e) => eprintln!(
                    "Failed to open log file in {}: {}; logging to console only",
                    dir.display(),
                    e
                ),
            }
        }

        // Another subscriber may already be installed, e.g. by a test harness
        let _ = tracing_subscriber::registry()
            .with(layers)
            .with(build_filter(config.level))
            .try_init();
    });
}

/// Initializes logging with a specific log level from string
pub fn with_level(level_str: &str) {
    init_logging(LoggingConfig::with_level(parse_level(level_str)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("info"), Level::INFO);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn test_parse_level_aliases_and_case() {
        assert_eq!(parse_level("WARNING"), Level::WARN);
        assert_eq!(parse_level("Debug"), Level::DEBUG);
        assert_eq!(parse_level(" info "), Level::INFO);
    }

    #[test]
    fn test_parse_level_invalid() {
        assert_eq!(parse_level("invalid"), Level::WARN);
        assert_eq!(parse_level(""), Level::WARN);
    }

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::WARN);
        assert!(!config.use_json);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_builders() {
        let config = LoggingConfig::with_level(Level::DEBUG)
            .with_json(true)
            .with_log_dir("logs");
        assert_eq!(config.level, Level::DEBUG);
        assert!(config.use_json);
        assert_eq!(config.log_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn test_log_file_name_is_dated() {
        let name = log_file_name();
        assert!(name.starts_with("toolharvest_"));
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "toolharvest_YYYYMMDD.log".len());
    }

    #[test]
    fn test_file_layer_creates_log_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let logs = dir.path().join("logs");
        let config = LoggingConfig::default().with_log_dir(&logs);

        assert!(file_layer(&logs, &config).is_ok());
        assert!(logs.join(log_file_name()).exists());
    }
}

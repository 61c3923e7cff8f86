//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration. Every network and database option can also be supplied
//! through the environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::*;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Plain,
    Json,
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Defaults: API on 127.0.0.1:8080, status on 127.0.0.1:8000
/// offer_api
///
/// # Flush every 250ms in 8 batches
/// offer_api --flush-interval-ms 250 --flush-group-count 8
///
/// # Settings from the environment
/// API_PORT=9090 DATABASE_PATH=/var/lib/offers.db offer_api
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "offer_api",
    version,
    about = "CRUD service for offers with a buffered batch-write pipeline."
)]
pub struct Opt {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, env = "LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Address the offer API listens on
    #[arg(long, env = "API_HOST", default_value = DEFAULT_API_HOST)]
    pub api_host: String,

    #[arg(long, env = "API_PORT", default_value_t = DEFAULT_API_PORT)]
    pub api_port: u16,

    /// Address the status server (health, version, metrics) listens on
    #[arg(long, env = "STATUS_HOST", default_value = DEFAULT_STATUS_HOST)]
    pub status_host: String,

    #[arg(long, env = "STATUS_PORT", default_value_t = DEFAULT_STATUS_PORT)]
    pub status_port: u16,

    /// Database path (SQLite file, created if missing)
    #[arg(long, env = "DATABASE_PATH", value_parser, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Maximum number of offers held by the saver between flushes
    #[arg(long, env = "SAVER_CAPACITY", default_value_t = DEFAULT_SAVER_CAPACITY)]
    pub saver_capacity: usize,

    /// Number of batches each flush is split into
    #[arg(long, env = "FLUSH_GROUP_COUNT", default_value_t = DEFAULT_FLUSH_GROUP_COUNT)]
    pub flush_group_count: usize,

    /// Period between saver flushes in milliseconds
    #[arg(long, env = "FLUSH_INTERVAL_MS", default_value_t = DEFAULT_FLUSH_INTERVAL_MS)]
    pub flush_interval_ms: u64,

    /// Pending event messages before publishers are rejected
    #[arg(long, env = "PRODUCER_QUEUE_CAPACITY", default_value_t = DEFAULT_PRODUCER_QUEUE_CAPACITY)]
    pub producer_queue_capacity: usize,

    /// Topic event messages are published to
    #[arg(long, env = "EVENTS_TOPIC", default_value = DEFAULT_EVENTS_TOPIC)]
    pub events_topic: String,

    #[arg(long, env = "PROJECT_NAME", default_value = DEFAULT_PROJECT_NAME)]
    pub project_name: String,

    #[arg(long, env = "PROJECT_ENVIRONMENT", default_value = DEFAULT_ENVIRONMENT)]
    pub environment: String,

    /// Report debug mode on the version endpoint
    #[arg(long, env = "PROJECT_DEBUG")]
    pub debug: bool,
}

/// Service configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use offer_api::Config;
///
/// let config = Config {
///     api_port: 9090,
///     saver_capacity: 500,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    pub api_host: String,
    pub api_port: u16,
    pub status_host: String,
    pub status_port: u16,
    pub db_path: PathBuf,
    pub saver_capacity: usize,
    pub flush_group_count: usize,
    pub flush_interval_ms: u64,
    pub producer_queue_capacity: usize,
    pub events_topic: String,
    pub project_name: String,
    pub environment: String,
    pub debug: bool,
}

impl Config {
    pub fn api_addr(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    pub fn status_addr(&self) -> String {
        format!("{}:{}", self.status_host, self.status_port)
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            api_host: DEFAULT_API_HOST.to_string(),
            api_port: DEFAULT_API_PORT,
            status_host: DEFAULT_STATUS_HOST.to_string(),
            status_port: DEFAULT_STATUS_PORT,
            db_path: PathBuf::from(DB_PATH),
            saver_capacity: DEFAULT_SAVER_CAPACITY,
            flush_group_count: DEFAULT_FLUSH_GROUP_COUNT,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            producer_queue_capacity: DEFAULT_PRODUCER_QUEUE_CAPACITY,
            events_topic: DEFAULT_EVENTS_TOPIC.to_string(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            debug: false,
        }
    }
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            log_level: opt.log_level,
            log_format: opt.log_format,
            api_host: opt.api_host,
            api_port: opt.api_port,
            status_host: opt.status_host,
            status_port: opt.status_port,
            db_path: opt.db_path,
            saver_capacity: opt.saver_capacity,
            flush_group_count: opt.flush_group_count,
            flush_interval_ms: opt.flush_interval_ms,
            producer_queue_capacity: opt.producer_queue_capacity,
            events_topic: opt.events_topic,
            project_name: opt.project_name,
            environment: opt.environment,
            debug: opt.debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_defaults_from_cli_match_config_default() {
        // Explicit empty argv; env vars with the same names could still leak in,
        // so only compare values no test environment sets.
        let opt = Opt::try_parse_from(["offer_api"]).expect("defaults should parse");
        let config = Config::from(opt);
        let default = Config::default();

        assert_eq!(config.saver_capacity, default.saver_capacity);
        assert_eq!(config.flush_group_count, default.flush_group_count);
        assert_eq!(config.flush_interval_ms, default.flush_interval_ms);
        assert_eq!(config.events_topic, default.events_topic);
    }

    #[test]
    fn test_cli_overrides() {
        let opt = Opt::try_parse_from([
            "offer_api",
            "--api-port",
            "9090",
            "--saver-capacity",
            "5",
            "--flush-interval-ms",
            "250",
            "--log-format",
            "json",
        ])
        .expect("arguments should parse");
        let config = Config::from(opt);

        assert_eq!(config.api_port, 9090);
        assert_eq!(config.saver_capacity, 5);
        assert_eq!(config.flush_interval(), Duration::from_millis(250));
        assert!(matches!(config.log_format, LogFormat::Json));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Opt::try_parse_from(["offer_api", "--api-port", "70000"]).is_err());
    }

    #[test]
    fn test_addresses() {
        let config = Config::default();
        assert_eq!(config.api_addr(), "127.0.0.1:8080");
        assert_eq!(config.status_addr(), "127.0.0.1:8000");
    }
}

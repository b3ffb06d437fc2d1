use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Instant;
use uuid::Uuid;

use crate::config::GatewayConfig;

static LOGGER: Lazy<ConsoleLogger> = Lazy::new(ConsoleLogger::default);

/// Installs the logger with settings read from the environment.
pub fn init() -> Result<(), String> {
    init_with_config(LoggerConfig::from_env())
}

pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    let filter = config.level.filter();
    LOGGER.configure(config);
    log::set_logger(&*LOGGER).map_err(|e| format!("Failed to set logger: {}", e))?;
    log::set_max_level(filter);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn badge(&self) -> (&'static str, &'static str, Color) {
        match self {
            LogLevel::Trace => ("🔍", "TRACE", Color::Cyan),
            LogLevel::Debug => ("🐛", "DEBUG", Color::Blue),
            LogLevel::Info => ("💡", "INFO", Color::Green),
            LogLevel::Warn => ("⚠️", "WARN", Color::Yellow),
            LogLevel::Error => ("❌", "ERROR", Color::Red),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.badge().1
    }

    pub fn filter(&self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("Unknown log level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    /// One JSON object per line, for piping into a collector.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

/// A rendered log record. `id` only tags log lines, it is never sent to the backend.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl LogEntry {
    fn from_record(record: &Record) -> Self {
        let location = match (record.file(), record.line()) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            _ => None,
        };
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            level: record.level().into(),
            target: record.target().to_string(),
            message: record.args().to_string(),
            location,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub colors: bool,
    pub emojis: bool,
    pub timestamps: bool,
    pub locations: bool,
    /// Plain-text copy of every line, appended to this file.
    pub file: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            colors: true,
            emojis: true,
            timestamps: true,
            locations: false,
            file: None,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `LOG_LEVEL`, `LOG_FORMAT`, `LOG_FILE` and `NO_COLOR`.
    /// Unparseable values keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(level) = env::var("LOG_LEVEL").ok().and_then(|v| v.parse().ok()) {
            config.level = level;
        }
        if let Some(format) = env::var("LOG_FORMAT").ok().and_then(|v| v.parse().ok()) {
            config = config.with_format(format);
        }
        if let Ok(path) = env::var("LOG_FILE") {
            if !path.trim().is_empty() {
                config.file = Some(PathBuf::from(path));
            }
        }
        if env::var_os("NO_COLOR").is_some() {
            config.colors = false;
        }
        config
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        if format == LogFormat::Json {
            self.colors = false;
            self.emojis = false;
        }
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    pub fn with_locations(mut self, enabled: bool) -> Self {
        self.locations = enabled;
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    fn render(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Json => {
                serde_json::to_string(entry).unwrap_or_else(|_| entry.message.clone())
            }
            LogFormat::Pretty => self.render_pretty(entry),
        }
    }

    fn render_pretty(&self, entry: &LogEntry) -> String {
        let (emoji, name, color) = entry.level.badge();
        let badge = if self.emojis {
            format!("{} {}", emoji, name)
        } else {
            name.to_string()
        };

        let mut parts = Vec::with_capacity(4);
        if self.timestamps {
            let ts = entry.timestamp.format("%H:%M:%S%.3f").to_string();
            parts.push(if self.colors { ts.dimmed().to_string() } else { ts });
        }
        parts.push(if self.colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        });
        parts.push(if self.colors {
            format!("{}:", entry.target.bright_blue())
        } else {
            format!("{}:", entry.target)
        });
        parts.push(entry.message.clone());

        let mut line = parts.join(" ");
        if let (true, Some(location)) = (self.locations, &entry.location) {
            line.push_str(&format!(" ({})", location));
        }
        line
    }
}

/// Writes to stderr so stdout stays free for command output.
#[derive(Default)]
struct ConsoleLogger {
    config: Mutex<LoggerConfig>,
    file: Mutex<Option<File>>,
}

impl ConsoleLogger {
    fn configure(&self, config: LoggerConfig) {
        let file = config.file.as_ref().and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => Some(file),
                Err(e) => {
                    eprintln!("Cannot open log file {}: {}", path.display(), e);
                    None
                }
            }
        });
        if let Ok(mut slot) = self.file.lock() {
            *slot = file;
        }
        if let Ok(mut slot) = self.config.lock() {
            *slot = config;
        }
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.config
            .lock()
            .map(|c| metadata.level() <= c.level.filter())
            .unwrap_or(true)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogEntry::from_record(record);
        let Ok(config) = self.config.lock() else {
            return;
        };
        eprintln!("{}", config.render(&entry));

        if let Ok(mut file) = self.file.lock() {
            if let Some(file) = file.as_mut() {
                let plain = config.clone().with_colors(false);
                let _ = writeln!(file, "{}", plain.render(&entry));
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
        if let Ok(mut file) = self.file.lock() {
            if let Some(file) = file.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// Logs how long a backend call took when dropped.
pub struct Timer {
    label: &'static str,
    started: Instant,
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::info!(
            "⏱️  {} took {}ms",
            self.label,
            self.started.elapsed().as_millis()
        );
    }
}

pub fn timer(label: &'static str) -> Timer {
    log::debug!("⏱️  {} started", label);
    Timer {
        label,
        started: Instant::now(),
    }
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!("💡 {}", format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!("⚠️  {}", format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!("❌ {}", format!($($arg)*))
    };
}

pub fn log_startup_info(app_name: &str, version: &str) {
    log::info!("🚀 Starting {} v{}", app_name, version);
}

/// Summarises the gateway configuration. The image host key is never printed.
pub fn log_config_info(config: &GatewayConfig) {
    log::info!("⚙️  Backend: {}", config.base_url());
    log::info!("⚙️  Inpaint schema: {}", config.inpaint_schema.as_str());
    log::debug!(
        "⚙️  Timeouts: generation {}s, listing {}s",
        config.generation_timeout.as_secs(),
        config.list_timeout.as_secs()
    );
    log::info!(
        "⚙️  Image host key: {}",
        if config.imgbb.api_key.is_some() { "set" } else { "missing" }
    );
}

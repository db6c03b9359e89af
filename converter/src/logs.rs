//! Run log for conversion progress.
//!
//! Pipeline stages report progress through a process-wide [`LogSink`].
//! Entries go to stderr, either as prefixed text lines or as one JSON
//! object per line for log collectors.

use std::io::Write;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Log level for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Render as a human-readable line.
    pub fn to_text(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// Output format of the run log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Prefixed text lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Sink settings, adjusted once at startup
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSettings {
    pub format: LogFormat,
    /// Suppress info and success entries
    pub quiet: bool,
}

/// Global run log
pub static LOG_SINK: Lazy<LogSink> = Lazy::new(LogSink::new);

/// Writes log entries to stderr according to [`LogSettings`]
pub struct LogSink {
    settings: RwLock<LogSettings>,
}

impl LogSink {
    pub fn new() -> Self {
        Self { settings: RwLock::new(LogSettings::default()) }
    }

    /// Replace the sink settings
    pub fn configure(&self, settings: LogSettings) {
        if let Ok(mut current) = self.settings.write() {
            *current = settings;
        }
    }

    pub fn settings(&self) -> LogSettings {
        self.settings.read().map(|s| *s).unwrap_or_default()
    }

    /// Write a log entry, unless filtered out by `quiet`
    pub fn log(&self, entry: LogEntry) {
        let settings = self.settings();
        if settings.quiet && matches!(entry.level, LogLevel::Info | LogLevel::Success) {
            return;
        }

        let line = match settings.format {
            LogFormat::Text => entry.to_text(),
            LogFormat::Json => match serde_json::to_string(&entry) {
                Ok(json) => json,
                Err(_) => entry.to_text(),
            },
        };

        // A closed stderr is not worth failing a conversion over
        let _ = writeln!(std::io::stderr().lock(), "{}", line);
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOG_SINK.log(LogEntry::info(msg).with_indent(indent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_rendering() {
        let entry = LogEntry::success("Read 3 rows");
        assert_eq!(entry.to_text(), "   ✓ Read 3 rows");

        let nested = LogEntry::info("CUSTOMER").with_indent(1);
        assert_eq!(nested.to_text(), "       CUSTOMER");
    }

    #[test]
    fn test_json_shape() {
        let entry = LogEntry::warning("no GDPR columns").with_indent(2);
        let json: serde_json::Value = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["level"], "warning");
        assert_eq!(json["message"], "no GDPR columns");
        assert_eq!(json["indent"], 2);
    }

    #[test]
    fn test_settings_roundtrip() {
        let sink = LogSink::new();
        assert_eq!(sink.settings().format, LogFormat::Text);

        sink.configure(LogSettings { format: LogFormat::Json, quiet: true });
        let settings = sink.settings();
        assert_eq!(settings.format, LogFormat::Json);
        assert!(settings.quiet);
    }
}

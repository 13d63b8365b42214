//! Lightweight leveled logging
//!
//! Diagnostics go to stderr so the report on stdout stays pipeable. Every
//! line carries the run ID once one is attached, which makes interleaved
//! output from repeated invocations attributable.

use chrono::Local;
use colored::Colorize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn label(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    run_id: Option<Uuid>,
}

impl Logger {
    pub fn new(debug: bool, use_color: bool) -> Self {
        Self {
            min_level: if debug { LogLevel::Debug } else { LogLevel::Info },
            use_color,
            run_id: None,
        }
    }

    /// Attach a run ID; subsequent lines carry it as a correlation tag
    pub fn with_run_id(mut self, run_id: Uuid) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Restrict output to warnings and errors; a no-op when debug
    /// logging was requested explicitly
    pub fn quieted(mut self) -> Self {
        if self.min_level == LogLevel::Info {
            self.min_level = LogLevel::Warn;
        }
        self
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        eprintln!("{}", self.format_line(level, message));
    }

    fn format_line(&self, level: LogLevel, message: &str) -> String {
        let timestamp = Local::now().format("%H:%M:%S%.3f");
        let label = if self.use_color {
            match level {
                LogLevel::Debug => level.label().dimmed().to_string(),
                LogLevel::Info => level.label().green().to_string(),
                LogLevel::Warn => level.label().yellow().to_string(),
                LogLevel::Error => level.label().red().bold().to_string(),
            }
        } else {
            level.label().to_string()
        };

        match self.run_id {
            Some(run_id) => format!("[{} {} {}] {}", timestamp, label, run_id, message),
            None => format!("[{} {}] {}", timestamp, label, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_format_line_without_run_id() {
        let logger = Logger::new(false, false);
        let line = logger.format_line(LogLevel::Info, "starting probes");
        assert!(line.contains("INFO"));
        assert!(line.contains("starting probes"));
    }

    #[test]
    fn test_quieted_threshold() {
        let logger = Logger::new(false, false).quieted();
        assert_eq!(logger.min_level, LogLevel::Warn);

        // Explicit debug wins over quiet
        let logger = Logger::new(true, false).quieted();
        assert_eq!(logger.min_level, LogLevel::Debug);
    }

    #[test]
    fn test_format_line_with_run_id() {
        let run_id = Uuid::new_v4();
        let logger = Logger::new(true, false).with_run_id(run_id);
        let line = logger.format_line(LogLevel::Debug, "probe complete");
        assert!(line.contains(&run_id.to_string()));
        assert!(line.contains("DEBUG"));
    }
}

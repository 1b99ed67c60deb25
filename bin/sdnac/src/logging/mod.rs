//! Configure process logging from CLI arguments and configuration.
use anyhow::Result;
use clap::Args;
use clap::ValueEnum;
use slog::Logger;

mod logger;

/// Enumerate valid log verbosity levels.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let level = sdnac_conf::LogLevel::from(*self);
        write!(f, "{}", level)
    }
}

impl From<LogLevel> for sdnac_conf::LogLevel {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Critical => sdnac_conf::LogLevel::Critical,
            LogLevel::Error => sdnac_conf::LogLevel::Error,
            LogLevel::Warning => sdnac_conf::LogLevel::Warning,
            LogLevel::Info => sdnac_conf::LogLevel::Info,
            LogLevel::Debug => sdnac_conf::LogLevel::Debug,
        }
    }
}

/// Logging-related options.
#[derive(Args, Debug)]
pub struct LogOpt {
    /// If provided, logs will be emitted to this file as JSON lines.
    #[arg(long = "log-file", name = "log-file", global = true, env = "SDNAC_LOG_FILE")]
    pub file: Option<String>,

    /// Verbosity level for process logs, overrides the configuration file.
    #[arg(long = "log-level", global = true, env = "SDNAC_LOG_LEVEL", value_enum)]
    pub level: Option<LogLevel>,
}

/// Initialise a logger based on the given CLI arguments and configured level.
pub fn configure(opt: &LogOpt, level: sdnac_conf::LogLevel) -> Result<Logger> {
    let level = slog_level(level);
    match &opt.file {
        Some(file) => self::logger::file(file, level),
        None => Ok(self::logger::terminal(level)),
    }
}

/// Map configured verbosity levels onto [`slog::Level`]s.
fn slog_level(level: sdnac_conf::LogLevel) -> slog::Level {
    match level {
        sdnac_conf::LogLevel::Critical => slog::Level::Critical,
        sdnac_conf::LogLevel::Error => slog::Level::Error,
        sdnac_conf::LogLevel::Warning => slog::Level::Warning,
        sdnac_conf::LogLevel::Info => slog::Level::Info,
        sdnac_conf::LogLevel::Debug => slog::Level::Debug,
    }
}

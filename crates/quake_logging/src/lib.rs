#![deny(missing_docs)]
//! Shared logging utilities for the quake feed workspace.
//!
//! Code logs through the `quake_*` macros, which forward to the `log` facade.
//! Binaries install a backend once with [`initialize`]; test binaries use
//! [`initialize_for_tests`].

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Default log file, relative to the current working directory.
pub const LOG_FILE: &str = "./quake.log";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! quake_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! quake_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! quake_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! quake_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! quake_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Where log records go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// The log file only.
    File,
    /// The terminal only.
    Terminal,
    /// Terminal and log file.
    Both,
}

impl LogDestination {
    fn to_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }

    fn to_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }
}

/// Logger setup for a binary.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Where records go.
    pub destination: LogDestination,
    /// Most verbose level recorded.
    pub level: LevelFilter,
    /// File written when the destination includes a file; truncated on start.
    pub file: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            destination: LogDestination::Both,
            level: LevelFilter::Info,
            file: PathBuf::from(LOG_FILE),
        }
    }
}

/// Installs the global logger described by `settings`.
///
/// Returns `false` if nothing was installed: no backend could be created or
/// a logger was already set. A log file that cannot be created is reported
/// on stderr and the terminal backend, if any, is still installed.
pub fn initialize(settings: &LogSettings) -> bool {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut backends: Vec<Box<dyn SharedLogger>> = Vec::new();
    if settings.destination.to_terminal() {
        backends.push(terminal(settings.level, config.clone()));
    }
    if settings.destination.to_file() {
        match File::create(&settings.file) {
            Ok(file) => backends.push(WriteLogger::new(settings.level, config, file)),
            Err(err) => eprintln!(
                "Warning: Could not create log file at {:?}: {}",
                settings.file, err
            ),
        }
    }

    !backends.is_empty() && CombinedLogger::init(backends).is_ok()
}

/// Installs a terminal logger for tests; a no-op once any logger is set.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = CombinedLogger::init(vec![terminal(level, Config::default())]);
}

fn terminal(level: LevelFilter, config: Config) -> Box<TermLogger> {
    TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}

// WHOIS Bot - Systemd-Style Logger
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Systemd-style logging compatible with journald
//!
//! Messages go to stderr so that console replies on stdout stay clean. In
//! journald mode every message is emitted as a block of `KEY=value` fields.

use std::sync::OnceLock;

use chrono::Local;

/// Log levels following syslog priority numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

impl LogLevel {
    pub fn priority(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERR",
            LogLevel::Warning => "WARNING",
            LogLevel::Notice => "NOTICE",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    fn color_code(self) -> &'static str {
        match self {
            LogLevel::Error => "\x1b[31m",
            LogLevel::Warning => "\x1b[33m",
            LogLevel::Notice => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Debug => "\x1b[37m",
        }
    }
}

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Least severe level that is still written
    pub min_level: LogLevel,
    pub use_colors: bool,
    pub include_timestamp: bool,
    /// Adds `CODE_MODULE=` in journald mode and a `module:` prefix otherwise
    pub include_target: bool,
    pub journald_format: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            use_colors: atty::is(atty::Stream::Stderr),
            include_timestamp: true,
            include_target: false,
            journald_format: false,
        }
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

#[derive(Debug)]
pub struct Logger {
    config: LoggerConfig,
}

impl Logger {
    pub fn new(config: LoggerConfig) -> Self {
        Self { config }
    }

    /// Install the process-wide logger. Can only be done once.
    pub fn init(config: LoggerConfig) -> Result<(), LoggerError> {
        LOGGER
            .set(Self::new(config))
            .map_err(|_| LoggerError::AlreadyInitialized)
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.config.min_level
    }

    pub fn log(&self, level: LogLevel, target: &str, message: &str) {
        if !self.should_log(level) {
            return;
        }
        eprintln!("{}", self.format(level, target, message));
    }

    fn format(&self, level: LogLevel, target: &str, message: &str) -> String {
        if self.config.journald_format {
            self.format_journald(level, target, message)
        } else {
            self.format_terminal(level, target, message)
        }
    }

    fn format_journald(&self, level: LogLevel, target: &str, message: &str) -> String {
        let mut output = format!("PRIORITY={}\nMESSAGE={}\n", level.priority(), message);
        if self.config.include_target && !target.is_empty() {
            output.push_str(&format!("CODE_MODULE={}\n", target));
        }
        output.push_str("SYSLOG_IDENTIFIER=whois-bot\n");
        output
    }

    fn format_terminal(&self, level: LogLevel, target: &str, message: &str) -> String {
        let mut output = String::new();

        if self.config.include_timestamp {
            output.push_str(&Local::now().format("%Y-%m-%d %H:%M:%S ").to_string());
        }

        // Status lines ("[   OK   ] ...") carry their own marker, so only color them
        let has_status = message.starts_with("[*]")
            || message.starts_with("[   OK   ]")
            || message.starts_with("[  FAILED ]")
            || message.starts_with("[   WARN ]");

        let body = if self.config.include_target && !target.is_empty() {
            format!("{}: {}", target, message)
        } else {
            message.to_string()
        };

        match (has_status, self.config.use_colors) {
            (true, true) => output.push_str(&format!("{}{}\x1b[0m", level.color_code(), body)),
            (true, false) => output.push_str(&body),
            (false, true) => output.push_str(&format!(
                "{}[{}]\x1b[0m {}",
                level.color_code(),
                level.as_str(),
                body
            )),
            (false, false) => output.push_str(&format!("[{}] {}", level.as_str(), body)),
        }

        output
    }
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Error, module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Warning, module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_notice {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Notice, module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Info, module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Debug, module_path!(), &format!($($arg)*))
    };
}

/// Write through the global logger; a no-op before `Logger::init`
pub fn log_with_level(level: LogLevel, target: &str, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(level, target, message);
    }
}

pub fn log_init_start(service_name: &str) {
    log_with_level(
        LogLevel::Notice,
        module_path!(),
        &format!("[*] Starting {}...", service_name),
    );
}

pub fn log_init_ok_with_details(service_name: &str, details: &str) {
    log_with_level(
        LogLevel::Info,
        module_path!(),
        &format!("[   OK   ] Starting {} ({})", service_name, details),
    );
}

pub fn log_init_failed(service_name: &str, error: &str) {
    log_with_level(
        LogLevel::Error,
        module_path!(),
        &format!("[  FAILED ] Starting {} - {}", service_name, error),
    );
}

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Logger already initialized")]
    AlreadyInitialized,
}

/// Initialize the logger from CLI flags
pub fn init_from_args(debug: bool, journald: bool) -> Result<(), LoggerError> {
    let config = LoggerConfig {
        min_level: if debug { LogLevel::Debug } else { LogLevel::Info },
        use_colors: atty::is(atty::Stream::Stderr) && !journald,
        include_timestamp: !journald,
        include_target: debug,
        journald_format: journald,
    };

    Logger::init(config)
}

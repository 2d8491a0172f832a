#![deny(missing_docs)]
//! Shared logging utilities for the codeshift workspace.
//!
//! This crate provides the `shift_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every line is tagged
//! with the conversion session that was current on the logging thread, so
//! records from a superseded stream are easy to tell apart.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the current conversion session id.
    static SESSION: Cell<u64> = const { Cell::new(0) };
}

/// Sets the conversion session id for the current thread.
/// Called by the session controller whenever a new conversion starts.
pub fn set_session(session: u64) {
    SESSION.with(|v| v.set(session));
}

/// Retrieves the conversion session id for the current thread.
/// Returns 0 before any conversion has started.
pub fn current_session() -> u64 {
    SESSION.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current session.
#[macro_export]
macro_rules! shift_trace {
    ($($arg:tt)*) => {{
        log::trace!("[s{}] {}", $crate::current_session(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current session.
#[macro_export]
macro_rules! shift_debug {
    ($($arg:tt)*) => {{
        log::debug!("[s{}] {}", $crate::current_session(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current session.
#[macro_export]
macro_rules! shift_info {
    ($($arg:tt)*) => {{
        log::info!("[s{}] {}", $crate::current_session(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current session.
#[macro_export]
macro_rules! shift_warn {
    ($($arg:tt)*) => {{
        log::warn!("[s{}] {}", $crate::current_session(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current session.
#[macro_export]
macro_rules! shift_error {
    ($($arg:tt)*) => {{
        log::error!("[s{}] {}", $crate::current_session(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may have installed the logger already.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

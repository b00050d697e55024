#![deny(missing_docs)]
//! Shared logging utilities for the finder workspace.
//!
//! This crate provides the `finder_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every line logged
//! through the macros is tagged with the search generation that was current
//! on the logging thread, so interleaved ticks and stale responses can be told
//! apart in `finder.log`.

use std::cell::Cell;

#[doc(hidden)]
pub use log as __log;

thread_local! {
    /// Search generation active on this thread; 0 means no search has started.
    static SEARCH_GENERATION: Cell<u64> = const { Cell::new(0) };
}

/// Sets the search generation reported by the logging macros on this thread.
/// The host loop calls this after each dispatched message.
pub fn set_search_generation(generation: u64) {
    SEARCH_GENERATION.with(|v| v.set(generation));
}

/// Returns the search generation for the current thread, or 0 if none was set.
pub fn current_search_generation() -> u64 {
    SEARCH_GENERATION.with(|v| v.get())
}

#[doc(hidden)]
#[macro_export]
macro_rules! __finder_log {
    ($level:expr, $($arg:tt)*) => {{
        let generation = $crate::current_search_generation();
        if generation == 0 {
            $crate::__log::log!($level, $($arg)*);
        } else {
            $crate::__log::log!(
                $level,
                "[search #{}] {}",
                generation,
                format_args!($($arg)*)
            );
        }
    }};
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! finder_trace {
    ($($arg:tt)*) => {{
        $crate::__finder_log!($crate::__log::Level::Trace, $($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! finder_debug {
    ($($arg:tt)*) => {{
        $crate::__finder_log!($crate::__log::Level::Debug, $($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! finder_info {
    ($($arg:tt)*) => {{
        $crate::__finder_log!($crate::__log::Level::Info, $($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! finder_warn {
    ($($arg:tt)*) => {{
        $crate::__finder_log!($crate::__log::Level::Warn, $($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! finder_error {
    ($($arg:tt)*) => {{
        $crate::__finder_log!($crate::__log::Level::Error, $($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already own the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

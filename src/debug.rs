//! Debug logging
//!
//! Debug output is switched on once per process, either by the `--debug`
//! flag or by `BUILDSTAMP_DEBUG`. While it is off, the `debug!` macro costs
//! a single atomic load.

use std::sync::OnceLock;

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// Turn debug output on or off for the rest of the process.
///
/// The first call wins; `BUILDSTAMP_DEBUG` can only enable, never disable.
pub fn init_debug(flag: bool) {
    let enabled = flag || crate::env_vars::debug_requested();
    if DEBUG_ENABLED.set(enabled).is_err() {
        debug_log("debug mode already initialized");
    }
}

/// Whether debug output is on
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.get().copied().unwrap_or(false)
}

/// Print a debug line
pub fn debug_log(message: &str) {
    if is_debug_enabled() {
        eprintln!("[DEBUG] {message}");
    }
}

/// Print a debug line from pre-formatted arguments
pub fn debug_logf(args: std::fmt::Arguments<'_>) {
    if is_debug_enabled() {
        eprintln!("[DEBUG] {args}");
    }
}

/// Usage: `debug!("resolved {} extensions", n)`
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::debug::debug_logf(format_args!($($arg)*))
    };
}

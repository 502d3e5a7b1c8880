//! Environment variable handling.

use std::env;

// Helper for boolean environment variables that accept "1", "true", "yes"
fn is_enabled(var: &str) -> bool {
    env::var(var).ok().is_some_and(|s| parse_flag(&s))
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    value == "1" || value == "true" || value == "yes"
}

/// Intermediate-source compiler program (`CYTHON`).
pub fn cython() -> Option<String> {
    env::var("CYTHON").ok().filter(|s| !s.trim().is_empty())
}

/// Git executable (`GIT`), used for `git describe`.
pub fn git() -> Option<String> {
    env::var("GIT").ok().filter(|s| !s.trim().is_empty())
}

/// Whether `BUILDSTAMP_DEBUG` asks for debug output.
pub fn debug_requested() -> bool {
    is_enabled("BUILDSTAMP_DEBUG")
}

/// Whether `BUILDSTAMP_NO_HOOK` disables post-checkout hook installation.
pub fn skip_hook() -> bool {
    is_enabled("BUILDSTAMP_NO_HOOK")
}

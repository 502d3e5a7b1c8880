//! Common test utilities and helpers
//!
//! This module provides shared functionality used across integration tests:
//! - Binary path resolution (via `get_buildstamp_binary`)
//! - Project fixtures (via `helpers`)

pub(crate) mod helpers;

// Re-export get_buildstamp_binary for convenient access
#[allow(unused_imports)]
pub(crate) use helpers::get_buildstamp_binary;

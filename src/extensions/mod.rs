//! Native extension selection
//!
//! Decides how accelerated extensions get their native sources:
//! - every target already has a `.c`/`.cpp` sibling: use those
//! - otherwise: run the intermediate compiler (Cython)
//! - compiler missing: warn and build no accelerated extensions
//!
//! Also derives the glob patterns for leftover generated artifacts.

pub mod builder;
pub mod cleanup;
pub mod cython;
pub mod detector;
pub mod generator;
pub mod types;

pub use builder::{ResolvedExtensions, resolve_extensions};
pub use cleanup::{CleanupError, CleanupManifest};
pub use cython::CythonCompiler;
pub use detector::{count_already_generated, has_native_sibling, select_build_strategy};
pub use generator::{
    GenerateError, IntermediateCompiler, degraded_warning, generate, regenerate, use_existing,
};
pub use types::{BuildStrategy, ExtensionTarget, Language, is_intermediate};

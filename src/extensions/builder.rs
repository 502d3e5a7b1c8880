//! Extension resolution
//!
//! Coordinates detection and translation: picks a [`BuildStrategy`], then
//! either generates native sources or reuses the ones on disk.

use super::detector::select_build_strategy;
use super::generator::{GenerateError, IntermediateCompiler, generate, use_existing};
use super::types::{BuildStrategy, ExtensionTarget};
use crate::diagnostics::DiagnosticSink;
use std::path::Path;

/// Extensions ready for the packaging tool, and how they were obtained
#[derive(Debug, Clone)]
pub struct ResolvedExtensions {
    pub strategy: BuildStrategy,
    pub targets: Vec<ExtensionTarget>,
}

impl ResolvedExtensions {
    /// Whether acceleration was dropped because the compiler was missing
    #[must_use]
    pub fn degraded(&self, requested: usize) -> bool {
        self.strategy == BuildStrategy::Generate && self.targets.len() < requested
    }
}

/// Turn declared targets into buildable extension descriptors
///
/// The compiler is only consulted when some target lacks a native sibling.
pub fn resolve_extensions(
    root: &Path,
    targets: &[ExtensionTarget],
    compiler: &dyn IntermediateCompiler,
    diagnostics: &dyn DiagnosticSink,
) -> Result<ResolvedExtensions, GenerateError> {
    let strategy = select_build_strategy(root, targets);
    crate::debug!(
        "{} declared extension(s), strategy: {}",
        targets.len(),
        strategy.description()
    );

    let resolved = match strategy {
        BuildStrategy::Generate => generate(targets, compiler, diagnostics)?,
        BuildStrategy::UseExisting => use_existing(targets),
    };

    for target in &resolved {
        crate::debug!(
            "extension {} ({}): {}",
            target.name(),
            target.language().description(),
            target
                .sources()
                .iter()
                .map(|s| s.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(ResolvedExtensions {
        strategy,
        targets: resolved,
    })
}

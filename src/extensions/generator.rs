//! Intermediate-to-native translation
//!
//! The intermediate compiler is an optional collaborator. When it is missing
//! the package still builds: no accelerated extensions are produced and the
//! pure fallbacks are used instead. When it is present, translation errors
//! are real errors.

use super::types::ExtensionTarget;
use crate::diagnostics::DiagnosticSink;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{program} is required to generate native sources but was not found")]
    Unavailable { program: String },

    #[error("failed to run {program} on {}: {source}", path.display())]
    Spawn {
        program: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{program} failed on {} ({status}):\n{stderr}", path.display())]
    Translate {
        program: String,
        path: PathBuf,
        status: String,
        stderr: String,
    },
}

/// Translates intermediate sources into native sources
pub trait IntermediateCompiler {
    /// Program name used in messages
    fn name(&self) -> String;

    /// Capability probe, checked before any translation is attempted
    fn is_available(&self) -> bool;

    /// Translate every intermediate source of `targets`
    ///
    /// Returns targets pointing at the generated native files.
    fn compile(&self, targets: &[ExtensionTarget]) -> Result<Vec<ExtensionTarget>, GenerateError>;
}

/// Warning shown when native acceleration is unavailable
#[must_use]
pub fn degraded_warning(program: &str) -> String {
    format!(
        "{program}, required to generate fast native code, was not found on this system.\n\
         Only the slower pure fallback implementations will be available.\n\
         To use the fast implementations either:\n\
         a) install {program} and re-run the build,\n\
         b) use a source distribution that ships generated C sources,\n\
         c) use a binary distribution (wheel)."
    )
}

/// Generate native sources, degrading to no extensions without a compiler
///
/// A missing compiler produces exactly one warning and an empty list.
pub fn generate(
    targets: &[ExtensionTarget],
    compiler: &dyn IntermediateCompiler,
    diagnostics: &dyn DiagnosticSink,
) -> Result<Vec<ExtensionTarget>, GenerateError> {
    if !compiler.is_available() {
        diagnostics.warn(&degraded_warning(&compiler.name()));
        return Ok(Vec::new());
    }

    crate::debug!("translating {} extension(s) with {}", targets.len(), compiler.name());
    compiler.compile(targets)
}

/// Point intermediate sources at their native siblings
///
/// Pure path substitution: only sources in the intermediate form change, and
/// the sibling extension follows each target's language.
#[must_use]
pub fn use_existing(targets: &[ExtensionTarget]) -> Vec<ExtensionTarget> {
    targets
        .iter()
        .map(|target| {
            let sources = target
                .sources()
                .iter()
                .map(|source| {
                    if super::types::is_intermediate(source) {
                        target.native_sibling(source)
                    } else {
                        source.clone()
                    }
                })
                .collect();
            target.with_sources(sources)
        })
        .collect()
}

/// Translate all targets unconditionally
///
/// Unlike [`generate`], a missing compiler is an error here.
pub fn regenerate(
    targets: &[ExtensionTarget],
    compiler: &dyn IntermediateCompiler,
) -> Result<Vec<ExtensionTarget>, GenerateError> {
    if !compiler.is_available() {
        return Err(GenerateError::Unavailable {
            program: compiler.name(),
        });
    }

    compiler.compile(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingDiagnostics;
    use crate::extensions::types::Language;
    use std::cell::Cell;

    struct FakeCompiler {
        available: bool,
        calls: Cell<usize>,
    }

    impl FakeCompiler {
        fn new(available: bool) -> Self {
            Self {
                available,
                calls: Cell::new(0),
            }
        }
    }

    impl IntermediateCompiler for FakeCompiler {
        fn name(&self) -> String {
            "fakec".to_string()
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn compile(
            &self,
            targets: &[ExtensionTarget],
        ) -> Result<Vec<ExtensionTarget>, GenerateError> {
            self.calls.set(self.calls.get() + 1);
            Ok(use_existing(targets))
        }
    }

    fn targets() -> Vec<ExtensionTarget> {
        vec![
            ExtensionTarget::new("pkg.fast", ["pkg/fast.pyx", "pkg/helper.c"], Language::C),
            ExtensionTarget::new("pkg.faster", ["pkg/faster.py"], Language::Cpp),
        ]
    }

    #[test]
    fn missing_compiler_degrades_with_one_warning() {
        let compiler = FakeCompiler::new(false);
        let diagnostics = RecordingDiagnostics::new();

        let result = generate(&targets(), &compiler, &diagnostics).unwrap();

        assert!(result.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.messages()[0].contains("fakec"));
        assert_eq!(compiler.calls.get(), 0);
    }

    #[test]
    fn available_compiler_is_used() {
        let compiler = FakeCompiler::new(true);
        let diagnostics = RecordingDiagnostics::new();

        let result = generate(&targets(), &compiler, &diagnostics).unwrap();

        assert_eq!(result.len(), 2);
        assert!(diagnostics.is_empty());
        assert_eq!(compiler.calls.get(), 1);
    }

    #[test]
    fn use_existing_rewrites_only_intermediate_sources() {
        let result = use_existing(&targets());

        assert_eq!(
            result[0].sources(),
            &[PathBuf::from("pkg/fast.c"), PathBuf::from("pkg/helper.c")]
        );
        assert_eq!(result[1].sources(), &[PathBuf::from("pkg/faster.cpp")]);
        assert_eq!(result[0].name(), "pkg.fast");
        assert_eq!(result[1].language(), Language::Cpp);
    }

    #[test]
    fn regenerate_requires_compiler() {
        let compiler = FakeCompiler::new(false);
        let err = regenerate(&targets(), &compiler).unwrap_err();

        assert!(matches!(err, GenerateError::Unavailable { .. }));
        assert!(err.to_string().contains("fakec"));
    }
}

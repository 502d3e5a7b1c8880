//! Cython translation
//!
//! Runs the `cython` command line tool once per intermediate source:
//! ```bash
//! cython -3 -o pkg/fast.c pkg/fast.pyx
//! cython -3 --cplus -o pkg/faster.cpp pkg/faster.pyx
//! ```

use super::generator::{GenerateError, IntermediateCompiler};
use super::types::{ExtensionTarget, Language, is_intermediate};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default program name when nothing else is configured
pub const DEFAULT_PROGRAM: &str = "cython";

/// Intermediate compiler backed by the `cython` executable
#[derive(Debug, Clone)]
pub struct CythonCompiler {
    /// Program to run
    program: PathBuf,
    /// Project root; sources are relative to it
    root: PathBuf,
}

impl CythonCompiler {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            root: root.into(),
        }
    }

    /// Resolve the program to run
    ///
    /// Priority order:
    /// 1. `CYTHON` environment variable
    /// 2. `configured` (the `[compiler] program` config key)
    /// 3. `cython` on PATH
    #[must_use]
    pub fn locate(configured: Option<&str>, root: &Path) -> Self {
        let program = crate::env_vars::cython()
            .or_else(|| configured.map(ToString::to_string))
            .unwrap_or_else(|| DEFAULT_PROGRAM.to_string());

        Self::new(program, root)
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Translate one source, returning the generated path relative to root
    fn translate(&self, source: &Path, language: Language) -> Result<PathBuf, GenerateError> {
        let output_path = source.with_extension(language.native_extension());

        let mut cmd = Command::new(&self.program);
        cmd.arg("-3");
        if language == Language::Cpp {
            cmd.arg("--cplus");
        }
        cmd.arg("-o").arg(&output_path).arg(source);
        cmd.current_dir(&self.root);

        crate::debug!(
            "running {} on {} -> {}",
            self.program.display(),
            source.display(),
            output_path.display()
        );

        let output = cmd.output().map_err(|e| GenerateError::Spawn {
            program: self.name(),
            path: source.to_path_buf(),
            source: e,
        })?;

        if !output.status.success() {
            return Err(GenerateError::Translate {
                program: self.name(),
                path: source.to_path_buf(),
                status: output
                    .status
                    .code()
                    .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output_path)
    }
}

impl IntermediateCompiler for CythonCompiler {
    fn name(&self) -> String {
        self.program.display().to_string()
    }

    fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .is_ok_and(|output| output.status.success())
    }

    fn compile(&self, targets: &[ExtensionTarget]) -> Result<Vec<ExtensionTarget>, GenerateError> {
        targets
            .iter()
            .map(|target| {
                let sources = target
                    .sources()
                    .iter()
                    .map(|source| {
                        if is_intermediate(source) {
                            self.translate(source, target.language())
                        } else {
                            Ok(source.clone())
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(target.with_sources(sources))
            })
            .collect()
    }
}

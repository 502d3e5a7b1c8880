//! Command implementations
//!
//! Each command loads the project once through [`Project`] and works on its
//! root and configuration.

use anyhow::{Context, Result};
use buildstamp::{
    Config, FileVersionStore, ResolvedExtensions, StderrDiagnostics, resolve_extensions,
};
use std::path::{Path, PathBuf};

pub(crate) mod clean;
pub(crate) mod completion;
pub(crate) mod hook;
pub(crate) mod package;
pub(crate) mod plan;
pub(crate) mod regenerate;
pub(crate) mod version;

/// Project root plus its loaded configuration
#[derive(Debug)]
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl Project {
    pub(crate) fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("Project root not found: {}", root.display()))?;
        let config = Config::load_with_options(&root, config_path)?;

        Ok(Self { root, config })
    }

    /// Handle to the configured version file
    pub(crate) fn version_store(&self) -> FileVersionStore {
        FileVersionStore::new(self.root.join(&self.config.version_file))
    }

    /// Resolve the configured extensions, warning on stderr when degraded
    pub(crate) fn resolve(&self) -> Result<ResolvedExtensions> {
        let compiler = self.config.compiler(&self.root);
        resolve_extensions(
            &self.root,
            &self.config.extensions,
            &compiler,
            &StderrDiagnostics,
        )
        .context("Failed to prepare native extensions")
    }
}

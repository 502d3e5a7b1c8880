//! Leftover artifact patterns
//!
//! Switching branches can leave generated sources and compiled modules from
//! another checkout next to the intermediate sources. The manifest lists
//! glob patterns for those artifacts; the post-checkout hook and the `clean`
//! command consume it.

use super::types::ExtensionTarget;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffixes appended to an intermediate source stem
const ARTIFACT_SUFFIXES: [&str; 3] = [".c*", ".cpython-*.so", ".cpython-*.pyd"];

#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("invalid cleanup pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to scan for artifacts: {0}")]
    Scan(#[from] glob::GlobError),

    #[error("failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Glob patterns for generated and compiled artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupManifest {
    /// Intermediate source paths without extension
    stems: Vec<PathBuf>,
}

impl CleanupManifest {
    /// Derive artifact stems from the intermediate-form targets
    ///
    /// Targets whose first source is already native contribute nothing.
    #[must_use]
    pub fn from_targets(root: &Path, targets: &[ExtensionTarget]) -> Self {
        let stems = targets
            .iter()
            .filter(|target| target.needs_translation())
            .filter_map(ExtensionTarget::primary_source)
            .map(|source| root.join(source.with_extension("")))
            .collect();

        Self { stems }
    }

    /// Literal path prefix and wildcard suffix of every pattern
    ///
    /// The prefix is a plain path and must be escaped by whoever turns it
    /// back into a pattern (glob syntax, shell words).
    pub fn parts(&self) -> impl Iterator<Item = (&Path, &'static str)> {
        self.stems.iter().flat_map(|stem| {
            ARTIFACT_SUFFIXES
                .iter()
                .map(move |suffix| (stem.as_path(), *suffix))
        })
    }

    /// Glob patterns, with the literal prefix escaped
    #[must_use]
    pub fn patterns(&self) -> Vec<String> {
        self.parts()
            .map(|(stem, suffix)| {
                format!("{}{suffix}", glob::Pattern::escape(&stem.to_string_lossy()))
            })
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    /// Files currently matching any pattern, sorted and deduplicated
    ///
    /// Directories that cannot be read are an error, not an empty match.
    pub fn expand(&self) -> Result<Vec<PathBuf>, CleanupError> {
        let mut matches = Vec::new();

        for pattern in self.patterns() {
            let paths = glob::glob(&pattern).map_err(|e| CleanupError::Pattern {
                pattern: pattern.clone(),
                source: e,
            })?;
            for path in paths {
                let path = path?;
                if path.is_file() {
                    matches.push(path);
                }
            }
        }

        matches.sort();
        matches.dedup();
        Ok(matches)
    }

    /// Delete every matching file, returning what was removed
    pub fn remove(&self) -> Result<Vec<PathBuf>, CleanupError> {
        let matches = self.expand()?;

        for path in &matches {
            std::fs::remove_file(path).map_err(|e| CleanupError::Remove {
                path: path.clone(),
                source: e,
            })?;
        }

        Ok(matches)
    }
}

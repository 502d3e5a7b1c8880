//! Build plan for the packaging tool
//!
//! Collects everything the packaging tool needs in one JSON document: the
//! (possibly stamped) version, the resolved extensions, the package list and
//! the descriptive metadata.

use crate::config::Config;
use crate::extensions::{BuildStrategy, CleanupManifest, ExtensionTarget};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

/// Marker file that makes a directory a package
const PACKAGE_MARKER: &str = "__init__.py";

/// Everything handed to the packaging tool
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub name: String,
    pub version: String,
    pub generated_at: String,
    pub strategy: BuildStrategy,
    pub ext_modules: Vec<ExtensionTarget>,
    pub packages: Vec<String>,
    pub package_data: BTreeMap<String, Vec<String>>,
    pub install_requires: Vec<String>,
    pub metadata: Metadata,
    pub cleanup: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Metadata {
    pub description: Option<String>,
    pub license: Option<String>,
    pub url: Option<String>,
    pub keywords: Vec<String>,
    pub classifiers: Vec<String>,
}

impl BuildPlan {
    /// Assemble the plan for a project
    pub fn assemble(
        root: &Path,
        config: &Config,
        version: &str,
        strategy: BuildStrategy,
        ext_modules: Vec<ExtensionTarget>,
    ) -> Result<Self> {
        let packages = if config.packages.is_empty() {
            match &config.package_root {
                Some(package_root) => discover_packages(root, package_root)?,
                None => Vec::new(),
            }
        } else {
            config.packages.clone()
        };

        Ok(Self {
            name: config.name.clone(),
            version: version.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            strategy,
            ext_modules,
            packages,
            package_data: config.package_data.clone(),
            install_requires: config.install_requires.clone(),
            metadata: Metadata {
                description: config.description.clone(),
                license: config.license.clone(),
                url: config.url.clone(),
                keywords: config.keywords.clone(),
                classifiers: config.classifiers.clone(),
            },
            cleanup: CleanupManifest::from_targets(root, &config.extensions).patterns(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize build plan")
    }
}

/// Find every package under `package_root`
///
/// A package is a directory containing `__init__.py`. Names are dotted
/// paths relative to the parent of `package_root`, sorted.
pub fn discover_packages(root: &Path, package_root: &Path) -> Result<Vec<String>> {
    let base = root.join(package_root);
    let parent = base.parent().unwrap_or(root).to_path_buf();

    let mut packages = Vec::new();
    for entry in WalkDir::new(&base).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("Failed to scan package directory: {}", base.display()))?;
        if !entry.file_type().is_dir() || !entry.path().join(PACKAGE_MARKER).is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(&parent).with_context(|| {
            format!("Package outside of {}: {}", parent.display(), entry.path().display())
        })?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join(".");
        packages.push(name);
    }

    packages.sort();
    Ok(packages)
}

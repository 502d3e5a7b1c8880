//! Configuration file management
//!
//! Reads `buildstamp.toml` from the project root, falling back to a user-wide
//! config file and then to defaults.

use crate::extensions::{CythonCompiler, ExtensionTarget};
use crate::version::{DEFAULT_DEV_MARKER, StampSettings};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Project config file name, looked up in the project root
pub const CONFIG_FILE: &str = "buildstamp.toml";

/// Project configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Distribution name
    pub name: String,

    /// File holding the `version = "..."` line, relative to the root
    pub version_file: PathBuf,

    /// Variable assigned on the version line
    pub version_variable: String,

    /// Marker identifying development versions
    pub dev_marker: String,

    /// Branch whose ref file enables stamping
    pub primary_branch: String,

    /// Directory scanned for packages when `packages` is empty
    pub package_root: Option<PathBuf>,

    /// Explicit package list (overrides discovery)
    pub packages: Vec<String>,

    /// Data file globs per package
    pub package_data: BTreeMap<String, Vec<String>>,

    /// Runtime requirements handed to the packaging tool
    pub install_requires: Vec<String>,

    pub description: Option<String>,
    pub license: Option<String>,
    pub url: Option<String>,
    pub keywords: Vec<String>,
    pub classifiers: Vec<String>,

    /// Remove `build/` before packaging
    pub clean_build_dir: bool,

    /// Install the post-checkout cleanup hook
    pub hook: bool,

    /// Command the post-checkout hook runs after cleaning
    pub hook_rebuild_command: Vec<String>,

    /// Packaging command wrapped by `buildstamp package`
    pub package_command: Vec<String>,

    pub compiler: CompilerConfig,

    /// Native extensions
    pub extensions: Vec<ExtensionTarget>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CompilerConfig {
    /// Intermediate compiler program
    #[serde(default)]
    pub program: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "package".to_string(),
            version_file: PathBuf::from("version.py"),
            version_variable: "version".to_string(),
            dev_marker: DEFAULT_DEV_MARKER.to_string(),
            primary_branch: "master".to_string(),
            package_root: None,
            packages: Vec::new(),
            package_data: BTreeMap::new(),
            install_requires: Vec::new(),
            description: None,
            license: None,
            url: None,
            keywords: Vec::new(),
            classifiers: Vec::new(),
            clean_build_dir: true,
            hook: true,
            hook_rebuild_command: ["python", "setup.py", "build_ext", "--inplace"]
                .map(String::from)
                .to_vec(),
            package_command: ["python", "setup.py", "sdist"].map(String::from).to_vec(),
            compiler: CompilerConfig::default(),
            extensions: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration for the project at `root`.
    ///
    /// Priority: `custom_path` -> `<root>/buildstamp.toml` ->
    /// `~/.config/buildstamp/config.toml` -> defaults.
    ///
    /// An explicitly requested file must exist and parse; the implicit
    /// locations are only used when present, but a present file that fails
    /// to parse is still an error.
    pub fn load_with_options(root: &Path, custom_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = custom_path {
            return Self::load_from(path);
        }

        let local = root.join(CONFIG_FILE);
        if local.is_file() {
            return Self::load_from(&local);
        }

        if let Some(config_dir) = Self::user_config_dir() {
            let user = config_dir.join("config.toml");
            if user.is_file() {
                return Self::load_from(&user);
            }
        }

        crate::debug!("no {CONFIG_FILE} found, using defaults");
        Ok(Self::default())
    }

    fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        crate::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    fn user_config_dir() -> Option<PathBuf> {
        // Check XDG_CONFIG_HOME first
        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join("buildstamp"));
        }

        // Fall back to ~/.config/buildstamp
        dirs::home_dir().map(|home| home.join(".config").join("buildstamp"))
    }

    /// Stamp settings for a checkout at `root`
    #[must_use]
    pub fn stamp_settings(&self, root: &Path) -> StampSettings {
        StampSettings {
            dev_marker: self.dev_marker.clone(),
            version_variable: self.version_variable.clone(),
            ..StampSettings::for_checkout(root, &self.primary_branch)
        }
    }

    /// Intermediate compiler for a project at `root`
    #[must_use]
    pub fn compiler(&self, root: &Path) -> CythonCompiler {
        CythonCompiler::locate(self.compiler.program.as_deref(), root)
    }
}

//! Extension type definitions
//!
//! A package can ship accelerated native modules. Each one is declared as an
//! [`ExtensionTarget`]: a module name, its sources, and the native language
//! its sources translate to. The first source decides whether the target
//! still needs translating from an intermediate form (`.pyx`, `.py`) or is
//! already native code.

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// File extensions of the intermediate source form
pub const INTERMEDIATE_EXTENSIONS: [&str; 2] = ["pyx", "py"];

/// File extensions of pre-generated native siblings
pub const NATIVE_EXTENSIONS: [&str; 2] = ["c", "cpp"];

/// Whether a path is in the intermediate source form
#[must_use]
pub fn is_intermediate(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| INTERMEDIATE_EXTENSIONS.contains(&ext))
}

/// Native language an extension is compiled as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// C calling convention, generated sources end in `.c`
    #[default]
    #[serde(rename = "c")]
    C,
    /// C++, generated sources end in `.cpp`
    #[serde(rename = "c++", alias = "cpp")]
    Cpp,
}

impl Language {
    /// Extension of the native sibling generated for this language
    #[must_use]
    pub const fn native_extension(self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cpp => "cpp",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::Cpp => "C++",
        }
    }
}

/// A named native module and the sources it is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionTarget {
    name: String,
    sources: Vec<PathBuf>,
    #[serde(default)]
    language: Language,
}

impl ExtensionTarget {
    #[must_use]
    pub fn new<I, P>(name: impl Into<String>, sources: I, language: Language) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            name: name.into(),
            sources: sources.into_iter().map(Into::into).collect(),
            language,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// The source that decides intermediate vs native
    #[must_use]
    pub fn primary_source(&self) -> Option<&Path> {
        self.sources.first().map(PathBuf::as_path)
    }

    /// Whether the primary source still has to be translated
    #[must_use]
    pub fn needs_translation(&self) -> bool {
        self.primary_source().is_some_and(is_intermediate)
    }

    /// Native sibling path for `source` in this target's language
    #[must_use]
    pub fn native_sibling(&self, source: &Path) -> PathBuf {
        source.with_extension(self.language.native_extension())
    }

    /// A copy of this target built from different sources
    #[must_use]
    pub fn with_sources(&self, sources: Vec<PathBuf>) -> Self {
        Self {
            name: self.name.clone(),
            sources,
            language: self.language,
        }
    }
}

/// How the extension list is turned into buildable sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStrategy {
    /// Run the intermediate compiler to produce native sources
    Generate,
    /// Point every target at native siblings that are already on disk
    UseExisting,
}

impl BuildStrategy {
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Generate => "generate native sources",
            Self::UseExisting => "use existing native sources",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intermediate_detection() {
        assert!(is_intermediate(Path::new("pkg/fast.pyx")));
        assert!(is_intermediate(Path::new("pkg/fast.py")));
        assert!(!is_intermediate(Path::new("pkg/fast.c")));
        assert!(!is_intermediate(Path::new("pkg/fast")));
    }

    #[test]
    fn native_sibling_follows_language() {
        let c = ExtensionTarget::new("pkg.fast", ["pkg/fast.pyx"], Language::C);
        let cpp = ExtensionTarget::new("pkg.fast", ["pkg/fast.pyx"], Language::Cpp);

        assert_eq!(
            c.native_sibling(Path::new("pkg/fast.pyx")),
            PathBuf::from("pkg/fast.c")
        );
        assert_eq!(
            cpp.native_sibling(Path::new("pkg/fast.pyx")),
            PathBuf::from("pkg/fast.cpp")
        );
    }

    #[test]
    fn target_without_sources_needs_nothing() {
        let target = ExtensionTarget::new("pkg.empty", Vec::<PathBuf>::new(), Language::C);
        assert!(target.primary_source().is_none());
        assert!(!target.needs_translation());
    }

    #[test]
    fn language_deserializes_from_config_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            language: Language,
        }

        let cpp: Wrapper = toml::from_str(r#"language = "c++""#).unwrap();
        let alias: Wrapper = toml::from_str(r#"language = "cpp""#).unwrap();
        let c: Wrapper = toml::from_str(r#"language = "c""#).unwrap();

        assert_eq!(cpp.language, Language::Cpp);
        assert_eq!(alias.language, Language::Cpp);
        assert_eq!(c.language, Language::C);
    }
}

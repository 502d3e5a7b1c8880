//! Version strings and the line that defines them
//!
//! A release version is either in release form (`1.3`) or in dev form
//! (`1.3+dev`). Dev-form versions get a provenance marker when stamped:
//! `1.3+git12-gabc1234` from `git describe`, or `1.3+git-abcdef0` from the
//! raw branch ref.

use regex::Regex;

/// Marker carried by development versions
pub const DEFAULT_DEV_MARKER: &str = "+dev";

/// Marker that replaces the dev marker in stamped versions
pub const PROVENANCE_MARKER: &str = "+git";

/// Characters of the commit hash kept by the branch-ref fallback
pub const SHORT_HASH_LEN: usize = 7;

/// A persisted release version and its dev marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    version: String,
    dev_marker: String,
}

impl VersionRecord {
    #[must_use]
    pub fn new(version: impl Into<String>, dev_marker: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            dev_marker: dev_marker.into(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn dev_marker(&self) -> &str {
        &self.dev_marker
    }

    /// Whether this version must be enriched with a build identifier
    #[must_use]
    pub fn is_dev(&self) -> bool {
        !self.dev_marker.is_empty() && self.version.contains(&self.dev_marker)
    }

    /// Version with the dev marker removed: `1.3+dev` -> `1.3`
    #[must_use]
    pub fn release_prefix(&self) -> String {
        if self.dev_marker.is_empty() {
            return self.version.clone();
        }
        self.version.strip_suffix(&self.dev_marker).map_or_else(
            || self.version.replacen(&self.dev_marker, "", 1),
            ToString::to_string,
        )
    }

    /// Stamp from `git describe` output
    ///
    /// A leading `v` is dropped. When the described tag starts with this
    /// release, `1.3-` becomes `1.3+git`; a tag from another release line is
    /// kept as it is.
    #[must_use]
    pub fn stamp_from_describe(&self, output: &str) -> String {
        let described = output.trim();
        let described = described.strip_prefix('v').unwrap_or(described);

        let prefix = self.release_prefix();
        let tag = format!("{prefix}-");
        if described.contains(&tag) {
            described.replace(&tag, &format!("{prefix}{PROVENANCE_MARKER}"))
        } else {
            described.to_string()
        }
    }

    /// Stamp from a raw commit hash: `1.3+dev` -> `1.3+git-abcdef0`
    #[must_use]
    pub fn stamp_from_hash(&self, hash: &str) -> String {
        let short: String = hash.trim().chars().take(SHORT_HASH_LEN).collect();
        self.version
            .replace(&self.dev_marker, &format!("{PROVENANCE_MARKER}-{short}"))
    }
}

/// Matches the `version = "..."` line of a version file
#[derive(Debug, Clone)]
pub struct VersionLine {
    variable: String,
    pattern: Regex,
}

impl VersionLine {
    pub fn new(variable: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r#"^{}\s*=\s*["']([^"']*)["']"#,
            regex::escape(variable)
        ))?;

        Ok(Self {
            variable: variable.to_string(),
            pattern,
        })
    }

    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Whether `line` (without its line ending) defines the version
    #[must_use]
    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    /// Version value of the first defining line
    #[must_use]
    pub fn find_value(&self, contents: &str) -> Option<String> {
        contents.lines().find_map(|line| {
            self.pattern
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
    }

    /// Every defining line, in file order, without line endings
    #[must_use]
    pub fn matching_lines(&self, contents: &str) -> Vec<String> {
        contents
            .lines()
            .filter(|line| self.matches(line))
            .map(ToString::to_string)
            .collect()
    }

    /// Line defining `version`
    #[must_use]
    pub fn render(&self, version: &str) -> String {
        format!("{} = \"{version}\"", self.variable)
    }

    /// Replace each defining line with `replace(line)`
    ///
    /// All other lines and every line ending pass through untouched.
    pub fn rewrite(&self, contents: &str, mut replace: impl FnMut(&str) -> String) -> String {
        let mut out = String::with_capacity(contents.len());

        for raw in contents.split_inclusive('\n') {
            let (body, ending) = split_line_ending(raw);
            if self.matches(body) {
                out.push_str(&replace(body));
            } else {
                out.push_str(body);
            }
            out.push_str(ending);
        }

        out
    }
}

fn split_line_ending(raw: &str) -> (&str, &str) {
    let body = raw
        .strip_suffix("\r\n")
        .or_else(|| raw.strip_suffix('\n'))
        .unwrap_or(raw);
    raw.split_at(body.len())
}

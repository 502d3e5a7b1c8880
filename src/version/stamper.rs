//! Scoped version stamping
//!
//! [`StampGuard`] rewrites the version line for as long as it lives and puts
//! the original line back when it is finished or dropped, so the version
//! file is never left stamped: not after an error return, not after a panic.

use super::record::{DEFAULT_DEV_MARKER, VersionLine, VersionRecord};
use super::store::VersionStore;
use crate::git::{DescribeError, SourceControl};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StampError {
    #[error("failed to read version file {location}: {source}")]
    Read {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write version file {location}: {source}")]
    Write {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error("no `{variable} = \"...\"` line in version file {location}")]
    MissingVersionLine { variable: String, location: String },

    #[error("failed to read branch ref {}: {source}", path.display())]
    BranchRef {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Describe(DescribeError),

    #[error("invalid version variable: {0}")]
    Pattern(#[from] regex::Error),
}

/// What to stamp and where provenance comes from
#[derive(Debug, Clone)]
pub struct StampSettings {
    /// Marker identifying development versions
    pub dev_marker: String,
    /// Variable assigned on the version line
    pub version_variable: String,
    /// Primary-branch ref file, e.g. `.git/refs/heads/master`
    pub branch_ref: PathBuf,
}

impl StampSettings {
    /// Settings for a checkout at `root` whose primary branch is `branch`
    #[must_use]
    pub fn for_checkout(root: &Path, branch: &str) -> Self {
        Self {
            branch_ref: root.join(".git").join("refs").join("heads").join(branch),
            ..Self::default()
        }
    }
}

impl Default for StampSettings {
    fn default() -> Self {
        Self {
            dev_marker: DEFAULT_DEV_MARKER.to_string(),
            version_variable: "version".to_string(),
            branch_ref: PathBuf::from(".git/refs/heads/master"),
        }
    }
}

/// Read the version record as it is on disk
pub fn read_record(
    store: &impl VersionStore,
    settings: &StampSettings,
) -> Result<VersionRecord, StampError> {
    let line = VersionLine::new(&settings.version_variable)?;
    let contents = store.read().map_err(|e| StampError::Read {
        location: store.location(),
        source: e,
    })?;
    record_from(&line, &contents, store, settings)
}

fn record_from(
    line: &VersionLine,
    contents: &str,
    store: &impl VersionStore,
    settings: &StampSettings,
) -> Result<VersionRecord, StampError> {
    let value = line
        .find_value(contents)
        .ok_or_else(|| StampError::MissingVersionLine {
            variable: line.variable().to_string(),
            location: store.location(),
        })?;
    Ok(VersionRecord::new(value, settings.dev_marker.as_str()))
}

/// First line of a raw branch ref file, i.e. the commit hash
///
/// Read errors propagate: a ref file that exists but cannot be read means
/// the checkout is in a state we do not handle.
pub fn read_branch_hash(path: &Path) -> Result<String, StampError> {
    let contents = std::fs::read_to_string(path).map_err(|e| StampError::BranchRef {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(contents.lines().next().unwrap_or_default().to_string())
}

fn stamped_version(
    release: &VersionRecord,
    branch_ref: &Path,
    scm: &dyn SourceControl,
) -> Result<String, StampError> {
    match scm.describe() {
        Ok(output) => Ok(release.stamp_from_describe(&output)),
        Err(e) if e.is_recoverable() => {
            crate::debug!("{e}; reading {} instead", branch_ref.display());
            let hash = read_branch_hash(branch_ref)?;
            Ok(release.stamp_from_hash(&hash))
        }
        Err(e) => Err(StampError::Describe(e)),
    }
}

/// Whether `release` is stamped at all under `settings`
fn should_stamp(release: &VersionRecord, settings: &StampSettings) -> bool {
    if !release.is_dev() {
        crate::debug!("{} is a release version, not stamping", release.as_str());
        return false;
    }
    if !settings.branch_ref.is_file() {
        crate::debug!(
            "{} not found, not stamping {}",
            settings.branch_ref.display(),
            release.as_str()
        );
        return false;
    }
    true
}

/// Version a stamped build would carry, without writing the version file
pub fn preview_version(
    store: &impl VersionStore,
    settings: &StampSettings,
    scm: &dyn SourceControl,
) -> Result<String, StampError> {
    let release = read_record(store, settings)?;
    if should_stamp(&release, settings) {
        stamped_version(&release, &settings.branch_ref, scm)
    } else {
        Ok(release.as_str().to_string())
    }
}

/// Holds the version file in its stamped state
///
/// # Example
///
/// ```rust,ignore
/// let guard = StampGuard::acquire(FileVersionStore::new("pkg/Release.py"), &settings, &git)?;
/// run_packaging(guard.version())?;
/// guard.finish()?;
/// ```
#[derive(Debug)]
pub struct StampGuard<S: VersionStore> {
    store: S,
    line: VersionLine,
    release: VersionRecord,
    version: String,
    /// Version lines to put back; `Some` while the file is stamped
    original_lines: Option<Vec<String>>,
}

impl<S: VersionStore> StampGuard<S> {
    /// Read the record and stamp it if it is a dev version in a checkout
    ///
    /// Release versions, and dev versions without a primary-branch ref, are
    /// returned unchanged and the file is not written at all.
    pub fn acquire(
        store: S,
        settings: &StampSettings,
        scm: &dyn SourceControl,
    ) -> Result<Self, StampError> {
        let line = VersionLine::new(&settings.version_variable)?;
        let contents = store.read().map_err(|e| StampError::Read {
            location: store.location(),
            source: e,
        })?;
        let release = record_from(&line, &contents, &store, settings)?;
        let mut guard = Self {
            store,
            line,
            version: release.as_str().to_string(),
            release,
            original_lines: None,
        };

        if !should_stamp(&guard.release, settings) {
            return Ok(guard);
        }

        let version = stamped_version(&guard.release, &settings.branch_ref, scm)?;
        let stamped = guard.line.rewrite(&contents, |_| guard.line.render(&version));

        guard.original_lines = Some(guard.line.matching_lines(&contents));
        guard.store.write(&stamped).map_err(|e| StampError::Write {
            location: guard.store.location(),
            source: e,
        })?;

        crate::debug!("stamped {} as {version}", guard.store.location());
        guard.version = version;
        Ok(guard)
    }

    /// Version to build with
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Version as it was on disk before stamping
    #[must_use]
    pub fn release(&self) -> &VersionRecord {
        &self.release
    }

    /// Whether the version file currently holds the stamped version
    #[must_use]
    pub fn is_stamped(&self) -> bool {
        self.original_lines.is_some()
    }

    /// Restore the version file, reporting failures
    ///
    /// Dropping the guard restores too, but can only print a failure.
    pub fn finish(mut self) -> Result<(), StampError> {
        self.restore()
    }

    fn restore(&mut self) -> Result<(), StampError> {
        let Some(originals) = self.original_lines.take() else {
            return Ok(());
        };

        let contents = self.store.read().map_err(|e| StampError::Read {
            location: self.store.location(),
            source: e,
        })?;

        let mut originals = originals.into_iter();
        let restored = self.line.rewrite(&contents, |current| {
            originals.next().unwrap_or_else(|| current.to_string())
        });

        self.store.write(&restored).map_err(|e| StampError::Write {
            location: self.store.location(),
            source: e,
        })?;

        crate::debug!("restored {} to {}", self.store.location(), self.release.as_str());
        Ok(())
    }
}

impl<S: VersionStore> Drop for StampGuard<S> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            eprintln!("warning: {e}");
        }
    }
}

/// Run `op` with the stamped version, restoring the file afterwards
///
/// The operation's own error takes precedence over a restore failure.
pub fn run_stamped<S, T, F>(
    store: S,
    settings: &StampSettings,
    scm: &dyn SourceControl,
    op: F,
) -> anyhow::Result<T>
where
    S: VersionStore,
    F: FnOnce(&str) -> anyhow::Result<T>,
{
    let guard = StampGuard::acquire(store, settings, scm)?;
    let outcome = op(guard.version());
    let restored = guard.finish();

    match (outcome, restored) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(restore_err)) => {
            Err(e.context(format!("version file was not restored: {restore_err}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::store::MemoryVersionStore;
    use std::fs;
    use tempfile::TempDir;

    const DEV_FILE: &str = "name = \"pkg\"\nversion = \"1.3+dev\"\nlicense = \"GPL\"\n";

    struct Describes(&'static str);

    impl SourceControl for Describes {
        fn describe(&self) -> Result<String, DescribeError> {
            Ok(self.0.to_string())
        }
    }

    struct NoGit;

    impl SourceControl for NoGit {
        fn describe(&self) -> Result<String, DescribeError> {
            Err(DescribeError::Status {
                program: "git".to_string(),
                status: "exit code 128".to_string(),
            })
        }
    }

    fn checkout(hash: &str) -> (TempDir, StampSettings) {
        let temp = TempDir::new().unwrap();
        let heads = temp.path().join(".git/refs/heads");
        fs::create_dir_all(&heads).unwrap();
        fs::write(heads.join("master"), format!("{hash}\n")).unwrap();
        let settings = StampSettings::for_checkout(temp.path(), "master");
        (temp, settings)
    }

    #[test]
    fn release_version_is_never_written() {
        let (_temp, settings) = checkout("abcdef0123456789");
        let mut store = MemoryVersionStore::new("version = \"1.3\"\n");

        for _ in 0..2 {
            let guard = StampGuard::acquire(&mut store, &settings, &NoGit).unwrap();
            assert_eq!(guard.version(), "1.3");
            assert!(!guard.is_stamped());
            guard.finish().unwrap();
        }

        assert!(store.writes().is_empty());
    }

    #[test]
    fn dev_version_without_checkout_is_not_stamped() {
        let temp = TempDir::new().unwrap();
        let settings = StampSettings::for_checkout(temp.path(), "master");
        let mut store = MemoryVersionStore::new(DEV_FILE);

        let guard = StampGuard::acquire(&mut store, &settings, &Describes("v1.3-1-gabc")).unwrap();
        assert_eq!(guard.version(), "1.3+dev");
        drop(guard);

        assert!(store.writes().is_empty());
    }

    #[test]
    fn hash_fallback_stamps_and_restores() {
        let (_temp, settings) = checkout("abcdef0123456789");
        let mut store = MemoryVersionStore::new(DEV_FILE);

        let guard = StampGuard::acquire(&mut store, &settings, &NoGit).unwrap();
        assert_eq!(guard.version(), "1.3+git-abcdef0");
        assert!(guard.is_stamped());
        guard.finish().unwrap();

        assert_eq!(store.writes().len(), 2);
        assert_eq!(
            store.writes()[0],
            "name = \"pkg\"\nversion = \"1.3+git-abcdef0\"\nlicense = \"GPL\"\n"
        );
        assert_eq!(store.contents(), DEV_FILE);
    }

    #[test]
    fn describe_output_wins_over_hash() {
        let (_temp, settings) = checkout("abcdef0123456789");
        let mut store = MemoryVersionStore::new(DEV_FILE);

        let guard =
            StampGuard::acquire(&mut store, &settings, &Describes("v1.3-4-g1234567\n")).unwrap();
        assert_eq!(guard.version(), "1.3+git4-g1234567");
        drop(guard);

        assert!(store.writes()[0].contains("version = \"1.3+git4-g1234567\""));
        assert_eq!(store.contents(), DEV_FILE);
    }

    #[test]
    fn undecodable_describe_output_propagates() {
        struct Garbled;

        impl SourceControl for Garbled {
            fn describe(&self) -> Result<String, DescribeError> {
                Err(DescribeError::Output {
                    program: "git".to_string(),
                    source: String::from_utf8(vec![0xff]).unwrap_err(),
                })
            }
        }

        let (_temp, settings) = checkout("abcdef0123456789");
        let mut store = MemoryVersionStore::new(DEV_FILE);

        let err = StampGuard::acquire(&mut store, &settings, &Garbled).unwrap_err();
        assert!(matches!(err, StampError::Describe(_)));
        assert!(store.writes().is_empty());
    }

    #[test]
    fn unreadable_branch_ref_propagates() {
        let temp = TempDir::new().unwrap();
        let branch_ref = temp.path().join(".git/refs/heads/master");
        fs::create_dir_all(&branch_ref).unwrap();

        let err = read_branch_hash(&branch_ref).unwrap_err();

        assert!(matches!(err, StampError::BranchRef { .. }));
    }

    #[test]
    fn preview_never_writes() {
        let (_temp, settings) = checkout("abcdef0123456789");
        let store = MemoryVersionStore::new(DEV_FILE);

        assert_eq!(
            preview_version(&store, &settings, &NoGit).unwrap(),
            "1.3+git-abcdef0"
        );
        assert_eq!(
            preview_version(&store, &settings, &Describes("v1.3-2-gfeed123")).unwrap(),
            "1.3+git2-gfeed123"
        );
        assert!(store.writes().is_empty());

        let release = MemoryVersionStore::new("version = \"1.3\"\n");
        assert_eq!(preview_version(&release, &settings, &NoGit).unwrap(), "1.3");
    }

    #[test]
    fn missing_version_line_is_an_error() {
        let (_temp, settings) = checkout("abcdef0123456789");
        let mut store = MemoryVersionStore::new("name = \"pkg\"\n");

        let err = StampGuard::acquire(&mut store, &settings, &NoGit).unwrap_err();
        assert!(matches!(err, StampError::MissingVersionLine { .. }));
    }

    #[test]
    fn run_stamped_restores_after_failure() {
        let (_temp, settings) = checkout("abcdef0123456789");
        let mut store = MemoryVersionStore::new(DEV_FILE);

        let result: anyhow::Result<()> = run_stamped(&mut store, &settings, &NoGit, |version| {
            assert_eq!(version, "1.3+git-abcdef0");
            anyhow::bail!("packaging failed")
        });

        assert_eq!(result.unwrap_err().to_string(), "packaging failed");
        assert_eq!(store.contents(), DEV_FILE);
    }

    #[test]
    fn run_stamped_returns_operation_value() {
        let (_temp, settings) = checkout("abcdef0123456789");
        let mut store = MemoryVersionStore::new(DEV_FILE);

        let seen = run_stamped(&mut store, &settings, &NoGit, |version| Ok(version.to_string()))
            .unwrap();

        assert_eq!(seen, "1.3+git-abcdef0");
        assert_eq!(store.contents(), DEV_FILE);
    }
}

//! Git integration
//!
//! Two small touch points with the source-control checkout:
//! - `git describe` output for stamping development versions
//! - the post-checkout hook that clears stale generated artifacts

use crate::extensions::CleanupManifest;
use git2::{ErrorCode, Repository};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::string::FromUtf8Error;
use thiserror::Error;

/// Arguments passed to `git describe`
pub const DESCRIBE_ARGS: [&str; 4] = ["describe", "--tags", "--dirty", "--always"];

#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} describe exited with {status}")]
    Status { program: String, status: String },

    #[error("{program} describe printed non-UTF-8 output")]
    Output {
        program: String,
        #[source]
        source: FromUtf8Error,
    },
}

impl DescribeError {
    /// Missing tool and nonzero exit are expected in degraded environments
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Spawn { .. } | Self::Status { .. })
    }
}

#[derive(Debug, Error)]
pub enum HookError {
    #[error("failed to open git repository at {}: {source}", path.display())]
    Repository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("failed to write hook {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Describes the checked-out revision
pub trait SourceControl {
    /// Raw descriptive tag, e.g. `v1.3-12-gabc1234-dirty`
    fn describe(&self) -> Result<String, DescribeError>;
}

/// `git describe` through the git command line
#[derive(Debug, Clone)]
pub struct GitCli {
    /// Git executable
    program: String,
    /// Checkout to describe
    work_dir: PathBuf,
}

impl GitCli {
    #[must_use]
    pub fn new(program: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Use `GIT` from the environment, falling back to `git` on PATH
    #[must_use]
    pub fn locate(work_dir: &Path) -> Self {
        Self::new(
            crate::env_vars::git().unwrap_or_else(|| "git".to_string()),
            work_dir,
        )
    }
}

impl SourceControl for GitCli {
    fn describe(&self) -> Result<String, DescribeError> {
        let output = Command::new(&self.program)
            .args(DESCRIBE_ARGS)
            .current_dir(&self.work_dir)
            .stderr(Stdio::null())
            .output()
            .map_err(|e| DescribeError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(DescribeError::Status {
                program: self.program.clone(),
                status: output
                    .status
                    .code()
                    .map_or_else(|| "a signal".to_string(), |c| format!("exit code {c}")),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| DescribeError::Output {
            program: self.program.clone(),
            source: e,
        })
    }
}

/// Quote `word` for `/bin/sh` unless it only holds safe characters
#[must_use]
pub fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:+,@%".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Shell script run by git after every checkout
///
/// Only the wildcard suffix of each cleanup pattern stays unquoted.
#[must_use]
pub fn post_checkout_script(manifest: &CleanupManifest, rebuild: &[String]) -> String {
    let mut script = String::from("#!/bin/sh\n");
    if !manifest.is_empty() {
        let globs = manifest
            .parts()
            .map(|(stem, suffix)| format!("{}{suffix}", shell_quote(&stem.to_string_lossy())))
            .collect::<Vec<_>>();
        script.push_str("rm -f ");
        script.push_str(&globs.join(" "));
        script.push('\n');
    }
    if !rebuild.is_empty() {
        let words = rebuild.iter().map(|w| shell_quote(w)).collect::<Vec<_>>();
        script.push_str(&words.join(" "));
        script.push('\n');
    }
    script
}

/// Write the post-checkout hook into the repository at `root`
///
/// Returns `None` when `root` is not a git checkout.
pub fn install_post_checkout_hook(
    root: &Path,
    manifest: &CleanupManifest,
    rebuild: &[String],
) -> Result<Option<PathBuf>, HookError> {
    let repo = match Repository::open(root) {
        Ok(repo) => repo,
        Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
        Err(e) => {
            return Err(HookError::Repository {
                path: root.to_path_buf(),
                source: e,
            });
        }
    };

    let hooks_dir = repo.path().join("hooks");
    let hook_path = hooks_dir.join("post-checkout");
    let write_err = |source| HookError::Write {
        path: hook_path.clone(),
        source,
    };

    std::fs::create_dir_all(&hooks_dir).map_err(write_err)?;
    std::fs::write(&hook_path, post_checkout_script(manifest, rebuild)).map_err(write_err)?;
    make_executable(&hook_path).map_err(write_err)?;

    crate::debug!("installed post-checkout hook at {}", hook_path.display());
    Ok(Some(hook_path))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

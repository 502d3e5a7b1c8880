//! Shared test helpers and utilities

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Version file used by every test project
#[allow(dead_code)]
pub(crate) const VERSION_FILE: &str = "pkg/Release.py";

/// Get the path to the buildstamp binary built for this test run
#[allow(dead_code)]
pub(crate) fn get_buildstamp_binary() -> String {
    env!("CARGO_BIN_EXE_buildstamp").to_string()
}

/// Contents of a version file declaring `version`
#[allow(dead_code)]
pub(crate) fn release_file(version: &str) -> String {
    format!(
        "# -*- coding: utf-8 -*-\nname = 'pkg'\nversion = \"{version}\"\ndescription = \"test\"\n"
    )
}

/// Create a project with a version file and a `buildstamp.toml`
///
/// # Arguments
/// * `version` - Version written to the version file
/// * `extensions` - Slice of (module name, first source) tuples
#[allow(dead_code)]
pub(crate) fn create_test_project(version: &str, extensions: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let root = temp.path();

    write_file(root, VERSION_FILE, &release_file(version));
    write_file(root, "pkg/__init__.py", "");

    let mut config = format!(
        "name = \"pkg\"\nversion_file = \"{VERSION_FILE}\"\npackage_root = \"pkg\"\nhook = false\n"
    );
    for (name, source) in extensions {
        writeln!(&mut config, "\n[[extensions]]\nname = \"{name}\"\nsources = [\"{source}\"]").unwrap();
    }
    write_file(root, "buildstamp.toml", &config);

    temp
}

/// Write the primary-branch ref of a fake checkout
#[allow(dead_code)]
pub(crate) fn create_branch_ref(root: &Path, hash: &str) -> PathBuf {
    let heads = root.join(".git/refs/heads");
    fs::create_dir_all(&heads).expect("Failed to create refs directory");
    let path = heads.join("master");
    fs::write(&path, format!("{hash}\n")).expect("Failed to write branch ref");
    path
}

/// Write `contents` to `root/relative`, creating parent directories
#[allow(dead_code)]
pub(crate) fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&path, contents).expect("Failed to write file");
}

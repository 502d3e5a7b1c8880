mod common;

use buildstamp::{
    BuildStrategy, CythonCompiler, ExtensionTarget, Language, RecordingDiagnostics,
    count_already_generated, generate, resolve_extensions, select_build_strategy,
};
use std::path::PathBuf;
use tempfile::TempDir;

use common::helpers::write_file;

fn project(files: &[&str]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for file in files {
        write_file(temp.path(), file, "");
    }
    temp
}

fn targets() -> Vec<ExtensionTarget> {
    vec![
        ExtensionTarget::new("pkg.peaks", ["pkg/peaks.pyx", "pkg/util.c"], Language::C),
        ExtensionTarget::new("pkg.spectra", ["pkg/spectra.pyx"], Language::Cpp),
    ]
}

fn absent_compiler(root: &std::path::Path) -> CythonCompiler {
    CythonCompiler::new("buildstamp-test-no-such-cython", root)
}

#[test]
fn pregenerated_tree_builds_without_compiler() {
    let tree = project(&["pkg/peaks.pyx", "pkg/peaks.c", "pkg/spectra.pyx", "pkg/spectra.cpp"]);
    let diagnostics = RecordingDiagnostics::new();

    assert_eq!(count_already_generated(tree.path(), &targets()), 2);
    assert_eq!(
        select_build_strategy(tree.path(), &targets()),
        BuildStrategy::UseExisting
    );

    let resolved = resolve_extensions(
        tree.path(),
        &targets(),
        &absent_compiler(tree.path()),
        &diagnostics,
    )
    .unwrap();

    assert_eq!(resolved.strategy, BuildStrategy::UseExisting);
    assert_eq!(
        resolved.targets[0].sources(),
        &[PathBuf::from("pkg/peaks.c"), PathBuf::from("pkg/util.c")]
    );
    assert_eq!(resolved.targets[1].sources(), &[PathBuf::from("pkg/spectra.cpp")]);
    assert!(diagnostics.is_empty());
}

#[test]
fn partially_generated_tree_needs_generation() {
    let tree = project(&["pkg/peaks.pyx", "pkg/peaks.c", "pkg/spectra.pyx"]);

    assert_eq!(count_already_generated(tree.path(), &targets()), 1);
    assert_eq!(
        select_build_strategy(tree.path(), &targets()),
        BuildStrategy::Generate
    );
}

#[test]
fn missing_cython_degrades_to_no_extensions() {
    let tree = project(&["pkg/peaks.pyx", "pkg/spectra.pyx"]);
    let diagnostics = RecordingDiagnostics::new();

    let built = generate(&targets(), &absent_compiler(tree.path()), &diagnostics).unwrap();

    assert!(built.is_empty());
    assert_eq!(diagnostics.len(), 1);
    let warning = &diagnostics.messages()[0];
    assert!(warning.contains("buildstamp-test-no-such-cython"));
    assert!(warning.contains("binary distribution"));
}

#[test]
fn resolve_reports_degraded_build() {
    let tree = project(&["pkg/peaks.pyx", "pkg/spectra.pyx"]);
    let diagnostics = RecordingDiagnostics::new();

    let resolved = resolve_extensions(
        tree.path(),
        &targets(),
        &absent_compiler(tree.path()),
        &diagnostics,
    )
    .unwrap();

    assert_eq!(resolved.strategy, BuildStrategy::Generate);
    assert!(resolved.degraded(2));
    assert_eq!(diagnostics.len(), 1);
}

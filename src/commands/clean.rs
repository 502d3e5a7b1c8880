//! Clean command
//!
//! Remove generated sources and compiled modules left next to intermediate
//! sources

use super::Project;
use anyhow::{Context, Result};
use buildstamp::CleanupManifest;

/// Delete leftover extension artifacts
pub(crate) fn run(project: &Project, dry_run: bool) -> Result<()> {
    let manifest = CleanupManifest::from_targets(&project.root, &project.config.extensions);

    if manifest.is_empty() {
        println!("No intermediate-source extensions configured");
        return Ok(());
    }

    if dry_run {
        let matches = manifest.expand().context("Failed to list artifacts")?;
        println!("Dry run mode - no files will be removed\n");
        for path in &matches {
            println!("Would remove: {}", path.display());
        }
        println!("\n{} file(s) would be removed", matches.len());
        return Ok(());
    }

    let removed = manifest.remove().context("Failed to remove artifacts")?;
    for path in &removed {
        println!("Removed: {}", path.display());
    }
    println!("\n{} file(s) removed", removed.len());

    Ok(())
}

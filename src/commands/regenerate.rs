//! Regenerate command
//!
//! Re-run the intermediate compiler on every extension

use super::Project;
use anyhow::{Context, Result};
use buildstamp::regenerate;

/// Translate every intermediate source; fails without a compiler
pub(crate) fn run(project: &Project) -> Result<()> {
    let compiler = project.config.compiler(&project.root);
    let targets = regenerate(&project.config.extensions, &compiler)
        .context("Failed to regenerate native sources")?;

    for target in &targets {
        let sources = target
            .sources()
            .iter()
            .map(|s| s.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("{}: {sources}", target.name());
    }
    println!("Regenerated {} extension(s)", targets.len());

    Ok(())
}

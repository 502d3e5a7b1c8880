//! Hook command
//!
//! Install the post-checkout hook that clears stale extension artifacts

use super::Project;
use anyhow::{Context, Result};
use buildstamp::{CleanupManifest, install_post_checkout_hook};

/// Install the hook and report where it went
pub(crate) fn run(project: &Project) -> Result<()> {
    if !install(project)? {
        println!("{} is not a git checkout, no hook installed", project.root.display());
    }
    Ok(())
}

/// Install the hook unless disabled; returns whether it was written
pub(crate) fn install(project: &Project) -> Result<bool> {
    if !project.config.hook || buildstamp::env_vars::skip_hook() {
        buildstamp::debug!("post-checkout hook disabled");
        return Ok(false);
    }

    let manifest = CleanupManifest::from_targets(&project.root, &project.config.extensions);
    let installed = install_post_checkout_hook(
        &project.root,
        &manifest,
        &project.config.hook_rebuild_command,
    )
    .context("Failed to install post-checkout hook")?;

    if let Some(path) = &installed {
        println!("Installed post-checkout hook: {}", path.display());
    }
    Ok(installed.is_some())
}

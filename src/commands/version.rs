//! Version command
//!
//! Show the version a build would carry right now

use super::Project;
use anyhow::Result;
use buildstamp::{GitCli, preview_version};

/// Print the stamped (or release) version without touching the version file
pub(crate) fn run(project: &Project) -> Result<()> {
    let settings = project.config.stamp_settings(&project.root);
    let git = GitCli::locate(&project.root);

    let version = preview_version(&project.version_store(), &settings, &git)?;
    println!("{version}");

    Ok(())
}

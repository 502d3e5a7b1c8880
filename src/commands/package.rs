//! Package command
//!
//! Run the packaging command with native extensions resolved and the dev
//! version stamped

use super::Project;
use anyhow::{Context, Result};
use buildstamp::{BuildPlan, GitCli, run_stamped};
use std::fs;
use std::io::Write;
use std::process::Command;

/// Environment variable carrying the stamped version
pub(crate) const VERSION_ENV: &str = "BUILDSTAMP_VERSION";

/// Environment variable carrying the build plan path
pub(crate) const PLAN_ENV: &str = "BUILDSTAMP_PLAN";

/// Full packaging pipeline around `command`
pub(crate) fn run(project: &Project, command: &[String]) -> Result<()> {
    let command = if command.is_empty() {
        project.config.package_command.as_slice()
    } else {
        command
    };
    let (program, args) = command
        .split_first()
        .context("No packaging command given and none configured")?;

    // Build output from another platform must not be mixed into this one
    if project.config.clean_build_dir {
        let build_dir = project.root.join("build");
        if build_dir.is_dir() {
            buildstamp::debug!("removing {}", build_dir.display());
            fs::remove_dir_all(&build_dir).with_context(|| {
                format!("Failed to remove build directory: {}", build_dir.display())
            })?;
        }
    }

    let resolved = project.resolve()?;
    super::hook::install(project)?;

    let settings = project.config.stamp_settings(&project.root);
    let git = GitCli::locate(&project.root);

    run_stamped(project.version_store(), &settings, &git, |version| {
        let plan = BuildPlan::assemble(
            &project.root,
            &project.config,
            version,
            resolved.strategy,
            resolved.targets.clone(),
        )?;

        let mut plan_file = tempfile::Builder::new()
            .prefix("buildstamp-plan-")
            .suffix(".json")
            .tempfile()
            .context("Failed to create build plan file")?;
        plan_file
            .write_all(plan.to_json()?.as_bytes())
            .context("Failed to write build plan file")?;

        println!("Packaging {} {version}", project.config.name);
        buildstamp::debug!("running {}", command.join(" "));

        let status = Command::new(program)
            .args(args)
            .current_dir(&project.root)
            .env(VERSION_ENV, version)
            .env(PLAN_ENV, plan_file.path())
            .status()
            .with_context(|| format!("Failed to run packaging command: {program}"))?;

        if !status.success() {
            anyhow::bail!(
                "packaging command failed with exit code: {}",
                status
                    .code()
                    .map_or_else(|| "unknown".to_string(), |c| c.to_string())
            );
        }

        Ok(())
    })
}

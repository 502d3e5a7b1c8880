//! Plan command
//!
//! Print the build plan without touching the version file

use super::Project;
use anyhow::Result;
use buildstamp::BuildPlan;
use buildstamp::version::read_record;

/// Print the JSON build plan with the unstamped release version
pub(crate) fn run(project: &Project) -> Result<()> {
    let settings = project.config.stamp_settings(&project.root);
    let record = read_record(&project.version_store(), &settings)?;
    let resolved = project.resolve()?;

    let plan = BuildPlan::assemble(
        &project.root,
        &project.config,
        record.as_str(),
        resolved.strategy,
        resolved.targets,
    )?;

    println!("{}", plan.to_json()?);
    Ok(())
}

//! Run and test commands - build, then execute the binary

use super::build;
use crate::BuildFlags;
use anyhow::{Context, Result};
use cog_build::BuildType;

/// Build (as a test build when `test` is set) and run the binary with
/// `args`. Returns the binary's exit code.
pub fn run(flags: &BuildFlags, args: &[String], test: bool) -> Result<i32> {
    let build_type = if test {
        BuildType::Test
    } else {
        BuildType::Normal
    };

    let builder = build::builder(flags, build_type)?;
    let summary = build::build(&builder, flags.json)?;

    eprintln!("Running project {}:", summary.project);
    let code = builder
        .run_target(args)
        .context("Failed to run project")?;
    eprintln!("Project exited with code {code}");

    Ok(code)
}

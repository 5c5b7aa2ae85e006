//! Build command - generate the makefile and run make

use crate::BuildFlags;
use anyhow::{Context, Result};
use cog_build::{BuildMode, BuildSummary, BuildType, Builder};

/// Create a builder for the project in the current directory
pub fn builder(flags: &BuildFlags, build_type: BuildType) -> Result<Builder> {
    let mode = if flags.release {
        BuildMode::Release
    } else {
        BuildMode::Debug
    };

    let builder = Builder::new(".")
        .context("Failed to load project")?
        .with_mode(mode)
        .with_build_type(build_type)
        .with_features(flags.features.iter().cloned())
        .with_default_features(!flags.no_default_features);
    Ok(builder)
}

/// Build and report the summary
pub fn build(builder: &Builder, json: bool) -> Result<BuildSummary> {
    let summary = builder.build().context("Build failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        eprintln!(
            "Finished {} build of {} v{} in {:.2}s",
            summary.mode, summary.project, summary.version, summary.elapsed_secs
        );
    }

    Ok(summary)
}

/// Run the build command
pub fn run(flags: &BuildFlags) -> Result<()> {
    let builder = builder(flags, BuildType::Normal)?;
    build(&builder, flags.json)?;
    Ok(())
}

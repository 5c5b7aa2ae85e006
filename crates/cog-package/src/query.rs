//! Compiler and linker flags for required packages, via `pkg-config`.

use crate::declaration::Package;
use crate::tool::{ensure_tool, ToolRunner};
use crate::{PackageError, Result};

/// Flags reported by the package tool, inserted verbatim into the makefile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageFlags {
    pub compile: String,
    pub link: String,
}

/// Query compiler and linker flags for `packages`.
///
/// Nothing is spawned when `packages` is empty. Otherwise the tool is
/// probed first, then asked for `--cflags` and `--libs` (with `--static`
/// when linking statically).
pub fn query_package_flags(
    runner: &dyn ToolRunner,
    program: &str,
    packages: &[Package],
    static_link: bool,
) -> Result<PackageFlags> {
    if packages.is_empty() {
        return Ok(PackageFlags::default());
    }

    ensure_tool(runner, program, "pkg-config")?;

    let queries: Vec<String> = packages.iter().map(Package::query).collect();
    tracing::debug!(?queries, "querying packages");

    let compile = query(runner, program, &queries, &["--cflags"])?;
    let link = if static_link {
        query(runner, program, &queries, &["--libs", "--static"])?
    } else {
        query(runner, program, &queries, &["--libs"])?
    };

    Ok(PackageFlags { compile, link })
}

fn query(
    runner: &dyn ToolRunner,
    program: &str,
    queries: &[String],
    mode: &[&'static str],
) -> Result<String> {
    let args: Vec<String> = queries
        .iter()
        .cloned()
        .chain(mode.iter().map(|flag| flag.to_string()))
        .collect();

    let output = runner
        .run_and_read(program, &args, None)
        .map_err(|error| PackageError::Spawn {
            program: program.to_string(),
            error,
        })?;

    if output.status != 0 {
        return Err(PackageError::PackageResolution {
            program: program.to_string(),
            mode: mode[0],
            status: output.status,
        });
    }

    Ok(output.stdout.trim().to_string())
}

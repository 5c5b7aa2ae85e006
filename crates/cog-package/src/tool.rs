//! External tool invocation.

use crate::{PackageError, Result};
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Exit status and captured standard output of a finished tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub status: i32,
    pub stdout: String,
}

/// Runs external programs.
///
/// Every process the build spawns goes through this trait, so tests can
/// substitute a scripted runner.
pub trait ToolRunner {
    /// Run with inherited stdio and return the exit code.
    fn run(&self, program: &str, args: &[String], cwd: Option<&Path>) -> io::Result<i32>;

    /// Run with stdout captured.
    fn run_and_read(
        &self,
        program: &str,
        args: &[String],
        cwd: Option<&Path>,
    ) -> io::Result<ToolOutput>;
}

/// Runner backed by `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(program: &str, args: &[String], cwd: Option<&Path>) -> Command {
        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }
        command
    }
}

impl ToolRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], cwd: Option<&Path>) -> io::Result<i32> {
        let status = Self::command(program, args, cwd).status()?;
        Ok(status.code().unwrap_or(-1))
    }

    fn run_and_read(
        &self,
        program: &str,
        args: &[String],
        cwd: Option<&Path>,
    ) -> io::Result<ToolOutput> {
        let output = Self::command(program, args, cwd)
            .stderr(Stdio::inherit())
            .output()?;
        Ok(ToolOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Check that `program` answers `--version` successfully.
///
/// `which_key` names the `which.*` manifest key that overrides the binary.
pub fn ensure_tool(runner: &dyn ToolRunner, program: &str, which_key: &str) -> Result<()> {
    let missing = || PackageError::ToolMissing {
        program: program.to_string(),
        which_key: which_key.to_string(),
    };

    match runner.run_and_read(program, &["--version".to_string()], None) {
        Ok(output) if output.status == 0 => {
            tracing::debug!(program, "found tool");
            Ok(())
        }
        Ok(output) => {
            tracing::debug!(program, status = output.status, "tool probe failed");
            Err(missing())
        }
        Err(error) => {
            tracing::debug!(program, %error, "tool probe failed");
            Err(missing())
        }
    }
}

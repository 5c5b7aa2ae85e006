use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

/// Cog: a small build tool for C++ projects.
///
/// Reads project.cfg, resolves features and pkg-config packages, writes a
/// makefile under build/ and runs make.
///
/// EXAMPLES:
///     cog new demo                  Create a new project
///     cog build                     Debug build
///     cog build --release -F NET    Release build with feature NET
///     cog run -- --port 8080        Build and run with arguments
///     cog test                      Build and run the test build
///
/// ENVIRONMENT VARIABLES:
///     RUST_LOG    Log filter (overrides --verbose)
#[derive(Parser)]
#[command(name = "cog")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Show debug logs
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project
    ///
    /// EXAMPLES:
    ///     cog new               Creates UntitledProject/
    ///     cog new demo          Creates demo/
    New {
        /// Project name, also the directory created
        name: Option<String>,
    },

    /// Build the project in the current directory
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        flags: BuildFlags,
    },

    /// Build, then run the binary
    #[command(visible_alias = "r")]
    Run {
        #[command(flatten)]
        flags: BuildFlags,
        /// Arguments passed to the binary
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Build with -DTEST into test/, then run the binary
    #[command(visible_alias = "t")]
    Test {
        #[command(flatten)]
        flags: BuildFlags,
        /// Arguments passed to the binary
        #[arg(last = true)]
        args: Vec<String>,
    },
}

/// Flags shared by every command that builds
#[derive(Args, Debug, Clone, Default)]
pub struct BuildFlags {
    /// Optimized build; always rebuilds everything
    #[arg(long)]
    pub release: bool,
    /// Features to enable, comma separated
    #[arg(long = "features", short = 'F', value_delimiter = ',')]
    pub features: Vec<String>,
    /// Do not enable the manifest's default features
    #[arg(long)]
    pub no_default_features: bool,
    /// Print the build summary as JSON on stdout
    #[arg(long, env = "COG_JSON")]
    pub json: bool,
}

/// Filter used when `RUST_LOG` is unset; the library crates do the logging
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "cog_config=debug,cog_package=debug,cog_build=debug"
    } else {
        "cog_config=info,cog_package=info,cog_build=info"
    }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn dispatch(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::New { name } => {
            commands::new::run(name.as_deref())?;
            Ok(0)
        }
        Commands::Build { flags } => {
            commands::build::run(&flags)?;
            Ok(0)
        }
        Commands::Run { flags, args } => commands::run::run(&flags, &args, false),
        Commands::Test { flags, args } => commands::run::run(&flags, &args, true),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_targets_library_crates() {
        for verbose in [false, true] {
            let filter = default_filter(verbose);
            assert!(EnvFilter::try_new(filter).is_ok());
            for directive in filter.split(',') {
                let target = directive.split('=').next().unwrap();
                assert!(
                    ["cog_config", "cog_package", "cog_build"].contains(&target),
                    "{directive} matches no crate"
                );
            }
        }
    }
}

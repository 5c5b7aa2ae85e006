//! Cog Package Management
//!
//! Feature and package declarations read from the project manifest,
//! feature resolution (cycles allowed), and the bridge that turns the
//! required packages into compiler and linker flags via `pkg-config`.

pub mod declaration;
pub mod query;
pub mod resolver;
pub mod tool;

pub use declaration::{Declarations, Feature, Package, Relation};
pub use query::{query_package_flags, PackageFlags};
pub use resolver::{resolve, Resolution};
pub use tool::{ensure_tool, SystemRunner, ToolOutput, ToolRunner};

use cog_config::ConfigError;

/// Package management errors
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("\"{key}\" in project config {reason}")]
    InvalidDeclaration { key: String, reason: &'static str },

    #[error("Cannot enable feature \"{name}\" ({origin}) since it does not exist")]
    UnknownFeature { name: String, origin: String },

    #[error("Cannot require package \"{entry}\" in feature.{feature}.required since it is not specified")]
    UnresolvedPackage { entry: String, feature: String },

    #[error("Unexpected entry \"{entry}\" in feature.{feature}.required")]
    InvalidDependencyEntry { entry: String, feature: String },

    #[error("Command \"{program}\" does not exist. Either set which.{which_key} in project.cfg or install {program}")]
    ToolMissing { program: String, which_key: String },

    #[error("Error finding one or more packages: `{program} {mode}` exited with status {status}")]
    PackageResolution {
        program: String,
        mode: &'static str,
        status: i32,
    },

    #[error("Failed to run \"{program}\": {error}")]
    Spawn {
        program: String,
        error: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PackageError>;

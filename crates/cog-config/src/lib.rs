//! Cog Configuration System
//!
//! Provides the configuration layer for cog projects:
//! - The ordered, typed key/value document format (`key=value;` entries)
//! - Typed accessors that report tag mismatches by key
//! - Project manifest discovery (`project.config` / `project.cfg`)
//! - The typed [`ProjectSettings`] view with documented defaults
//!
//! # Example
//!
//! ```
//! use cog_config::{Config, Value};
//!
//! let config = Config::parse("project.name=demo;cpp.strict=true;").unwrap();
//! assert_eq!(config.get_string("project.name").unwrap(), "demo");
//! assert_eq!(config.get("cpp.strict"), Some(&Value::Boolean(true)));
//! ```

pub mod accessors;
pub mod config;
pub mod encoding;
pub mod manifest;
pub mod project;
pub mod value;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Not all entries are in the format \"key=value\": `{entry}`")]
    Format { entry: String },

    #[error("{key} is not a {expected} (found {found})")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Missing required key '{0}'")]
    MissingKey(String),

    #[error("No project.config or project.cfg found in {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl ConfigError {
    /// Create a type mismatch error for `key`
    pub fn type_mismatch(key: impl Into<String>, expected: &'static str, found: &Value) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
            found: found.type_name(),
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use config::Config;
pub use manifest::{Manifest, MANIFEST_FILENAMES};
pub use project::{ProjectSettings, ToolNames};
pub use value::Value;

//! Project manifest discovery and loading
//!
//! The manifest is looked up in the project directory; the first existing
//! file from [`MANIFEST_FILENAMES`] wins.

use crate::config::Config;
use crate::{ConfigError, ConfigResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest file names, in lookup order
pub const MANIFEST_FILENAMES: [&str; 4] =
    ["Project.config", "Project.cfg", "project.config", "project.cfg"];

/// A loaded project manifest
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Path of the file that was read
    pub path: PathBuf,
    /// Raw file text, used for change fingerprinting
    pub text: String,
    /// Parsed configuration
    pub config: Config,
}

impl Manifest {
    /// Find the manifest file in `dir` without reading it
    pub fn find(dir: &Path) -> Option<PathBuf> {
        MANIFEST_FILENAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load the manifest from a project directory
    pub fn load(dir: &Path) -> ConfigResult<Self> {
        let path = Self::find(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;
        Self::from_file(&path)
    }

    /// Load the manifest from a specific file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        tracing::debug!(path = %path.display(), "loaded project manifest");
        Self::from_text(path, text)
    }

    /// Build a manifest from text already in memory
    pub fn from_text(path: impl Into<PathBuf>, text: String) -> ConfigResult<Self> {
        let config = Config::parse(&text)?;
        Ok(Self {
            path: path.into(),
            text,
            config,
        })
    }
}

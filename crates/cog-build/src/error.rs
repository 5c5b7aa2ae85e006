/// Build system error types
use cog_config::ConfigError;
use cog_package::PackageError;
use std::path::PathBuf;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Package(#[from] PackageError),

    #[error("Source directory not found: {0}")]
    SourceDirMissing(PathBuf),

    #[error("Error running {program}: exited with status {status}")]
    BuildFailed { program: String, status: i32 },

    #[error("I/O error at {path}: {error}")]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl BuildError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            error,
        }
    }

    /// Create a build tool failure
    pub fn build_failed(program: impl Into<String>, status: i32) -> Self {
        Self::BuildFailed {
            program: program.into(),
            status,
        }
    }
}

//! Build fingerprint lock (`<build-dir>/project.lock`)
//!
//! Records what the last build was made from: a hash of the manifest text,
//! a hash of the feature macro string and the release flag. Any difference
//! on the next run forces a full rebuild.

use crate::error::{BuildError, BuildResult};
use cog_config::{Config, ConfigResult};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

const PROJECT_KEY: &str = "project.identity";
const FEATURES_KEY: &str = "features.identity";
const RELEASE_KEY: &str = "release.identity";

/// Fingerprint of one build's inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockState {
    /// SHA-256 of the manifest file text
    pub project_identity: String,
    /// SHA-256 of the feature macro flags
    pub features_identity: String,
    pub release_identity: bool,
}

impl LockState {
    pub const FILENAME: &'static str = "project.lock";

    /// Fingerprint the current inputs
    pub fn compute(manifest_text: &str, feature_flags: &str, release: bool) -> Self {
        Self {
            project_identity: sha256_hex(manifest_text),
            features_identity: sha256_hex(feature_flags),
            release_identity: release,
        }
    }

    pub fn path(build_dir: &Path) -> PathBuf {
        build_dir.join(Self::FILENAME)
    }

    /// Load the previous state; a missing or unreadable lock is the empty state
    pub fn load(build_dir: &Path) -> Self {
        let path = Self::path(build_dir);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };

        match Config::parse(&text).and_then(|config| Self::from_config(&config)) {
            Ok(state) => state,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "ignoring corrupt lock file");
                Self::default()
            }
        }
    }

    /// Overwrite the lock file with this state
    pub fn save(&self, build_dir: &Path) -> BuildResult<()> {
        let path = Self::path(build_dir);
        fs::write(&path, self.to_config().stringify()).map_err(|e| BuildError::io(&path, e))
    }

    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        Ok(Self {
            project_identity: config.get_string(PROJECT_KEY)?.to_string(),
            features_identity: config.get_string(FEATURES_KEY)?.to_string(),
            release_identity: config.get_bool(RELEASE_KEY)?,
        })
    }

    pub fn to_config(&self) -> Config {
        let mut config = Config::new();
        config.set(PROJECT_KEY, self.project_identity.as_str());
        config.set(FEATURES_KEY, self.features_identity.as_str());
        config.set(RELEASE_KEY, self.release_identity);
        config
    }

    /// Whether a build from `self` must rebuild everything given the
    /// `previous` state. Release builds always do.
    pub fn requires_rebuild(&self, previous: &LockState) -> bool {
        self.release_identity || self != previous
    }
}

fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

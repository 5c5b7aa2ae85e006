//! Build modes and build types
//!
//! The mode picks debug or optimized compiler flags; the type picks the
//! build directory, so normal and test artifacts never share a directory.

use serde::Serialize;
use std::fmt;

/// Debug or release compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Debug,
    Release,
}

impl BuildMode {
    pub fn is_release(self) -> bool {
        matches!(self, Self::Release)
    }

    /// Compiler flags added for this mode
    pub fn compiler_flags(self) -> &'static [&'static str] {
        match self {
            Self::Debug => &["-g", "-DDEBUG"],
            Self::Release => &["-O2"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Regular build or test build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    #[default]
    Normal,
    Test,
}

impl BuildType {
    /// Build directory, relative to the project root
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Normal => "build",
            Self::Test => "test",
        }
    }

    pub fn is_test(self) -> bool {
        matches!(self, Self::Test)
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Test => f.write_str("test"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_flags() {
        assert_eq!(BuildMode::Debug.compiler_flags(), ["-g", "-DDEBUG"]);
        assert_eq!(BuildMode::Release.compiler_flags(), ["-O2"]);
        assert!(BuildMode::Release.is_release());
        assert!(!BuildMode::default().is_release());
    }

    #[test]
    fn test_build_type_directories() {
        assert_eq!(BuildType::Normal.dir_name(), "build");
        assert_eq!(BuildType::Test.dir_name(), "test");
        assert_ne!(BuildType::Normal.dir_name(), BuildType::Test.dir_name());
    }
}

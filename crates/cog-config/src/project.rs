//! Project Settings
//!
//! Typed view of the `project.*`, `which.*` and `cpp.*` manifest keys.

use crate::config::Config;
use crate::ConfigResult;

/// Settings read from the project manifest
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSettings {
    /// Project name (`project.name`, required)
    pub name: String,
    /// Project version (`project.version`, default `1.0`)
    pub version: String,
    /// Project author (`project.author`, default `anonymous`)
    pub author: String,
    /// External tool names
    pub tools: ToolNames,
    /// C++ language standard (`cpp.version`, default 11)
    pub cpp_standard: u32,
    /// Treat warnings as errors (`cpp.strict`)
    pub strict: bool,
    /// Link statically (`cpp.static`)
    pub static_link: bool,
}

/// External tool binaries, overridable through `which.*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolNames {
    pub compiler: String,
    pub make: String,
    pub pkg_config: String,
}

impl Default for ToolNames {
    fn default() -> Self {
        Self {
            compiler: "g++".to_string(),
            make: "make".to_string(),
            pkg_config: "pkg-config".to_string(),
        }
    }
}

impl ProjectSettings {
    pub const DEFAULT_VERSION: &'static str = "1.0";
    pub const DEFAULT_AUTHOR: &'static str = "anonymous";
    pub const DEFAULT_CPP_STANDARD: u32 = 11;

    /// Read settings from a parsed manifest
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        let name = config.get_string("project.name")?.to_string();
        let version = config
            .get_optional_version("project.version")?
            .unwrap_or_else(|| Self::DEFAULT_VERSION.to_string());
        let author = config
            .get_optional_string("project.author")?
            .unwrap_or(Self::DEFAULT_AUTHOR)
            .to_string();

        let defaults = ToolNames::default();
        let tools = ToolNames {
            compiler: tool_override(config, "which.cpp", defaults.compiler)?,
            make: tool_override(config, "which.make", defaults.make)?,
            pkg_config: tool_override(config, "which.pkg-config", defaults.pkg_config)?,
        };

        let cpp_standard = config
            .get_optional_number("cpp.version")?
            .map(|n| n as u32)
            .unwrap_or(Self::DEFAULT_CPP_STANDARD);

        Ok(Self {
            name,
            version,
            author,
            tools,
            cpp_standard,
            strict: config.get_optional_bool("cpp.strict")?.unwrap_or(false),
            static_link: config.get_optional_bool("cpp.static")?.unwrap_or(false),
        })
    }
}

fn tool_override(config: &Config, key: &str, default: String) -> ConfigResult<String> {
    Ok(config
        .get_optional_string(key)?
        .map(str::to_string)
        .unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;

    #[test]
    fn test_defaults() {
        let config = Config::parse("project.name=demo;").unwrap();
        let settings = ProjectSettings::from_config(&config).unwrap();

        assert_eq!(settings.name, "demo");
        assert_eq!(settings.version, "1.0");
        assert_eq!(settings.author, "anonymous");
        assert_eq!(settings.tools, ToolNames::default());
        assert_eq!(settings.cpp_standard, 11);
        assert!(!settings.strict);
        assert!(!settings.static_link);
    }

    #[test]
    fn test_overrides() {
        let config = Config::parse(
            "project.name=demo;project.version=2.1.0;project.author=Ada;\
             which.cpp=clang++;which.make=gmake;which.pkg-config=pkgconf;\
             cpp.version=17;cpp.strict=true;cpp.static=true;",
        )
        .unwrap();
        let settings = ProjectSettings::from_config(&config).unwrap();

        assert_eq!(settings.version, "2.1.0");
        assert_eq!(settings.author, "Ada");
        assert_eq!(settings.tools.compiler, "clang++");
        assert_eq!(settings.tools.make, "gmake");
        assert_eq!(settings.tools.pkg_config, "pkgconf");
        assert_eq!(settings.cpp_standard, 17);
        assert!(settings.strict);
        assert!(settings.static_link);
    }

    #[test]
    fn test_numeric_version_gets_one_decimal() {
        let config = Config::parse("project.name=demo;project.version=2;").unwrap();
        let settings = ProjectSettings::from_config(&config).unwrap();
        assert_eq!(settings.version, "2.0");
    }

    #[test]
    fn test_name_is_required() {
        let config = Config::parse("project.version=1.0;").unwrap();
        let err = ProjectSettings::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref key) if key == "project.name"));
    }

    #[test]
    fn test_name_must_be_string() {
        let config = Config::parse("project.name=42;").unwrap();
        let err = ProjectSettings::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { .. }));
    }
}

//! Package and feature declarations
//!
//! Reads every `pkg.*`, `pkg?.*` and `feature.*` key of a manifest into
//! index-addressable tables. Declaration order is the manifest's key order.

use crate::{PackageError, Result};
use cog_config::{Config, Value};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static CONSTRAINED_PACKAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^pkg\??\.([a-zA-Z0-9.+_-]+)(<|>)$").expect("valid package pattern")
});

static PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^pkg\??\.([a-zA-Z0-9.+_-]+)$").expect("valid package pattern"));

static FEATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^feature\.([A-Z0-9_]+)(\.required|\.notes|\.note)?$")
        .expect("valid feature pattern")
});

/// Version relation of a package constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Relation {
    #[serde(rename = "=")]
    Exactly,
    #[serde(rename = "<=")]
    AtMost,
    #[serde(rename = ">=")]
    AtLeast,
}

impl Relation {
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Exactly => "=",
            Relation::AtMost => "<=",
            Relation::AtLeast => ">=",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external library declared in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub relation: Relation,
    /// Version literal, `*` when unconstrained
    pub version: String,
    /// Declared with `pkg.` (true) or `pkg?.` (false until a feature needs it)
    pub required: bool,
}

impl Package {
    pub const ANY_VERSION: &'static str = "*";

    /// Query string handed to the package tool
    pub fn query(&self) -> String {
        if self.version == Self::ANY_VERSION {
            self.name.clone()
        } else {
            format!("{} {} {}", self.name, self.relation, self.version)
        }
    }
}

/// A toggleable feature declared in the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// Name without the `feature.` prefix
    pub name: String,
    /// Enabled before resolution (declared default ANDed with the default-features flag)
    pub default_enabled: bool,
    pub notes: Option<String>,
    /// Raw dependency tokens from `.required`
    pub dependencies: Vec<String>,
}

impl Feature {
    fn new(name: &str, use_default_features: bool) -> Self {
        Self {
            name: name.to_string(),
            default_enabled: use_default_features,
            notes: None,
            dependencies: Vec::new(),
        }
    }

    /// Preprocessor flag defined when the feature is enabled
    pub fn macro_flag(&self) -> String {
        format!("-DFEATURE_{}", self.name)
    }
}

/// All package and feature declarations of a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    pub packages: Vec<Package>,
    pub features: Vec<Feature>,
}

impl Declarations {
    /// Collect declarations from a parsed manifest.
    ///
    /// With `use_default_features` false every feature starts disabled,
    /// whatever its declared default.
    pub fn from_config(config: &Config, use_default_features: bool) -> Result<Self> {
        let mut declarations = Self::default();

        for (key, value) in config.iter() {
            if is_package_key(key) {
                let package = parse_package(config, key, value)?;
                tracing::debug!(package = %package.name, query = %package.query(), "declared package");
                declarations.packages.push(package);
            } else if key.starts_with("feature.") && key.len() > "feature.".len() {
                declarations.add_feature_key(config, key, value, use_default_features)?;
            }
        }

        Ok(declarations)
    }

    fn add_feature_key(
        &mut self,
        config: &Config,
        key: &str,
        value: &Value,
        use_default_features: bool,
    ) -> Result<()> {
        let captures = FEATURE
            .captures(key)
            .ok_or_else(|| PackageError::InvalidDeclaration {
                key: key.to_string(),
                reason: "does not contain a valid feature name",
            })?;
        let name = &captures[1];
        let index = match self.feature_index(name) {
            Some(index) => index,
            None => {
                self.features.push(Feature::new(name, use_default_features));
                self.features.len() - 1
            }
        };
        let feature = &mut self.features[index];

        match captures.get(2).map(|m| m.as_str()) {
            None => {
                if !value.is_null() {
                    feature.default_enabled = config.get_bool(key)? && use_default_features;
                }
            }
            Some(".required") => {
                if !value.is_null() {
                    feature.dependencies.extend(
                        config
                            .get_string(key)?
                            .split(',')
                            .map(str::trim)
                            .filter(|token| !token.is_empty())
                            .map(str::to_string),
                    );
                }
            }
            Some(_) => {
                feature.notes = match value {
                    Value::Null => None,
                    _ => Some(config.get_string(key)?.to_string()),
                };
            }
        }

        Ok(())
    }

    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|feature| feature.name == name)
    }

    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.feature_index(name).map(|index| &self.features[index])
    }

    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|package| package.name == name)
    }
}

fn is_package_key(key: &str) -> bool {
    (key.starts_with("pkg.") && key.len() > "pkg.".len())
        || (key.starts_with("pkg?.") && key.len() > "pkg?.".len())
}

fn parse_package(config: &Config, key: &str, value: &Value) -> Result<Package> {
    let (name, relation) = if let Some(captures) = CONSTRAINED_PACKAGE.captures(key) {
        let relation = if &captures[2] == "<" {
            Relation::AtMost
        } else {
            Relation::AtLeast
        };
        (captures[1].to_string(), relation)
    } else if let Some(captures) = PACKAGE.captures(key) {
        (captures[1].to_string(), Relation::Exactly)
    } else {
        return Err(PackageError::InvalidDeclaration {
            key: key.to_string(),
            reason: "does not contain a valid package name",
        });
    };

    let version = if value.is_null() {
        Package::ANY_VERSION.to_string()
    } else {
        config.get_version(key)?
    };

    Ok(Package {
        name,
        relation,
        version,
        required: !key.starts_with("pkg?."),
    })
}

//! Feature resolution
//!
//! Breadth-first walk over feature dependencies. Visitation is tracked in a
//! set of feature indices outside the declaration tables, so resolving the
//! same declarations twice gives the same answer and cycles terminate.

use crate::declaration::{Declarations, Package};
use crate::{PackageError, Result};
use std::collections::{HashSet, VecDeque};

/// Outcome of feature resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Enabled feature names, in declaration order
    pub features: Vec<String>,
    /// Packages that must be queried, in declaration order
    pub packages: Vec<Package>,
}

impl Resolution {
    /// One `-DFEATURE_<NAME>` flag per enabled feature
    pub fn macro_flags(&self) -> Vec<String> {
        self.features
            .iter()
            .map(|name| format!("-DFEATURE_{name}"))
            .collect()
    }

    /// Macro flags joined with spaces; this is the fingerprinted feature string
    pub fn feature_flags(&self) -> String {
        self.macro_flags().join(" ")
    }
}

struct Pending {
    name: String,
    origin: String,
}

/// Resolve enabled features and required packages.
///
/// `forced` names come from the command line and may be written as `NAME`
/// or `feature.NAME`. They are queued before the declared defaults.
pub fn resolve<S: AsRef<str>>(declarations: &Declarations, forced: &[S]) -> Result<Resolution> {
    let mut queue: VecDeque<Pending> = VecDeque::new();

    for name in forced {
        let name = name.as_ref().trim();
        let name = name.strip_prefix("feature.").unwrap_or(name);
        queue.push_back(Pending {
            name: name.to_string(),
            origin: "requested on the command line".to_string(),
        });
    }
    for feature in declarations.features.iter().filter(|f| f.default_enabled) {
        queue.push_back(Pending {
            name: feature.name.clone(),
            origin: "enabled by default".to_string(),
        });
    }

    let mut visited: HashSet<usize> = HashSet::new();
    let mut required: Vec<bool> = declarations.packages.iter().map(|p| p.required).collect();

    while let Some(pending) = queue.pop_front() {
        let index = declarations
            .feature_index(&pending.name)
            .ok_or_else(|| PackageError::UnknownFeature {
                name: pending.name.clone(),
                origin: pending.origin.clone(),
            })?;
        if !visited.insert(index) {
            continue;
        }

        let feature = &declarations.features[index];
        tracing::debug!(feature = %feature.name, origin = %pending.origin, "enabled feature");

        for entry in &feature.dependencies {
            if let Some(package) = entry.strip_prefix("pkg.") {
                let mut found = false;
                for (slot, declared) in declarations.packages.iter().enumerate() {
                    if declared.name == package {
                        required[slot] = true;
                        found = true;
                    }
                }
                if !found {
                    return Err(PackageError::UnresolvedPackage {
                        entry: entry.clone(),
                        feature: feature.name.clone(),
                    });
                }
                tracing::debug!(package, feature = %feature.name, "required package");
            } else if let Some(dependency) = entry.strip_prefix("feature.") {
                queue.push_back(Pending {
                    name: dependency.to_string(),
                    origin: format!("required by feature.{}", feature.name),
                });
            } else {
                return Err(PackageError::InvalidDependencyEntry {
                    entry: entry.clone(),
                    feature: feature.name.clone(),
                });
            }
        }
    }

    let features = declarations
        .features
        .iter()
        .enumerate()
        .filter(|(index, _)| visited.contains(index))
        .map(|(_, feature)| feature.name.clone())
        .collect();

    let packages = declarations
        .packages
        .iter()
        .zip(required)
        .filter(|(_, required)| *required)
        .map(|(package, _)| Package {
            required: true,
            ..package.clone()
        })
        .collect();

    Ok(Resolution { features, packages })
}

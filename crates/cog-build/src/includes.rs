//! Local include extraction
//!
//! Follows `#include "..."` lines breadth-first from a source file so that
//! the generated makefile can recompile an object when any header it pulls
//! in changes. Angle-bracket includes are system headers and are ignored.
//! All paths are relative to the project root.

use regex::Regex;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

static LOCAL_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^#include\s+"([^"]+)"$"#).expect("valid include pattern"));

/// `object: source include...` makefile rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRule {
    pub object: String,
    pub source: String,
    pub includes: Vec<String>,
}

impl DependencyRule {
    /// Build the rule for `source`, reading files under `root`
    pub fn for_source(root: &Path, source: &Path, object: &Path) -> Self {
        Self {
            object: make_path(object),
            source: make_path(source),
            includes: local_includes(root, source)
                .iter()
                .map(|path| make_path(path))
                .collect(),
        }
    }
}

impl fmt::Display for DependencyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.object, self.source)?;
        for include in &self.includes {
            write!(f, " {include}")?;
        }
        Ok(())
    }
}

/// Every readable file reachable from `source` through local includes, in
/// discovery order, excluding `source` itself. Each file is listed once.
///
/// Includes resolve against the directory of the file that contains them.
/// Files that cannot be read are left out with a warning.
pub fn local_includes(root: &Path, source: &Path) -> Vec<PathBuf> {
    let start = normalize(source);
    let mut visited: HashSet<PathBuf> = HashSet::from([start.clone()]);
    let mut queue: VecDeque<PathBuf> = VecDeque::from([start.clone()]);
    let mut found = Vec::new();

    while let Some(file) = queue.pop_front() {
        let bytes = match fs::read(root.join(&file)) {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(file = %file.display(), %error, "could not access file");
                continue;
            }
        };
        if file != start {
            found.push(file.clone());
        }
        let text = String::from_utf8_lossy(&bytes);
        let parent = file.parent().unwrap_or_else(|| Path::new(""));

        for line in text.lines() {
            let Some(captures) = LOCAL_INCLUDE.captures(line.trim()) else {
                continue;
            };
            let target = normalize(&parent.join(&captures[1]));
            if visited.insert(target.clone()) {
                queue.push_back(target);
            }
        }
    }

    found
}

/// Lexically resolve `.` and `..` components
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

/// Render a relative path with `/` separators, as make expects
pub fn make_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

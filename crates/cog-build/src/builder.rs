//! Build orchestration and pipeline management
use crate::error::{BuildError, BuildResult};
use crate::includes::{make_path, DependencyRule};
use crate::lockfile::LockState;
use crate::makefile::{compiler_flags, Makefile, HARNESS_DIR};
use crate::profile::{BuildMode, BuildType};

use cog_config::{Manifest, ProjectSettings};
use cog_package::{
    ensure_tool, query_package_flags, resolve, Declarations, Package, PackageFlags, Resolution,
    SystemRunner, ToolRunner,
};

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// A file written verbatim into the test build's harness directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessFile {
    pub name: String,
    pub contents: String,
}

impl HarnessFile {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Everything decided before `make` runs
#[derive(Debug, Clone)]
pub struct BuildPlan {
    /// Build directory (absolute)
    pub build_dir: PathBuf,
    pub makefile_path: PathBuf,
    pub makefile: String,
    pub forced_rebuild: bool,
    pub resolution: Resolution,
    pub package_flags: PackageFlags,
    /// Project sources relative to the project root, sorted
    pub sources: Vec<String>,
}

/// Result of a successful build
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub project: String,
    pub version: String,
    pub mode: BuildMode,
    pub build_type: BuildType,
    pub forced_rebuild: bool,
    pub features: Vec<String>,
    pub packages: Vec<Package>,
    pub sources: usize,
    /// Target path without a platform suffix
    pub target: PathBuf,
    pub elapsed_secs: f64,
}

/// Main builder for orchestrating builds
pub struct Builder {
    /// Project root directory
    root_dir: PathBuf,
    manifest: Manifest,
    settings: ProjectSettings,
    mode: BuildMode,
    build_type: BuildType,
    /// Feature names forced on from the command line
    features: Vec<String>,
    default_features: bool,
    harness: Vec<HarnessFile>,
    runner: Box<dyn ToolRunner>,
}

impl Builder {
    /// Create a new builder for the project at the given path
    pub fn new(project_path: impl AsRef<Path>) -> BuildResult<Self> {
        let project_path = project_path.as_ref();
        let root_dir =
            std::path::absolute(project_path).map_err(|e| BuildError::io(project_path, e))?;
        let manifest = Manifest::load(&root_dir)?;
        let settings = ProjectSettings::from_config(&manifest.config)?;

        Ok(Self {
            root_dir,
            manifest,
            settings,
            mode: BuildMode::default(),
            build_type: BuildType::default(),
            features: Vec::new(),
            default_features: true,
            harness: Vec::new(),
            runner: Box::new(SystemRunner),
        })
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    /// Force features on, by `NAME` or `feature.NAME`
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features.extend(features.into_iter().map(Into::into));
        self
    }

    /// Enable or disable the manifest's default features
    pub fn with_default_features(mut self, enabled: bool) -> Self {
        self.default_features = enabled;
        self
    }

    /// Replace the process runner
    pub fn with_runner(mut self, runner: impl ToolRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Files written into the harness directory of test builds
    pub fn with_harness(mut self, files: Vec<HarnessFile>) -> Self {
        self.harness = files;
        self
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root_dir.join(self.build_type.dir_name())
    }

    /// Path of the linked binary, with `.exe` on Windows hosts
    pub fn target_path(&self) -> PathBuf {
        let name = if cfg!(windows) {
            format!("{}.exe", self.settings.name)
        } else {
            self.settings.name.clone()
        };
        self.build_dir().join(name)
    }

    /// Prepare a build without running `make`.
    ///
    /// Checks the compiler and `make`, resolves features and packages,
    /// updates the lock file and renders the makefile.
    pub fn plan(&self) -> BuildResult<BuildPlan> {
        let tools = &self.settings.tools;
        ensure_tool(self.runner.as_ref(), &tools.compiler, "cpp")?;
        ensure_tool(self.runner.as_ref(), &tools.make, "make")?;

        let declarations = Declarations::from_config(&self.manifest.config, self.default_features)?;
        let resolution = resolve(&declarations, &self.features)?;
        tracing::debug!(features = ?resolution.features, "resolved features");

        let package_flags = query_package_flags(
            self.runner.as_ref(),
            &tools.pkg_config,
            &resolution.packages,
            self.settings.static_link,
        )?;

        let build_dir = self.build_dir();
        fs::create_dir_all(&build_dir).map_err(|e| BuildError::io(&build_dir, e))?;

        let current = LockState::compute(
            &self.manifest.text,
            &resolution.feature_flags(),
            self.mode.is_release(),
        );
        let previous = LockState::load(&build_dir);
        let forced_rebuild = current.requires_rebuild(&previous);
        current.save(&build_dir)?;
        if forced_rebuild {
            tracing::info!(mode = %self.mode, "inputs changed, rebuilding everything");
        }

        let harness_sources = self.write_harness(&build_dir)?;
        let sources = self.discover_source_files()?;

        let dir_name = self.build_type.dir_name();
        let dependency_rules = sources
            .iter()
            .map(|source| {
                DependencyRule::for_source(&self.root_dir, source, &object_path(dir_name, source))
            })
            .collect();
        let sources: Vec<String> = sources.iter().map(|source| make_path(source)).collect();

        let makefile = Makefile {
            build_dir: dir_name.to_string(),
            target: self.settings.name.clone(),
            compiler: tools.compiler.clone(),
            cflags: compiler_flags(&self.settings, self.mode, self.build_type, &resolution),
            sources: sources.clone(),
            harness_sources,
            package_flags: package_flags.clone(),
            static_link: self.settings.static_link,
            dependency_rules,
        }
        .render();

        Ok(BuildPlan {
            makefile_path: build_dir.join("makefile"),
            build_dir,
            makefile,
            forced_rebuild,
            resolution,
            package_flags,
            sources,
        })
    }

    /// Execute the build
    pub fn build(&self) -> BuildResult<BuildSummary> {
        let build_start = Instant::now();
        tracing::info!(
            project = %self.settings.name,
            version = %self.settings.version,
            mode = %self.mode,
            "building"
        );

        let plan = self.plan()?;
        fs::write(&plan.makefile_path, &plan.makefile)
            .map_err(|e| BuildError::io(&plan.makefile_path, e))?;

        let mut args = vec![
            format!("--makefile={}/makefile", self.build_type.dir_name()),
            "--silent".to_string(),
        ];
        if plan.forced_rebuild {
            args.push("--always-make".to_string());
        }

        let make = &self.settings.tools.make;
        let status = self
            .runner
            .run(make, &args, Some(&self.root_dir))
            .map_err(|e| BuildError::io(&self.root_dir, e))?;
        if status != 0 {
            return Err(BuildError::build_failed(make, status));
        }

        let elapsed = build_start.elapsed();
        tracing::info!(elapsed = ?elapsed, "build finished");

        Ok(BuildSummary {
            project: self.settings.name.clone(),
            version: self.settings.version.clone(),
            mode: self.mode,
            build_type: self.build_type,
            forced_rebuild: plan.forced_rebuild,
            features: plan.resolution.features,
            packages: plan.resolution.packages,
            sources: plan.sources.len(),
            target: plan.build_dir.join(&self.settings.name),
            elapsed_secs: elapsed.as_secs_f64(),
        })
    }

    /// Run the built binary from the project root and return its exit code
    pub fn run_target(&self, args: &[String]) -> BuildResult<i32> {
        let target = self.target_path();
        let program = target.to_string_lossy();
        tracing::debug!(target = %program, ?args, "running target");
        self.runner
            .run(&program, args, Some(&self.root_dir))
            .map_err(|e| BuildError::io(&target, e))
    }

    /// Discover `.cpp` files under `src/`, sorted, relative to the root
    fn discover_source_files(&self) -> BuildResult<Vec<PathBuf>> {
        let src_dir = self.root_dir.join("src");

        if !src_dir.is_dir() {
            return Err(BuildError::SourceDirMissing(src_dir));
        }

        let mut source_files = Vec::new();

        for entry in WalkDir::new(&src_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(error) => {
                    tracing::warn!(%error, "skipping unreadable source entry");
                    None
                }
            })
        {
            if entry.file_type().is_file() {
                let path = entry.path();
                if path.extension().and_then(|s| s.to_str()) == Some("cpp") {
                    if let Ok(relative) = path.strip_prefix(&self.root_dir) {
                        source_files.push(relative.to_path_buf());
                    }
                }
            }
        }

        Ok(source_files)
    }

    /// Write harness files for test builds; returns the harness sources
    fn write_harness(&self, build_dir: &Path) -> BuildResult<Vec<String>> {
        if !self.build_type.is_test() || self.harness.is_empty() {
            return Ok(Vec::new());
        }

        let harness_dir = build_dir.join(HARNESS_DIR);
        fs::create_dir_all(&harness_dir).map_err(|e| BuildError::io(&harness_dir, e))?;

        let mut sources = Vec::new();
        for file in &self.harness {
            let path = harness_dir.join(&file.name);
            fs::write(&path, &file.contents).map_err(|e| BuildError::io(&path, e))?;
            if file.name.ends_with(".cpp") {
                sources.push(format!(
                    "{}/{HARNESS_DIR}/{}",
                    self.build_type.dir_name(),
                    file.name
                ));
            }
        }
        Ok(sources)
    }
}

/// `src/a/b.cpp` -> `<dir>/a/b.o`
fn object_path(dir_name: &str, source: &Path) -> PathBuf {
    let relative = source.strip_prefix("src").unwrap_or(source);
    Path::new(dir_name).join(relative).with_extension("o")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_path_mirrors_source() {
        assert_eq!(
            object_path("build", Path::new("src/a/b.cpp")),
            PathBuf::from("build/a/b.o")
        );
        assert_eq!(
            object_path("test", Path::new("src/main.cpp")),
            PathBuf::from("test/main.o")
        );
    }
}

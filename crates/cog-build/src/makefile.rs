//! Makefile generation
//!
//! Renders the build script handed to `make`. All paths are relative to the
//! project root, which is where `make` runs. The output depends only on the
//! inputs, so an unchanged project produces a byte-identical makefile.

use crate::includes::DependencyRule;
use crate::profile::{BuildMode, BuildType};
use cog_config::ProjectSettings;
use cog_package::{PackageFlags, Resolution};
use std::fmt::Write;

/// Directory under the test build directory that holds harness files
pub const HARNESS_DIR: &str = "harness";

/// Host detection; the target gets `.exe` on Windows
const MATCH_HOST: &str = "\
ifeq ($(OS),Windows_NT)
    TARGET := $(TARGET).exe
    CFLAGS += -DWIN32
else
    UNAME_S := $(shell uname -s)
    ifeq ($(UNAME_S),Linux)
        CFLAGS += -DLINUX
    endif
    ifeq ($(UNAME_S),Darwin)
        CFLAGS += -DOSX
    endif
endif
";

/// Everything the makefile is rendered from
#[derive(Debug, Clone)]
pub struct Makefile {
    /// Build directory relative to the project root (`build` or `test`)
    pub build_dir: String,
    pub target: String,
    pub compiler: String,
    pub cflags: Vec<String>,
    /// Project sources, `src/...`
    pub sources: Vec<String>,
    /// Harness sources, `<build-dir>/harness/...`
    pub harness_sources: Vec<String>,
    pub package_flags: PackageFlags,
    pub static_link: bool,
    pub dependency_rules: Vec<DependencyRule>,
}

impl Makefile {
    /// Render the makefile text
    pub fn render(&self) -> String {
        let dir = &self.build_dir;
        let mut out = String::from("# autogenerated makefile\n");

        writeln!(out, "TARGET = {dir}/{}", self.target).unwrap();
        writeln!(out, "SRC_FILES = {}", self.sources.join(" ")).unwrap();
        writeln!(out, "CXX = {}", self.compiler).unwrap();
        writeln!(out, "CFLAGS = {}", self.cflags.join(" ")).unwrap();
        writeln!(out, "OBJECTS = $(patsubst src/%.cpp,{dir}/%.o,${{SRC_FILES}})").unwrap();
        if !self.harness_sources.is_empty() {
            writeln!(out, "HARNESS_FILES = {}", self.harness_sources.join(" ")).unwrap();
            writeln!(
                out,
                "OBJECTS += $(patsubst {dir}/{HARNESS_DIR}/%.cpp,{dir}/{HARNESS_DIR}/%.o,${{HARNESS_FILES}})"
            )
            .unwrap();
        }
        out.push('\n');
        out.push_str(MATCH_HOST);

        out.push_str("\n.PHONY: all\nall: $(TARGET)\n\n");

        writeln!(out, "$(TARGET): $(OBJECTS)").unwrap();
        writeln!(out, "\t@$(CXX) -o $@ $^{}", self.link_flags()).unwrap();
        out.push('\n');

        let compile_recipe = format!(
            "\t@mkdir -p $(@D)\n\t@$(CXX) $(CFLAGS) -o $@ -c $<{}\n",
            suffix(&self.package_flags.compile)
        );
        writeln!(out, "{dir}/%.o: src/%.cpp").unwrap();
        out.push_str(&compile_recipe);
        if !self.harness_sources.is_empty() {
            out.push('\n');
            writeln!(out, "{dir}/{HARNESS_DIR}/%.o: {dir}/{HARNESS_DIR}/%.cpp").unwrap();
            out.push_str(&compile_recipe);
        }
        out.push('\n');

        for rule in &self.dependency_rules {
            writeln!(out, "{rule}").unwrap();
        }

        out
    }

    fn link_flags(&self) -> String {
        let mut flags = suffix(&self.package_flags.link);
        if self.static_link {
            flags.push_str(" -static");
        }
        flags
    }
}

fn suffix(flags: &str) -> String {
    if flags.is_empty() {
        String::new()
    } else {
        format!(" {flags}")
    }
}

/// Compiler flags for a project build
///
/// Order: language standard, warnings, mode flags, test flags, the three
/// identity macros, then one macro per enabled feature.
pub fn compiler_flags(
    settings: &ProjectSettings,
    mode: BuildMode,
    build_type: BuildType,
    resolution: &Resolution,
) -> Vec<String> {
    let mut flags = vec![format!("-std=c++{}", settings.cpp_standard), "-Wall".to_string()];
    if settings.strict {
        flags.push("-Werror".to_string());
        flags.push("-Wpedantic".to_string());
    }
    flags.extend(mode.compiler_flags().iter().map(|flag| flag.to_string()));
    if build_type.is_test() {
        flags.push("-DTEST".to_string());
        flags.push(format!("-I{}/{HARNESS_DIR}", build_type.dir_name()));
    }
    flags.push(identity_macro("PROJECT_NAME", &settings.name));
    flags.push(identity_macro("PROJECT_VERSION", &settings.version));
    flags.push(identity_macro("PROJECT_AUTHOR", &settings.author));
    flags.extend(resolution.macro_flags());
    flags
}

/// `-DNAME="\"value\""`, with quotes in the value escaped for both make's
/// shell and the preprocessor
fn identity_macro(name: &str, value: &str) -> String {
    format!(
        "-D{name}=\"\\\"{}\\\"\"",
        escape_quotes(&escape_quotes(value))
    )
}

fn escape_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cog_config::Config;
    use pretty_assertions::assert_eq;

    fn settings(text: &str) -> ProjectSettings {
        ProjectSettings::from_config(&Config::parse(text).unwrap()).unwrap()
    }

    fn resolution(features: &[&str]) -> Resolution {
        Resolution {
            features: features.iter().map(|f| f.to_string()).collect(),
            packages: vec![],
        }
    }

    #[test]
    fn test_identity_macro_quoting() {
        assert_eq!(identity_macro("PROJECT_NAME", "demo"), r#"-DPROJECT_NAME="\"demo\"""#);
        assert_eq!(
            identity_macro("PROJECT_AUTHOR", r#"Ada "A" L"#),
            r#"-DPROJECT_AUTHOR="\"Ada \\"A\\" L\"""#
        );
    }

    #[test]
    fn test_debug_flags() {
        let flags = compiler_flags(
            &settings("project.name=demo;"),
            BuildMode::Debug,
            BuildType::Normal,
            &resolution(&["LOGGING"]),
        );
        assert_eq!(
            flags,
            vec![
                "-std=c++11",
                "-Wall",
                "-g",
                "-DDEBUG",
                r#"-DPROJECT_NAME="\"demo\"""#,
                r#"-DPROJECT_VERSION="\"1.0\"""#,
                r#"-DPROJECT_AUTHOR="\"anonymous\"""#,
                "-DFEATURE_LOGGING",
            ]
        );
    }

    #[test]
    fn test_release_strict_test_flags() {
        let flags = compiler_flags(
            &settings("project.name=demo;cpp.version=17;cpp.strict=true;"),
            BuildMode::Release,
            BuildType::Test,
            &resolution(&[]),
        );
        assert_eq!(
            &flags[..6],
            ["-std=c++17", "-Wall", "-Werror", "-Wpedantic", "-O2", "-DTEST"]
        );
        assert_eq!(flags[6], "-Itest/harness");
        assert!(!flags.iter().any(|f| f == "-DDEBUG" || f == "-g"));
    }

    fn makefile() -> Makefile {
        Makefile {
            build_dir: "build".to_string(),
            target: "demo".to_string(),
            compiler: "g++".to_string(),
            cflags: vec!["-std=c++11".to_string(), "-Wall".to_string()],
            sources: vec!["src/main.cpp".to_string(), "src/util/math.cpp".to_string()],
            harness_sources: vec![],
            package_flags: PackageFlags {
                compile: "-I/usr/include/zlib".to_string(),
                link: "-lz".to_string(),
            },
            static_link: false,
            dependency_rules: vec![DependencyRule {
                object: "build/main.o".to_string(),
                source: "src/main.cpp".to_string(),
                includes: vec!["src/util/math.hpp".to_string()],
            }],
        }
    }

    #[test]
    fn test_render() {
        let text = makefile().render();
        let expected = "\
# autogenerated makefile
TARGET = build/demo
SRC_FILES = src/main.cpp src/util/math.cpp
CXX = g++
CFLAGS = -std=c++11 -Wall
OBJECTS = $(patsubst src/%.cpp,build/%.o,${SRC_FILES})

"
        .to_string()
            + MATCH_HOST
            + "
.PHONY: all
all: $(TARGET)

$(TARGET): $(OBJECTS)
\t@$(CXX) -o $@ $^ -lz

build/%.o: src/%.cpp
\t@mkdir -p $(@D)
\t@$(CXX) $(CFLAGS) -o $@ -c $< -I/usr/include/zlib

build/main.o: src/main.cpp src/util/math.hpp
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_static_without_packages() {
        let mut makefile = makefile();
        makefile.static_link = true;
        makefile.package_flags = PackageFlags::default();
        let text = makefile.render();

        assert!(text.contains("\t@$(CXX) -o $@ $^ -static\n"));
        assert!(text.contains("\t@$(CXX) $(CFLAGS) -o $@ -c $<\n"));
    }

    #[test]
    fn test_render_harness_rules() {
        let mut makefile = makefile();
        makefile.build_dir = "test".to_string();
        makefile.harness_sources = vec!["test/harness/__testing__.cpp".to_string()];
        let text = makefile.render();

        assert!(text.contains("TARGET = test/demo\n"));
        assert!(text.contains(
            "OBJECTS += $(patsubst test/harness/%.cpp,test/harness/%.o,${HARNESS_FILES})\n"
        ));
        assert!(text.contains("test/harness/%.o: test/harness/%.cpp\n\t@mkdir -p $(@D)\n"));
    }
}

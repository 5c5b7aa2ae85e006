//! Project scaffolding command (cog new)

use anyhow::{bail, Context, Result};
use cog_config::encoding::encode;
use cog_config::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_NAME: &str = "UntitledProject";

const GITIGNORE: &str = "build\ntest\n";

const MAIN_CPP: &str = r#"#include <iostream>
using namespace std;

int main() {
	cout << "Project: " << PROJECT_NAME << " v" << PROJECT_VERSION << " by " << PROJECT_AUTHOR << endl;
	cout << "Hello World!" << endl;
}
"#;

fn manifest_template(name: &str) -> String {
    format!(
        "# Project Details;
project.name={};
project.version=1.0;
project.author=You!;

# Compilation Settings;
#cpp.version=11;
#cpp.strict=true;
#cpp.static=false;

#which.cpp=g++;
#which.make=make;
#which.pkg-config=pkg-config;

# Package Dependencies;
#pkg.libR=1.0;
#pkg.zlib>=2.0;
#pkg?.libpcre2-8;

# Features;
#feature.LOGGING=true;
#feature.LOGGING.notes=Verbose logging;
#feature.REGEX=false;
#feature.REGEX.required=pkg.libpcre2-8;
",
        encode(&Value::from(name).to_string())
    )
}

/// Run the new command in the current directory
pub fn run(name: Option<&str>) -> Result<()> {
    let name = name.unwrap_or(DEFAULT_NAME);
    eprintln!("Creating project \"{name}\"");
    create_project(Path::new("."), name)?;
    Ok(())
}

/// Create `<parent>/<name>` with a manifest and a hello-world source
pub fn create_project(parent: &Path, name: &str) -> Result<PathBuf> {
    validate_name(name)?;

    let root = parent.join(name);
    if root.exists() {
        bail!("Destination \"{}\" already exists", root.display());
    }

    let src = root.join("src");
    fs::create_dir_all(&src)
        .with_context(|| format!("Failed to create {}", src.display()))?;

    for (path, contents) in [
        (root.join(".gitignore"), GITIGNORE.to_string()),
        (root.join("project.cfg"), manifest_template(name)),
        (src.join("main.cpp"), MAIN_CPP.to_string()),
    ] {
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(root)
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." {
        bail!("Invalid project name \"{name}\"");
    }
    if let Some(ch) = name
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '+')))
    {
        bail!("Invalid project name \"{name}\": character '{ch}' is not allowed");
    }
    Ok(())
}

//! Cog Build System
//!
//! Turns a resolved project into a makefile and drives `make`:
//! - Fingerprint lock deciding when everything must be rebuilt
//! - Local include extraction for per-object dependency rules
//! - Makefile rendering with compiler, feature and package flags
//! - The [`Builder`] pipeline tying resolution, generation and `make` together

pub mod builder;
pub mod error;
pub mod includes;
pub mod lockfile;
pub mod makefile;
pub mod profile;

pub use builder::{BuildPlan, BuildSummary, Builder, HarnessFile};
pub use error::{BuildError, BuildResult};
pub use includes::{local_includes, DependencyRule};
pub use lockfile::LockState;
pub use makefile::Makefile;
pub use profile::{BuildMode, BuildType};

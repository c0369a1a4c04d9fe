//! Build metadata captured by `build.rs`.

use std::fmt;

use serde::Serialize;

/// Compile-time facts about this binary.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_branch: &'static str,
    pub git_dirty: bool,
    pub build_timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc_version: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            git_hash: env!("PERSONA_GIT_HASH"),
            git_branch: env!("PERSONA_GIT_BRANCH"),
            git_dirty: env!("PERSONA_GIT_DIRTY") == "true",
            build_timestamp: env!("PERSONA_BUILD_TIMESTAMP"),
            target: env!("PERSONA_TARGET"),
            profile: env!("PERSONA_PROFILE"),
            rustc_version: env!("PERSONA_RUSTC_VERSION"),
        }
    }

    /// Version with commit suffix, e.g. `0.1.0-1a2b3c4d` or `0.1.0-1a2b3c4d-dirty`.
    pub fn full_version(&self) -> String {
        let mut full = format!("{}-{}", self.version, self.git_hash);
        if self.git_dirty {
            full.push_str("-dirty");
        }
        full
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.name, self.full_version())?;
        writeln!(f, "  Branch:   {}", self.git_branch)?;
        writeln!(f, "  Built:    {} ({})", self.build_timestamp, self.profile)?;
        writeln!(f, "  Target:   {}", self.target)?;
        writeln!(f, "  Compiler: {}", self.rustc_version)
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::current()
}

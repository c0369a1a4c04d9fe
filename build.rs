//! Embeds git and toolchain details as `PERSONA_*` compile-time variables.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let status = git(&["status", "--porcelain"]);
    let dirty = match status {
        Some(ref out) if !out.is_empty() => "true",
        Some(_) => "false",
        None => "unknown",
    };

    let vars = [
        ("PERSONA_GIT_HASH", git(&["rev-parse", "--short=8", "HEAD"]).unwrap_or_else(unknown)),
        ("PERSONA_GIT_BRANCH", git(&["rev-parse", "--abbrev-ref", "HEAD"]).unwrap_or_else(unknown)),
        ("PERSONA_GIT_DIRTY", dirty.to_string()),
        (
            "PERSONA_BUILD_TIMESTAMP",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
        ("PERSONA_TARGET", env::var("TARGET").unwrap_or_else(|_| unknown())),
        ("PERSONA_PROFILE", env::var("PROFILE").unwrap_or_else(|_| unknown())),
        ("PERSONA_RUSTC_VERSION", command_output("rustc", &["--version"]).unwrap_or_else(unknown)),
    ];

    for (key, value) in &vars {
        println!("cargo:rustc-env={}={}", key, value);
    }
}

fn unknown() -> String {
    "unknown".to_string()
}

fn git(args: &[&str]) -> Option<String> {
    command_output("git", args)
}

/// Trimmed stdout of a successful command.
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok().map(|s| s.trim().to_string())
}

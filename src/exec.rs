use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Locate a program on PATH. Looked up fresh on every call, never cached.
pub fn resolve_executable(name: &str) -> Result<PathBuf> {
    which::which(name).with_context(|| format!("{name} not found in PATH"))
}

/// Run a command to completion and capture its output. Returns stdout on a
/// zero exit; a non-zero exit becomes an error carrying both output streams
/// so callers can surface the raw output.
pub async fn run_captured(program: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .with_context(|| format!("failed to run {}", program.display()))?;

    if !output.status.success() {
        bail!(
            "{} {} failed ({}):\n{}{}",
            program.display(),
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

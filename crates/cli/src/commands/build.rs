use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

/// Probe the current directory for a known build entry point and run it.
/// Probes are ordered; the first hit wins.
pub fn execute(_argv: &[String]) -> Result<()> {
    tracing::debug!("executing build command");

    if Path::new("package.json").exists() {
        return run("npm", &["run", "build"]);
    }
    if cfg!(target_os = "linux") && Path::new("build.sh").exists() {
        return run("sh", &["build.sh"]);
    }
    if Path::new("Makefile").exists() {
        return run("make", &["build"]);
    }
    if Path::new("build.bat").exists() {
        return run("build.bat", &[]);
    }
    if Path::new("build.cmd").exists() {
        return run("build.cmd", &[]);
    }
    if Path::new("build.ps1").exists() {
        return run("pwsh", &["-File", "build.ps1"]);
    }
    if Path::new("build.js").exists() {
        return run("node", &["build.js"]);
    }
    if Path::new("mkdocs.yml").exists() {
        return run("mkdocs", &["build"]);
    }

    bail!("no recognized build entry point in the current directory");
}

fn run(program: &str, args: &[&str]) -> Result<()> {
    tracing::debug!(program, ?args, "spawning build tool");
    let status = Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("failed to run {program}"))?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }
    Ok(())
}

use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde::Deserialize;

const MODULE_ROOT_VAR: &str = "DEV_SYMLINK_MODULE_ROOT";

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: IndexMap<String, String>,
}

/// `dev symlink <mode>` — point the current package's dependencies at local
/// checkouts under `$DEV_SYMLINK_MODULE_ROOT/<mode>/`.
pub fn execute(argv: &[String]) -> Result<()> {
    tracing::debug!("executing symlink command");

    let Ok(module_root) = std::env::var(MODULE_ROOT_VAR) else {
        eprintln!("{MODULE_ROOT_VAR} environment variable is not set");
        std::process::exit(1);
    };

    let raw = fs::read_to_string("package.json").context("failed to read package.json")?;
    let package: PackageJson =
        serde_json::from_str(&raw).context("failed to parse package.json")?;

    let mode = argv
        .first()
        .map(|m| m.trim().to_string())
        .unwrap_or_default();

    if mode.is_empty() {
        eprintln!("Usage: symlink <mode>\n");
        eprintln!("Available modes:");
        let entries = fs::read_dir(&module_root)
            .with_context(|| format!("failed to read {module_root}"))?;
        for entry in entries {
            let entry = entry.context("failed to read directory entry")?;
            eprintln!("   {}", entry.file_name().to_string_lossy());
        }
        std::process::exit(1);
    }

    let root = Path::new(&module_root).join(&mode);
    println!("[🚧] Symlinking modules to {}", root.display());

    for name in package.dependencies.keys() {
        link(&root, name)?;
    }
    Ok(())
}

/// Install the local checkout of `name` if one exists under `root`; absent
/// checkouts are skipped silently.
fn link(root: &Path, name: &str) -> Result<()> {
    let dst = root.join(name);
    if !dst.exists() {
        return Ok(());
    }

    println!("- {name}");
    let status = Command::new("npm")
        .arg("install")
        .arg(&dst)
        .status()
        .context("failed to run npm install")?;
    if !status.success() {
        bail!("npm install {} exited with {status}", dst.display());
    }
    Ok(())
}

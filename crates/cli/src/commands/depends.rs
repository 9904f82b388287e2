use std::process::Command;

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::spinner;

/// One node of the `npm ls --json` dependency tree.
#[derive(Debug, Clone, Default, Deserialize)]
struct NpmEntry {
    #[serde(default)]
    dependencies: IndexMap<String, NpmEntry>,
}

/// Depth-first search for every occurrence of `name`, collecting the chain of
/// package names leading to each hit. Matched subtrees are not descended into.
fn search<'a>(entry: &'a NpmEntry, name: &str, path: &[&'a str], hits: &mut Vec<Vec<&'a str>>) {
    for (key, child) in &entry.dependencies {
        if key == name {
            hits.push(path.to_vec());
        } else {
            let mut next = path.to_vec();
            next.push(key);
            search(child, name, &next, hits);
        }
    }
}

/// `dev depends <package> [-g]` — list which installed packages depend on
/// `<package>`, via the full `npm ls` tree.
pub fn execute(argv: &[String]) -> Result<()> {
    tracing::debug!("executing depends command");

    let mut npm_args: Vec<&str> = vec!["ls", "--json", "--depth=9999"];
    let mut argv: Vec<String> = argv.to_vec();
    if let Some(idx) = argv.iter().position(|a| a == "-g" || a == "--global") {
        npm_args.push("-g");
        argv.remove(idx);
    }

    let Some(package) = argv.first().cloned() else {
        bail!("no package name provided");
    };

    // The global tree can be huge; keep the spinner up while npm walks it.
    let output = spinner::with_spinner("npm ls", || {
        Command::new("npm").args(&npm_args).output()
    })
    .context("failed to run npm ls")?;

    // npm ls exits non-zero for peer-dependency problems while still printing
    // a usable tree, so the JSON decides.
    let tree: NpmEntry = serde_json::from_slice(&output.stdout)
        .context("failed to parse npm ls output")?;

    let mut hits: Vec<Vec<&str>> = Vec::new();
    search(&tree, &package, &[], &mut hits);

    if hits.is_empty() {
        println!("Package not found");
        return Ok(());
    }

    println!("# Following packages depend on {package}\n");
    for path in &hits {
        println!("- {}", path.join(" -> "));
    }
    println!();
    Ok(())
}

use std::process::Command;

use anyhow::{Context, Result, bail};

const VERBS: &[&str] = &["watch"];
const DEFAULT_URL: &str = "mongodb://localhost:27017";

/// `dev mongo watch <db> <collection> [--url <uri>]` — tail a collection's
/// change stream by delegating to the `mongosh` binary.
pub fn execute(argv: &[String]) -> Result<()> {
    tracing::debug!("executing mongo command");

    let mut argv: Vec<String> = argv.to_vec();
    let url = take_arg_value("--url", &mut argv).unwrap_or_else(|| DEFAULT_URL.to_string());

    // Only "watch" today.
    match argv.first().map(String::as_str) {
        Some("watch") => {}
        _ => usage(),
    }

    let Some(db) = argv.get(1) else {
        bail!("no database name provided");
    };
    let Some(collection) = argv.get(2) else {
        bail!("no collection name provided");
    };

    println!("Watching for changes in {url} database \"{db}\" collection \"{collection}\"");

    let script = format!(
        "const cursor = db.getSiblingDB({db:?}).getCollection({collection:?}).watch(); \
         while (true) {{ if (cursor.hasNext()) print(JSON.stringify(cursor.next())); }}"
    );
    let status = Command::new("mongosh")
        .arg(&url)
        .args(["--quiet", "--eval", &script])
        .status()
        .context("failed to run mongosh")?;
    if !status.success() {
        bail!("mongosh exited with {status}");
    }
    Ok(())
}

fn usage() -> ! {
    eprintln!("Usage: dev mongo <command>");
    eprintln!("Available commands: {}", VERBS.join(", "));
    std::process::exit(1);
}

fn take_arg_value(name: &str, argv: &mut Vec<String>) -> Option<String> {
    let idx = argv.iter().position(|a| a == name)?;
    argv.remove(idx);
    if idx < argv.len() {
        Some(argv.remove(idx))
    } else {
        None
    }
}

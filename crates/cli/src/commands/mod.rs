pub mod build;
pub mod depends;
pub mod mongo;
pub mod panel;
pub mod symlink;

use anyhow::Result;

/// Names accepted as the first positional token, as shown in the help listing.
pub const NAMES: &[&str] = &["build", "depends", "mongo", "panel-command", "symlink"];

/// Run `command` with the remaining argv, or `None` if the name is unknown.
pub fn dispatch(command: &str, argv: &[String]) -> Option<Result<()>> {
    match command {
        "build" => Some(build::execute(argv)),
        "depends" => Some(depends::execute(argv)),
        "mongo" => Some(mongo::execute(argv)),
        "panel-command" => Some(panel::execute(argv)),
        "symlink" => Some(symlink::execute(argv)),
        _ => None,
    }
}

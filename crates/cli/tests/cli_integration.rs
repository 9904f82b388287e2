use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("dev-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn dev() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dev"))
}

#[test]
fn no_args_lists_commands() {
    let out = dev().output().expect("failed to run dev");
    assert!(!out.status.success(), "dev with no args should fail");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Usage: dev <command>") && stderr.contains("Available commands:"),
        "unexpected output:\n{stderr}"
    );
    for name in ["build", "depends", "mongo", "panel-command", "symlink"] {
        assert!(stderr.contains(name), "missing command {name}:\n{stderr}");
    }
}

#[test]
fn help_flag_lists_commands() {
    let out = dev().arg("--help").output().expect("failed to run dev --help");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Available commands:"),
        "unexpected output:\n{stderr}"
    );
}

#[test]
fn unknown_command_is_reported() {
    let out = dev()
        .arg("frobnicate")
        .output()
        .expect("failed to run dev frobnicate");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Unknown command: frobnicate"),
        "unexpected output:\n{stderr}"
    );
}

#[test]
fn build_fails_without_entry_point() {
    let dir = make_temp_dir("build-empty");

    let out = dev()
        .arg("build")
        .current_dir(&dir)
        .output()
        .expect("failed to run dev build");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("no recognized build entry point"),
        "unexpected output:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn depends_requires_package_name() {
    let out = dev()
        .arg("depends")
        .output()
        .expect("failed to run dev depends");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("no package name provided"),
        "unexpected output:\n{stderr}"
    );
}

#[test]
fn mongo_rejects_unknown_verb() {
    let out = dev()
        .args(["mongo", "frobnicate"])
        .output()
        .expect("failed to run dev mongo");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Usage: dev mongo <command>") && stderr.contains("watch"),
        "unexpected output:\n{stderr}"
    );
}

#[test]
fn symlink_requires_module_root() {
    let out = dev()
        .arg("symlink")
        .env_remove("DEV_SYMLINK_MODULE_ROOT")
        .output()
        .expect("failed to run dev symlink");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("DEV_SYMLINK_MODULE_ROOT"),
        "unexpected output:\n{stderr}"
    );
}

#[test]
fn panel_command_echoes_parsed_options() {
    let out = dev()
        .args(["panel-command", "--global"])
        .output()
        .expect("failed to run dev panel-command");
    assert!(
        out.status.success(),
        "dev panel-command failed:\nstderr:\n{}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("global"),
        "unexpected output:\n{stdout}"
    );
}

#[test]
fn panel_command_reports_unknown_option_without_exiting() {
    let out = dev()
        .args(["panel-command", "--bogus"])
        .output()
        .expect("failed to run dev panel-command");
    assert!(out.status.success(), "errors should be returned, not fatal");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Unknown option \"--bogus\""),
        "unexpected output:\n{stderr}"
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("--bogus"), "unexpected output:\n{stdout}");
}

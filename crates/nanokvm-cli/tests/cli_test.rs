// End-to-end binary checks that need no device.

#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn nanokvm() -> Command {
    let mut cmd = Command::cargo_bin("nanokvm").unwrap();
    // Isolate from the developer's real config and environment.
    let temp = tempfile::tempdir().unwrap();
    cmd.env("HOME", temp.path());
    cmd.env("XDG_CONFIG_HOME", temp.path());
    for var in [
        "NANOKVM_PROFILE",
        "NANOKVM_HOST",
        "NANOKVM_USERNAME",
        "NANOKVM_PASSWORD",
    ] {
        cmd.env_remove(var);
    }
    // Leak the tempdir so it outlives the child process.
    std::mem::forget(temp);
    cmd
}

#[test]
fn help_lists_all_commands() {
    nanokvm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("push-button"))
        .stdout(predicate::str::contains("toggle"))
        .stdout(predicate::str::contains("wake-on-lan"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn completions_generate_for_bash() {
    nanokvm()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nanokvm"));
}

#[test]
fn status_without_config_explains_how_to_fix_it() {
    nanokvm()
        .arg("status")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No device configured"));
}

#[test]
fn wake_on_lan_rejects_a_malformed_mac() {
    nanokvm()
        .args(["wake-on-lan", "not-a-mac"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid value"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    nanokvm()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn config_path_prints_a_toml_location() {
    nanokvm()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

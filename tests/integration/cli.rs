//! The `binup` binary end to end, against a mock registry and a sandboxed home.

use assert_cmd::Command;
use binup::target::{HostInfo, Target};
use predicates::prelude::*;

use crate::common::{Layout, MARKER, Sandbox};

fn binup(sandbox: &Sandbox) -> Command {
    let mut cmd = Command::cargo_bin("binup").unwrap();
    cmd.env_clear()
        .env("PATH", "/usr/bin:/bin")
        .env("HOME", sandbox.home())
        .env("BINUP_CONFIG", sandbox.root().join("binup.toml"))
        .env("TMPDIR", sandbox.scratch_root())
        .env("SHELL", "/bin/zsh")
        .env("BINUP_API_URL", sandbox.server.url())
        .env("BINUP_NO_PROGRESS", "1")
        .write_stdin("");
    cmd
}

fn write_config(sandbox: &Sandbox) {
    std::fs::write(sandbox.root().join("binup.toml"), "product = \"app\"\nrepo_owner = \"acme\"\nrepo_name = \"app\"\n")
        .unwrap();
}

#[test]
fn test_help_lists_usage() {
    Command::cargo_bin("binup")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("uninstall"))
        .stdout(predicate::str::contains("--yes"));
}

#[test]
fn test_too_many_arguments() {
    Command::cargo_bin("binup").unwrap().args(["v1.0.0", "extra"]).assert().failure();
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_uninstall_with_nothing_installed() {
    let sandbox = Sandbox::new().await;
    write_config(&sandbox);

    binup(&sandbox)
        .arg("uninstall")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to do"));
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_install_then_uninstall() {
    let mut sandbox = Sandbox::new().await;
    write_config(&sandbox);
    let target = Target::resolve(&HostInfo::detect()).unwrap();
    sandbox.publish("v3.1.0", &target, b"#!/bin/sh\necho app\n", Layout::Wrapped, true).await;
    let zshrc = sandbox.write_home_file(".zshrc", "setopt autocd\n");
    let exe = sandbox.install_dir().join(target.executable_name("app"));

    binup(&sandbox)
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("v3.1.0"))
        .stdout(predicate::str::contains("source"));

    assert!(exe.exists());
    assert_eq!(std::fs::read_to_string(&zshrc).unwrap().matches(MARKER).count(), 1);
    assert_eq!(sandbox.scratch_entries(), 0);

    binup(&sandbox).args(["uninstall", "--yes"]).assert().success();

    assert!(!exe.exists());
    assert_eq!(std::fs::read_to_string(&zshrc).unwrap().matches(MARKER).count(), 0);
    assert!(sandbox.home().join(".zshrc.backup").exists());
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_non_interactive_install_prints_manual_step() {
    let mut sandbox = Sandbox::new().await;
    write_config(&sandbox);
    let target = Target::resolve(&HostInfo::detect()).unwrap();
    sandbox.publish("v3.1.0", &target, b"#!/bin/sh\n", Layout::Wrapped, true).await;
    let zshrc = sandbox.write_home_file(".zshrc", "setopt autocd\n");

    binup(&sandbox)
        .assert()
        .success()
        .stdout(predicate::str::contains("export PATH="));

    assert_eq!(std::fs::read_to_string(&zshrc).unwrap(), "setopt autocd\n");
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_tag_exits_with_error() {
    let mut sandbox = Sandbox::new().await;
    write_config(&sandbox);
    let _not_found = sandbox
        .server
        .mock("GET", "/repos/acme/app/releases/tags/v9.9.9")
        .with_status(404)
        .create_async()
        .await;

    binup(&sandbox)
        .arg("v9.9.9")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Release 'v9.9.9' not found in acme/app"));
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_quiet_yes_prints_nothing() {
    let mut sandbox = Sandbox::new().await;
    write_config(&sandbox);
    let target = Target::resolve(&HostInfo::detect()).unwrap();
    sandbox.publish("v3.1.0", &target, b"#!/bin/sh\n", Layout::Wrapped, true).await;
    let zshrc = sandbox.write_home_file(".zshrc", "setopt autocd\n");

    binup(&sandbox).args(["--yes", "--quiet"]).assert().success().stdout(predicate::str::is_empty());

    assert_eq!(std::fs::read_to_string(&zshrc).unwrap().matches(MARKER).count(), 1);
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_uninstall_with_broken_config_still_succeeds() {
    let sandbox = Sandbox::new().await;
    std::fs::write(sandbox.root().join("binup.toml"), "product = [unterminated\n").unwrap();
    let zshrc = sandbox.write_home_file(".zshrc", &format!("setopt autocd\n{MARKER}\nexport PATH=\"/x:$PATH\"\n"));

    binup(&sandbox)
        .args(["uninstall", "--yes"])
        .assert()
        .success()
        .stderr(predicate::str::contains("could not locate the installed app"));

    assert_eq!(std::fs::read_to_string(&zshrc).unwrap(), "setopt autocd\n");
}

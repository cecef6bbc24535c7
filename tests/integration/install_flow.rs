use binup::cli::InstallCommand;
use binup::core::InstallError;
use binup::profile::{ManualReason, PathSetup};
use binup::release::VersionSelector;
use binup::target::{Arch, HostInfo, Os, Target};
use binup::test_utils::{CountingPrompt, init_test_logging};

use crate::common::{Layout, MARKER, Sandbox};

fn install_error(err: &anyhow::Error) -> &InstallError {
    err.downcast_ref::<InstallError>().expect("install error")
}

#[tokio::test]
async fn test_install_latest_tar_gz_and_configure_zsh() {
    init_test_logging(None);
    let mut sandbox = Sandbox::new().await;
    let target = Target::new(Os::Linux, Arch::X64);
    sandbox.publish("v1.0.0", &target, b"#!/bin/sh\necho v1\n", Layout::Wrapped, true).await;
    let zshrc = sandbox.write_home_file(".zshrc", "setopt autocd\n");
    let prompt = CountingPrompt::new(true);

    let report = InstallCommand::new(VersionSelector::Latest)
        .with_scratch_root(sandbox.scratch_root())
        .with_progress(false)
        .execute(&sandbox.config(), target, &sandbox.env(Some("/bin/zsh")), &prompt)
        .await
        .unwrap();

    assert_eq!(report.asset.name, "app-linux-x64.tar.gz");
    assert_eq!(report.asset.release_tag, "v1.0.0");
    assert_eq!(report.layout.exe_path, sandbox.install_dir().join("app"));
    assert_eq!(std::fs::read(&report.layout.exe_path).unwrap(), b"#!/bin/sh\necho v1\n");
    assert_eq!(
        report.path_setup,
        PathSetup::Configured {
            profile: zshrc.clone()
        }
    );

    let content = std::fs::read_to_string(&zshrc).unwrap();
    assert!(content.starts_with("setopt autocd\n"));
    assert!(content.contains(&format!("{MARKER}\nexport PATH=\"{}:$PATH\"\n", sandbox.install_dir().display())));
    assert_eq!(sandbox.scratch_entries(), 0);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&report.layout.exe_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[tokio::test]
async fn test_install_tag_zip_for_windows() {
    let mut sandbox = Sandbox::new().await;
    let target = Target::new(Os::Windows, Arch::X64);
    sandbox.publish("v1.2.0", &target, b"MZ v1.2.0", Layout::Wrapped, false).await;

    let report = InstallCommand::new(VersionSelector::Tag("v1.2.0".to_string()))
        .with_scratch_root(sandbox.scratch_root())
        .with_progress(false)
        .execute(&sandbox.config(), target, &sandbox.env(None), &CountingPrompt::new(true))
        .await
        .unwrap();

    assert_eq!(report.asset.name, "app-win-x64.zip");
    assert_eq!(report.layout.exe_path, sandbox.install_dir().join("app.exe"));
    assert_eq!(std::fs::read(&report.layout.exe_path).unwrap(), b"MZ v1.2.0");
    assert_eq!(
        report.path_setup,
        PathSetup::ManualRequired {
            reason: ManualReason::NoProfile,
            line: format!(
                "[Environment]::SetEnvironmentVariable(\"Path\", \"{};\" + \
                 [Environment]::GetEnvironmentVariable(\"Path\", \"User\"), \"User\")",
                sandbox.install_dir().display()
            ),
        }
    );
    assert_eq!(sandbox.scratch_entries(), 0);
}

#[tokio::test]
async fn test_install_twice_writes_one_block() {
    let mut sandbox = Sandbox::new().await;
    let target = Target::new(Os::Linux, Arch::Arm64);
    sandbox.publish("v2.0.0", &target, b"v2", Layout::Wrapped, true).await;
    let bashrc = sandbox.write_home_file(".bashrc", "alias gs='git status'\n");
    let prompt = CountingPrompt::new(true);
    let env = sandbox.env(Some("/bin/bash"));
    let command = InstallCommand::new(VersionSelector::Latest)
        .with_scratch_root(sandbox.scratch_root())
        .with_progress(false);

    let first = command.execute(&sandbox.config(), target, &env, &prompt).await.unwrap();
    let second = command.execute(&sandbox.config(), target, &env, &prompt).await.unwrap();

    assert!(matches!(first.path_setup, PathSetup::Configured { .. }));
    assert_eq!(
        second.path_setup,
        PathSetup::AlreadyConfigured {
            profile: bashrc.clone()
        }
    );
    assert_eq!(prompt.asked(), 1);
    assert_eq!(std::fs::read_to_string(&bashrc).unwrap().matches(MARKER).count(), 1);
    assert_eq!(std::fs::read(&second.layout.exe_path).unwrap(), b"v2");
    assert_eq!(sandbox.scratch_entries(), 0);
}

#[tokio::test]
async fn test_install_dir_on_path_skips_profile() {
    let mut sandbox = Sandbox::new().await;
    let target = Target::new(Os::Linux, Arch::X64);
    sandbox.publish("v1.0.0", &target, b"v1", Layout::Wrapped, true).await;
    let zshrc = sandbox.write_home_file(".zshrc", "setopt autocd\n");
    let prompt = CountingPrompt::new(true);
    let mut env = sandbox.env(Some("/bin/zsh"));
    env.path_var = Some(std::env::join_paths([sandbox.install_dir(), "/usr/bin".into()]).unwrap());

    let report = InstallCommand::new(VersionSelector::Latest)
        .with_scratch_root(sandbox.scratch_root())
        .with_progress(false)
        .execute(&sandbox.config(), target, &env, &prompt)
        .await
        .unwrap();

    assert_eq!(report.path_setup, PathSetup::AlreadyOnPath);
    assert_eq!(prompt.asked(), 0);
    assert_eq!(std::fs::read_to_string(&zshrc).unwrap(), "setopt autocd\n");
}

#[tokio::test]
async fn test_declined_consent_still_installs() {
    let mut sandbox = Sandbox::new().await;
    let target = Target::new(Os::Linux, Arch::X64);
    sandbox.publish("v1.0.0", &target, b"v1", Layout::Wrapped, true).await;
    let zshrc = sandbox.write_home_file(".zshrc", "setopt autocd\n");

    let report = InstallCommand::new(VersionSelector::Latest)
        .with_scratch_root(sandbox.scratch_root())
        .with_progress(false)
        .execute(&sandbox.config(), target, &sandbox.env(Some("/bin/zsh")), &CountingPrompt::new(false))
        .await
        .unwrap();

    assert!(report.layout.exe_path.exists());
    match report.path_setup {
        PathSetup::ManualRequired {
            reason: ManualReason::Declined {
                profile,
            },
            line,
        } => {
            assert_eq!(profile, zshrc);
            assert_eq!(line, format!("export PATH=\"{}:$PATH\"", sandbox.install_dir().display()));
        }
        other => panic!("Expected declined manual setup, got {other:?}"),
    }
    assert_eq!(std::fs::read_to_string(&zshrc).unwrap(), "setopt autocd\n");
}

#[tokio::test]
async fn test_rosetta_host_installs_arm64_build() {
    let mut sandbox = Sandbox::new().await;
    let host = HostInfo {
        os: "macos".to_string(),
        arch: "x86_64".to_string(),
        translated: true,
    };
    let target = Target::resolve(&host).unwrap();
    assert_eq!(target, Target::new(Os::MacOs, Arch::Arm64));
    sandbox.publish("v1.0.0", &target, b"arm64 build", Layout::Wrapped, true).await;

    let report = InstallCommand::new(VersionSelector::Latest)
        .with_scratch_root(sandbox.scratch_root())
        .with_progress(false)
        .execute(&sandbox.config(), target, &sandbox.env(None), &CountingPrompt::new(false))
        .await
        .unwrap();

    assert_eq!(report.asset.name, "app-osx-arm64.zip");
    assert_eq!(std::fs::read(&report.layout.exe_path).unwrap(), b"arm64 build");
}

#[tokio::test]
async fn test_failed_extraction_cleans_scratch_and_leaves_profile() {
    let mut sandbox = Sandbox::new().await;
    let target = Target::new(Os::Linux, Arch::X64);
    sandbox.publish("v1.0.0", &target, b"v1", Layout::Flat, true).await;
    let zshrc = sandbox.write_home_file(".zshrc", "setopt autocd\n");
    let prompt = CountingPrompt::new(true);

    let err = InstallCommand::new(VersionSelector::Latest)
        .with_scratch_root(sandbox.scratch_root())
        .with_progress(false)
        .execute(&sandbox.config(), target, &sandbox.env(Some("/bin/zsh")), &prompt)
        .await
        .unwrap_err();

    assert!(matches!(install_error(&err), InstallError::ExtractFailed { .. }));
    assert_eq!(sandbox.scratch_entries(), 0);
    assert!(!sandbox.install_dir().join("app").exists());
    assert_eq!(prompt.asked(), 0);
    assert_eq!(std::fs::read_to_string(&zshrc).unwrap(), "setopt autocd\n");
}

#[tokio::test]
async fn test_missing_asset_for_target() {
    let mut sandbox = Sandbox::new().await;
    let url = format!("{}/download/app-linux-x64.tar.gz", sandbox.server.url());
    sandbox.publish_assets("v1.0.0", &[("app-linux-x64.tar.gz", &url)], true).await;

    let err = InstallCommand::new(VersionSelector::Latest)
        .with_scratch_root(sandbox.scratch_root())
        .with_progress(false)
        .execute(
            &sandbox.config(),
            Target::new(Os::Windows, Arch::X64),
            &sandbox.env(None),
            &CountingPrompt::new(true),
        )
        .await
        .unwrap_err();

    match install_error(&err) {
        InstallError::AssetNotFound {
            suffix,
            available,
            ..
        } => {
            assert_eq!(suffix, "win-x64.zip");
            assert_eq!(available, &vec!["app-linux-x64.tar.gz".to_string()]);
        }
        other => panic!("Expected AssetNotFound, got {other:?}"),
    }
    assert!(!sandbox.install_dir().exists());
}

#[tokio::test]
async fn test_unknown_tag() {
    let mut sandbox = Sandbox::new().await;
    let _not_found = sandbox
        .server
        .mock("GET", "/repos/acme/app/releases/tags/v0.0.0-missing")
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;

    let err = InstallCommand::new(VersionSelector::Tag("v0.0.0-missing".to_string()))
        .with_scratch_root(sandbox.scratch_root())
        .with_progress(false)
        .execute(
            &sandbox.config(),
            Target::new(Os::Linux, Arch::X64),
            &sandbox.env(None),
            &CountingPrompt::new(true),
        )
        .await
        .unwrap_err();

    assert!(matches!(install_error(&err), InstallError::ReleaseNotFound { .. }));
    assert_eq!(sandbox.scratch_entries(), 0);
}

#[tokio::test]
async fn test_stale_scratch_swept_on_install() {
    let mut sandbox = Sandbox::new().await;
    let target = Target::new(Os::Linux, Arch::X64);
    sandbox.publish("v1.0.0", &target, b"v1", Layout::Wrapped, true).await;
    let fresh = sandbox.scratch_root().join("binup-scratch-fresh");
    let unrelated = sandbox.scratch_root().join("other-tool");
    std::fs::create_dir_all(&fresh).unwrap();
    std::fs::create_dir_all(&unrelated).unwrap();

    InstallCommand::new(VersionSelector::Latest)
        .with_scratch_root(sandbox.scratch_root())
        .with_progress(false)
        .execute(&sandbox.config(), target, &sandbox.env(None), &CountingPrompt::new(false))
        .await
        .unwrap();

    // Younger than the stale threshold, so both survive; only the run's own
    // scratch directory is gone
    assert!(fresh.exists());
    assert!(unrelated.exists());
    assert_eq!(sandbox.scratch_entries(), 2);
}

use binup::cli::{InstallCommand, UninstallCommand};
use binup::profile::PathSetup;
use binup::release::VersionSelector;
use binup::target::{Arch, Os, Target};
use binup::test_utils::CountingPrompt;
use binup::uninstaller::{ExecutableRemoval, ProfileCleanup};

use crate::common::{Layout, MARKER, Sandbox, host_for};

async fn installed_sandbox(target: &Target, profile: &str) -> Sandbox {
    let mut sandbox = Sandbox::new().await;
    sandbox.publish("v1.0.0", target, b"v1", Layout::Wrapped, true).await;
    sandbox.write_home_file(profile, "alias l=ls\n");

    let shell = if profile.ends_with(".zshrc") { "/bin/zsh" } else { "/bin/bash" };
    let report = InstallCommand::new(VersionSelector::Latest)
        .with_scratch_root(sandbox.scratch_root())
        .with_progress(false)
        .execute(&sandbox.config(), *target, &sandbox.env(Some(shell)), &CountingPrompt::new(true))
        .await
        .unwrap();
    assert!(matches!(report.path_setup, PathSetup::Configured { .. }));
    sandbox
}

#[tokio::test]
async fn test_uninstall_after_install_with_consent() {
    let target = Target::new(Os::Linux, Arch::X64);
    let sandbox = installed_sandbox(&target, ".zshrc").await;
    let zshrc = sandbox.home().join(".zshrc");
    let exe = sandbox.install_dir().join("app");
    assert!(exe.exists());

    let env = sandbox.env(Some("/bin/zsh"));

    let report =
        UninstallCommand::new().execute(&Ok(sandbox.config()), &host_for(&target), &env, &CountingPrompt::new(true)).await;

    assert_eq!(
        report.executable,
        ExecutableRemoval::Removed {
            path: exe.clone()
        }
    );
    assert!(!exe.exists());
    assert_eq!(
        report.profile,
        ProfileCleanup::Cleaned {
            profile: zshrc.clone(),
            backup: sandbox.home().join(".zshrc.backup"),
            blocks: 1,
        }
    );

    let content = std::fs::read_to_string(&zshrc).unwrap();
    assert_eq!(content.matches(MARKER).count(), 0);
    assert!(content.starts_with("alias l=ls\n"));
    assert!(!content.contains("export PATH"));

    let backups: Vec<_> = std::fs::read_dir(sandbox.home())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".backup"))
        .collect();
    assert_eq!(backups.len(), 1);
    assert!(std::fs::read_to_string(backups[0].path()).unwrap().contains(MARKER));
}

#[tokio::test]
async fn test_uninstall_without_consent_keeps_profile() {
    let target = Target::new(Os::Linux, Arch::Arm64);
    let sandbox = installed_sandbox(&target, ".bashrc").await;
    let bashrc = sandbox.home().join(".bashrc");
    let before = std::fs::read_to_string(&bashrc).unwrap();

    let env = sandbox.env(Some("/bin/bash"));

    let report =
        UninstallCommand::new().execute(&Ok(sandbox.config()), &host_for(&target), &env, &CountingPrompt::new(false)).await;

    assert!(matches!(report.executable, ExecutableRemoval::Removed { .. }));
    assert_eq!(
        report.profile,
        ProfileCleanup::Declined {
            profile: bashrc.clone()
        }
    );
    assert_eq!(std::fs::read_to_string(&bashrc).unwrap(), before);
    assert!(!sandbox.home().join(".bashrc.backup").exists());
}

#[tokio::test]
async fn test_uninstall_twice_is_nothing_to_do() {
    let target = Target::new(Os::Linux, Arch::X64);
    let sandbox = installed_sandbox(&target, ".zshrc").await;
    let env = sandbox.env(Some("/bin/zsh"));
    let prompt = CountingPrompt::new(true);

    let config = Ok(sandbox.config());
    let host = host_for(&target);

    let first = UninstallCommand::new().execute(&config, &host, &env, &prompt).await;
    let second = UninstallCommand::new().execute(&config, &host, &env, &prompt).await;

    assert!(!first.nothing_to_do());
    assert!(second.nothing_to_do());
    assert_eq!(prompt.asked(), 1);
}

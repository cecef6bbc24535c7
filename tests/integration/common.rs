//! Shared sandbox for integration tests: a temporary home directory and a
//! mock release registry serving archives built on the fly.

use binup::config::InstallerConfig;
use binup::profile::ShellEnvironment;
use binup::target::{Arch, ArchiveFormat, HostInfo, Os, Target};
use binup::test_utils::{release_json, write_tar_gz, write_zip};
use mockito::{Mock, Server, ServerGuard};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PRODUCT: &str = "app";
pub const MARKER: &str = "# Added by binup for app";

pub struct Sandbox {
    root: TempDir,
    pub server: ServerGuard,
    mocks: Vec<Mock>,
}

/// How the executable is laid out inside a published archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `<asset-stem>/<exe>`, as release packaging produces it
    Wrapped,
    /// `<exe>` at the archive root
    Flat,
}

impl Sandbox {
    pub async fn new() -> Self {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("home")).unwrap();
        std::fs::create_dir_all(root.path().join("tmp")).unwrap();
        Self {
            root,
            server: Server::new_async().await,
            mocks: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    pub fn install_dir(&self) -> PathBuf {
        self.home().join(".local").join("bin")
    }

    pub fn scratch_root(&self) -> PathBuf {
        self.root.path().join("tmp")
    }

    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.scratch_root()).unwrap().count()
    }

    pub fn config(&self) -> InstallerConfig {
        InstallerConfig {
            product: PRODUCT.to_string(),
            repo_owner: "acme".to_string(),
            repo_name: "app".to_string(),
            api_url: self.server.url(),
            install_dir: Some(self.install_dir().display().to_string()),
            ..InstallerConfig::default()
        }
    }

    /// Environment with `shell` and a `PATH` that does not contain the
    /// install directory.
    pub fn env(&self, shell: Option<&str>) -> ShellEnvironment {
        ShellEnvironment {
            path_var: Some(OsString::from("/usr/local/bin:/usr/bin:/bin")),
            shell: shell.map(str::to_string),
            home: Some(self.home()),
        }
    }

    pub fn write_home_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.home().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Asset name for `target`, e.g. `app-linux-x64.tar.gz`.
    pub fn asset_name(target: &Target) -> String {
        format!("{PRODUCT}-{}", target.asset_suffix())
    }

    /// Publish release `tag` with one asset for `target` whose executable
    /// holds `contents`. Served both by tag and, with `latest`, as the latest
    /// release.
    pub async fn publish(&mut self, tag: &str, target: &Target, contents: &[u8], layout: Layout, latest: bool) {
        let name = Self::asset_name(target);
        let exe = target.executable_name(PRODUCT);
        let stem = name.trim_end_matches(&format!(".{}", target.archive_format().extension())).to_string();
        let entry = match layout {
            Layout::Wrapped => format!("{stem}/{exe}"),
            Layout::Flat => exe,
        };

        let archive = self.root.path().join(format!("{tag}-{name}"));
        match target.archive_format() {
            ArchiveFormat::TarGz => write_tar_gz(&archive, &[(&entry, contents)]),
            ArchiveFormat::Zip => write_zip(&archive, &[(&entry, contents)]),
        }

        let download_path = format!("/download/{tag}/{name}");
        let url = format!("{}{}", self.server.url(), download_path);
        self.publish_assets(tag, &[(&name, &url)], latest).await;

        let download = self
            .server
            .mock("GET", download_path.as_str())
            .with_status(200)
            .with_body(std::fs::read(&archive).unwrap())
            .create_async()
            .await;
        self.mocks.push(download);
    }

    /// Publish release metadata only.
    pub async fn publish_assets(&mut self, tag: &str, assets: &[(&str, &str)], latest: bool) {
        let body = release_json(tag, assets);
        let by_tag = self
            .server
            .mock("GET", format!("/repos/acme/app/releases/tags/{tag}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(&body)
            .create_async()
            .await;
        self.mocks.push(by_tag);

        if latest {
            let latest = self
                .server
                .mock("GET", "/repos/acme/app/releases/latest")
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(&body)
                .create_async()
                .await;
            self.mocks.push(latest);
        }
    }
}

/// Native host that resolves to `target`.
pub fn host_for(target: &Target) -> HostInfo {
    let os = match target.os() {
        Os::Linux => "linux",
        Os::MacOs => "macos",
        Os::Windows => "windows",
    };
    let arch = match target.arch() {
        Arch::X64 => "x86_64",
        Arch::Arm64 => "aarch64",
    };
    HostInfo {
        os: os.to_string(),
        arch: arch.to_string(),
        translated: false,
    }
}

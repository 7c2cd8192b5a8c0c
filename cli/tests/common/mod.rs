// Shared helpers for integration tests.
//
// Provides a temporary repository (`conf/links.toml`, `configs/`, `bin/`) and
// a temporary home directory so each integration test runs the commands
// against an isolated environment.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use devenv_cli::config::Settings;
use devenv_cli::logging::Log;
use devenv_cli::platform::Platform;

/// Default backup directory name under the home directory.
pub const BACKUP_DIR: &str = ".dotfiles_backup";

/// An isolated repository and home backed by a [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Keeps the temporary directory alive.
    tmp: tempfile::TempDir,
    /// Repository root containing `conf/`, `configs/` and `bin/`.
    pub root: PathBuf,
    /// Home directory that `~` expands to.
    pub home: PathBuf,
}

impl IntegrationTestContext {
    /// Create a context with empty `conf/`, `configs/` and home directories.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let base = dunce::canonicalize(tmp.path()).expect("canonicalize temp dir");
        let root = base.join("repo");
        let home = base.join("home");
        std::fs::create_dir_all(root.join("conf")).expect("create conf dir");
        std::fs::create_dir_all(root.join("configs")).expect("create configs dir");
        std::fs::create_dir_all(&home).expect("create home dir");
        Self { tmp, root, home }
    }

    /// Write `conf/links.toml`.
    pub fn with_mappings(self, toml: &str) -> Self {
        std::fs::write(self.root.join("conf/links.toml"), toml).expect("write links.toml");
        self
    }

    /// Write a file under `configs/`, creating parent directories.
    pub fn with_config(self, rel: &str, content: &str) -> Self {
        write_all(&self.root.join("configs").join(rel), content);
        self
    }

    /// Write a file under the home directory, creating parent directories.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write_all(&self.home.join(rel), content);
        self
    }

    /// Write a script under `bin/` with the given permission bits.
    #[cfg(unix)]
    pub fn with_bin(self, name: &str, mode: u32) -> Self {
        use std::os::unix::fs::PermissionsExt as _;
        let path = self.root.join("bin").join(name);
        write_all(&path, "#!/bin/sh\n");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode))
            .expect("chmod bin script");
        self
    }

    /// Path to a file under `configs/`.
    pub fn config(&self, rel: &str) -> PathBuf {
        self.root.join("configs").join(rel)
    }

    /// Path under the home directory.
    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home.join(rel)
    }

    /// Default backup directory.
    pub fn backup_dir(&self) -> PathBuf {
        self.home.join(BACKUP_DIR)
    }

    /// Names of every backup in the default backup directory, sorted.
    pub fn backups(&self) -> Vec<String> {
        let Ok(listing) = std::fs::read_dir(self.backup_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = listing
            .map(|e| e.expect("read backup entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Settings for this repository and home on `platform`.
    pub fn settings(&self, platform: Platform) -> Settings {
        Settings::new(&self.root, &self.home, platform)
    }
}

fn write_all(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().expect("path has a parent")).expect("create parent");
    std::fs::write(path, content).expect("write file");
}

/// [`Log`] that records messages in memory.
#[derive(Debug, Default)]
pub struct TestLog {
    messages: Mutex<Vec<(&'static str, String)>>,
}

impl TestLog {
    fn push(&self, channel: &'static str, msg: &str) {
        self.messages
            .lock()
            .expect("log lock")
            .push((channel, msg.to_string()));
    }

    /// Messages recorded on `channel`.
    pub fn on(&self, channel: &str) -> Vec<String> {
        self.messages
            .lock()
            .expect("log lock")
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Log for TestLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
}

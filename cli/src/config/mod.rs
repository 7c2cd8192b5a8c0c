//! Configuration: the mapping file and the settings resolved around it.
pub mod mappings;
pub mod placeholders;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::error::ConfigError;
use crate::platform::Platform;

/// Mapping file location relative to the repository root.
pub const MAPPING_FILE: &str = "conf/links.toml";

/// Backup directory name under `$HOME` when nothing else is configured.
pub const DEFAULT_BACKUP_DIR: &str = ".dotfiles_backup";

/// Every ambient input to a run, resolved once and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Repository root containing `conf/`, `configs/` and `bin/`.
    pub root: PathBuf,
    /// Home directory that `~` and `$HOME` expand to.
    pub home: PathBuf,
    /// Platform entries are filtered against.
    pub platform: Platform,
    /// Backup directory given on the command line, overriding the mapping file.
    pub backup_dir_override: Option<PathBuf>,
    /// Preview changes without writing anything.
    pub dry_run: bool,
}

impl Settings {
    /// Create settings from explicit values.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, home: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            root: root.into(),
            home: home.into(),
            platform,
            backup_dir_override: None,
            dry_run: false,
        }
    }

    /// Resolve settings from the command line, environment and host.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository root or home directory cannot be
    /// determined, or the platform is unsupported.
    pub fn resolve(global: &GlobalOpts) -> anyhow::Result<Self> {
        let root = resolve_root(global.root.as_deref())?;
        Self::resolve_with_root(global, |_| root)
    }

    /// Resolve settings for commands that never read the repository.
    ///
    /// When no repository root can be found the home directory stands in for
    /// it, so these commands also work outside a checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or the
    /// platform is unsupported.
    pub fn resolve_outside_repo(global: &GlobalOpts) -> anyhow::Result<Self> {
        Self::resolve_with_root(global, |home| {
            resolve_root(global.root.as_deref()).unwrap_or_else(|_| home.to_path_buf())
        })
    }

    fn resolve_with_root(
        global: &GlobalOpts,
        root: impl FnOnce(&Path) -> PathBuf,
    ) -> anyhow::Result<Self> {
        let home = match &global.home {
            Some(home) => home.clone(),
            None => dirs::home_dir().ok_or(ConfigError::NoHome)?,
        };
        let platform = match global.platform {
            Some(platform) => platform,
            None => Platform::detect()?,
        };
        Ok(Self {
            root: root(&home),
            home,
            platform,
            backup_dir_override: global.backup_dir.clone(),
            dry_run: global.dry_run,
        })
    }

    /// Root of the tree every mapping `src` is relative to.
    #[must_use]
    pub fn configs_dir(&self) -> PathBuf {
        self.root.join("configs")
    }

    /// Directory of executables linked by `link-bin`.
    #[must_use]
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// Path to the mapping file.
    #[must_use]
    pub fn mapping_file(&self) -> PathBuf {
        self.root.join(MAPPING_FILE)
    }

    /// `~/.local/bin`, where `link-bin` places executables.
    #[must_use]
    pub fn local_bin(&self) -> PathBuf {
        self.home.join(".local").join("bin")
    }

    /// Pick the backup directory: command line, then mapping file, then the
    /// default under `$HOME`.
    #[must_use]
    pub fn backup_dir(&self, from_file: Option<&Path>) -> PathBuf {
        self.backup_dir_override
            .clone()
            .or_else(|| from_file.map(Path::to_path_buf))
            .unwrap_or_else(|| self.home.join(DEFAULT_BACKUP_DIR))
    }
}

/// Locate the repository root.
///
/// Tries, in order: the explicit path, `$DEVENV_ROOT`, ancestors of the
/// running binary that contain the mapping file, and the current directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoRoot`] when none of these apply.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }

    if let Ok(root) = std::env::var("DEVENV_ROOT") {
        return Ok(PathBuf::from(root));
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        // cli/target/{debug,release}/ → repo root, or bin/ → repo root
        let candidates = [parent.join("../../.."), parent.join("..")];
        for candidate in &candidates {
            if candidate.join(MAPPING_FILE).is_file() {
                return Ok(dunce::canonicalize(candidate).unwrap_or_else(|_| candidate.clone()));
            }
        }
    }

    if let Ok(cwd) = std::env::current_dir()
        && cwd.join(MAPPING_FILE).is_file()
    {
        return Ok(cwd);
    }

    Err(ConfigError::NoRoot)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_root_wins() {
        let root = resolve_root(Some(Path::new("/explicit/path"))).unwrap();
        assert_eq!(root, PathBuf::from("/explicit/path"));
    }

    #[test]
    fn outside_repo_resolution_needs_only_home_and_platform() {
        let home = tempfile::tempdir().unwrap();
        let global = GlobalOpts {
            home: Some(home.path().to_path_buf()),
            platform: Some(Platform::Linux),
            dry_run: true,
            ..GlobalOpts::default()
        };
        let settings = Settings::resolve_outside_repo(&global).unwrap();
        assert_eq!(settings.home, home.path());
        assert_eq!(settings.platform, Platform::Linux);
        assert!(settings.dry_run);
        assert_eq!(settings.local_bin(), home.path().join(".local/bin"));
    }

    #[test]
    fn outside_repo_resolution_keeps_explicit_root() {
        let global = GlobalOpts {
            root: Some(PathBuf::from("/repo")),
            home: Some(PathBuf::from("/home/u")),
            platform: Some(Platform::Darwin),
            ..GlobalOpts::default()
        };
        let settings = Settings::resolve_outside_repo(&global).unwrap();
        assert_eq!(settings.root, PathBuf::from("/repo"));
    }

    #[test]
    fn derived_paths_hang_off_root_and_home() {
        let settings = Settings::new("/repo", "/home/u", Platform::Linux);
        assert_eq!(settings.configs_dir(), PathBuf::from("/repo/configs"));
        assert_eq!(settings.bin_dir(), PathBuf::from("/repo/bin"));
        assert_eq!(
            settings.mapping_file(),
            PathBuf::from("/repo/conf/links.toml")
        );
        assert_eq!(settings.local_bin(), PathBuf::from("/home/u/.local/bin"));
    }

    #[test]
    fn backup_dir_defaults_under_home() {
        let settings = Settings::new("/repo", "/home/u", Platform::Linux);
        assert_eq!(
            settings.backup_dir(None),
            PathBuf::from("/home/u/.dotfiles_backup")
        );
    }

    #[test]
    fn backup_dir_prefers_file_over_default() {
        let settings = Settings::new("/repo", "/home/u", Platform::Linux);
        assert_eq!(
            settings.backup_dir(Some(Path::new("/home/u/.bak"))),
            PathBuf::from("/home/u/.bak")
        );
    }

    #[test]
    fn backup_dir_override_beats_file() {
        let mut settings = Settings::new("/repo", "/home/u", Platform::Linux);
        settings.backup_dir_override = Some(PathBuf::from("/tmp/bak"));
        assert_eq!(
            settings.backup_dir(Some(Path::new("/home/u/.bak"))),
            PathBuf::from("/tmp/bak")
        );
    }
}

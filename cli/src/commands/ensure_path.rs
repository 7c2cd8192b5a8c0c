//! Command: put `~/.local/bin` on `PATH` in the shell profile.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::EnsurePathOpts;
use crate::config::Settings;
use crate::config::mappings::MappingEntry;
use crate::linker::LinkReport;
use crate::logging::Log;
use crate::platform::Platform;

/// The shell from `--shell`, else `$SHELL`.
#[must_use]
pub fn resolve_shell(opts: &EnsurePathOpts) -> Option<String> {
    opts.shell
        .clone()
        .or_else(|| std::env::var("SHELL").ok())
}

/// Profile file that `shell` reads at startup.
#[must_use]
pub fn profile_for(shell: Option<&str>, home: &Path) -> PathBuf {
    if shell.is_some_and(|s| s.trim_end().ends_with("zsh")) {
        home.join(".zshrc")
    } else {
        home.join(".bashrc")
    }
}

/// The append entry that exports `local_bin` on `PATH` in `profile`.
#[must_use]
pub fn entry(local_bin: &Path, profile: &Path) -> MappingEntry {
    MappingEntry::append(
        None,
        profile,
        format!("export PATH=\"{}:$PATH\"", local_bin.display()),
        Platform::ALL,
    )
}

/// Create `~/.local/bin` and append the `PATH` export to the shell profile.
///
/// # Errors
///
/// Returns an error if `~/.local/bin` cannot be created or the backup
/// directory is unusable.
pub fn run(settings: &Settings, shell: Option<&str>, log: &dyn Log) -> Result<LinkReport> {
    log.stage("Ensuring ~/.local/bin is on PATH");
    let local_bin = settings.local_bin();
    if settings.dry_run {
        if !local_bin.is_dir() {
            log.dry_run(&format!("would create {}", local_bin.display()));
        }
    } else {
        std::fs::create_dir_all(&local_bin)
            .with_context(|| format!("creating {}", local_bin.display()))?;
    }

    let profile = profile_for(shell, &settings.home);
    log.debug(&format!(
        "shell {} uses {}",
        shell.unwrap_or("(unknown)"),
        profile.display()
    ));
    super::link_entries(
        settings,
        &[entry(&local_bin, &profile)],
        settings.configs_dir(),
        None,
        log,
    )
}

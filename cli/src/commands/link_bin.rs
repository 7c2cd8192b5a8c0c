//! Command: link `bin/` executables into `~/.local/bin`.
use std::io;
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::config::Settings;
use crate::config::mappings::MappingEntry;
use crate::linker::LinkReport;
use crate::logging::Log;
use crate::platform::Platform;

/// Link every executable in the repository's `bin/` directory.
///
/// # Errors
///
/// Returns an error if `bin/` exists but cannot be read, or the backup
/// directory is unusable.
pub fn run(settings: &Settings, log: &dyn Log) -> Result<LinkReport> {
    log.stage("Linking bin scripts");
    let bin_dir = settings.bin_dir();
    let entries = entries(&bin_dir, &settings.local_bin())
        .with_context(|| format!("reading {}", bin_dir.display()))?;
    if entries.is_empty() {
        log.info(&format!("no executables in {}", bin_dir.display()));
    }
    super::link_entries(settings, &entries, bin_dir, None, log)
}

/// One link entry per executable file in `bin_dir`, sorted by name.
///
/// A missing `bin_dir` yields no entries.
///
/// # Errors
///
/// Returns the I/O error if the directory listing fails.
pub fn entries(bin_dir: &Path, local_bin: &Path) -> io::Result<Vec<MappingEntry>> {
    let listing = match std::fs::read_dir(bin_dir) {
        Ok(listing) => listing,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut names = Vec::new();
    for entry in listing {
        let entry = entry?;
        let meta = entry.metadata()?;
        if meta.is_file() && is_executable(&meta) {
            names.push(entry.file_name());
        }
    }
    names.sort();

    Ok(names
        .into_iter()
        .map(|name| MappingEntry::link(&name, local_bin.join(&name), Platform::ALL))
        .collect())
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt as _;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
const fn is_executable(_meta: &std::fs::Metadata) -> bool {
    true
}

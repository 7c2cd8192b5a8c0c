//! Backups of destinations displaced by a new link.
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::fs::move_path;
use crate::error::LinkError;

/// `strftime` format of the backup suffix: `YYYYMMDD-HHMMSS` in UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Current UTC time formatted as a backup suffix.
#[must_use]
pub fn timestamp_now() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Backup directory for one run.
///
/// Names are `<basename>.<timestamp>`; when that is already taken on disk or
/// earlier in the same run, `.1`, `.2`, … are appended. Backups are never
/// deleted.
#[derive(Debug)]
pub struct BackupDir<'a> {
    dir: &'a Path,
    timestamp: &'a str,
    reserved: HashSet<PathBuf>,
}

impl<'a> BackupDir<'a> {
    /// Create a backup directory handle; nothing is touched until the first backup.
    #[must_use]
    pub fn new(dir: &'a Path, timestamp: &'a str) -> Self {
        Self {
            dir,
            timestamp,
            reserved: HashSet::new(),
        }
    }

    /// Choose and reserve the backup path for `destination`.
    pub fn plan(&mut self, destination: &Path) -> PathBuf {
        let mut name = destination
            .file_name()
            .map_or_else(|| OsString::from("backup"), ToOwned::to_owned);
        name.push(format!(".{}", self.timestamp));
        let mut candidate = self.dir.join(&name);

        let mut n = 1u32;
        while self.reserved.contains(&candidate) || candidate.symlink_metadata().is_ok() {
            let mut numbered = name.clone();
            numbered.push(format!(".{n}"));
            candidate = self.dir.join(numbered);
            n += 1;
        }

        self.reserved.insert(candidate.clone());
        candidate
    }

    /// Move `destination` into the backup directory and return where it went.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::BackupFailed`] if the backup directory cannot be
    /// created or the move fails. On failure `destination` is left in place.
    pub fn move_aside(&mut self, destination: &Path) -> Result<PathBuf, LinkError> {
        let failed = |source| LinkError::BackupFailed {
            path: destination.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(self.dir).map_err(failed)?;
        let backup = self.plan(destination);
        move_path(destination, &backup).map_err(failed)?;
        Ok(backup)
    }
}

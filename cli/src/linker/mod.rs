//! The config linker: apply mapping entries to the filesystem.
//!
//! Each entry is processed independently, in declaration order:
//!
//! - entries for other platforms are skipped without touching the filesystem;
//! - link entries end up as a symlink to the canonical source, with any
//!   pre-existing destination moved into the backup directory first;
//! - append entries add their line to the destination at most once.
//!
//! A failing entry is recorded in the [`LinkReport`] and the batch continues.
pub mod backup;
pub mod fs;
pub mod report;

use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use crate::config::mappings::MappingEntry;
use crate::error::LinkError;
use crate::logging::Log;
use crate::platform::Platform;

pub use report::{EntryReport, LinkOutcome, LinkReport, OutcomeKind};

use backup::BackupDir;

/// Token in append lines replaced by the absolute source path.
pub const SOURCE_TOKEN: &str = "{src}";

/// Explicit inputs to [`link_all`].
#[derive(Debug, Clone)]
pub struct LinkOptions {
    /// Root that every entry's source is relative to.
    pub configs_dir: PathBuf,
    /// Where displaced destinations are moved.
    pub backup_dir: PathBuf,
    /// Backup suffix shared by every backup made in this run.
    pub timestamp: String,
    /// Report what would happen without writing anything.
    pub dry_run: bool,
}

impl LinkOptions {
    /// Options stamped with the current UTC time.
    #[must_use]
    pub fn new(configs_dir: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            configs_dir: configs_dir.into(),
            backup_dir: backup_dir.into(),
            timestamp: backup::timestamp_now(),
            dry_run: false,
        }
    }

    /// Replace the backup timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Enable or disable dry-run mode.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Apply every entry in `mappings` that applies to `platform`.
///
/// Entry failures never abort the batch; they are recorded in the returned
/// report.
///
/// # Errors
///
/// Returns [`LinkError::BackupDirNotDirectory`] without touching anything if
/// the backup directory path exists and is not a directory.
pub fn link_all(
    mappings: &[MappingEntry],
    platform: Platform,
    options: &LinkOptions,
    log: &dyn Log,
) -> Result<LinkReport, LinkError> {
    if options.backup_dir.exists() && !options.backup_dir.is_dir() {
        return Err(LinkError::BackupDirNotDirectory {
            path: options.backup_dir.clone(),
        });
    }

    let mut linker = Linker {
        options,
        log,
        backups: BackupDir::new(&options.backup_dir, &options.timestamp),
    };

    let entries = mappings
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let description = entry.description();
            let outcome = if entry.applies_to(platform) {
                linker.apply(entry).unwrap_or_else(LinkOutcome::Failed)
            } else {
                LinkOutcome::SkippedPlatform
            };
            match outcome.error() {
                Some(e) => log.warn(&format!("{description}: {e}")),
                None => log.debug(&format!("{}: {description}", outcome.kind())),
            }
            EntryReport {
                index,
                description,
                outcome,
            }
        })
        .collect();

    Ok(LinkReport {
        dry_run: options.dry_run,
        entries,
    })
}

struct Linker<'a> {
    options: &'a LinkOptions,
    log: &'a dyn Log,
    backups: BackupDir<'a>,
}

impl Linker<'_> {
    fn apply(&mut self, entry: &MappingEntry) -> Result<LinkOutcome, LinkError> {
        match entry {
            MappingEntry::Link {
                source,
                destination,
                ..
            } => self.link(source, destination),
            MappingEntry::Append {
                source,
                destination,
                line,
                ..
            } => self.append(source.as_deref(), destination, line),
        }
    }

    fn source(&self, relative: &Path) -> Result<PathBuf, LinkError> {
        fs::canonical_source(&self.options.configs_dir, relative).map_err(|_| {
            LinkError::SourceMissing {
                path: self.options.configs_dir.join(relative),
            }
        })
    }

    fn link(&mut self, source: &Path, destination: &Path) -> Result<LinkOutcome, LinkError> {
        let source = self.source(source)?;

        let existing = match std::fs::symlink_metadata(destination) {
            Ok(meta) => Some(meta),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(LinkError::DestinationUnwritable {
                    path: destination.to_path_buf(),
                    source: e,
                });
            }
        };

        let Some(meta) = existing else {
            if self.options.dry_run {
                self.log.dry_run(&format!(
                    "would link {} -> {}",
                    destination.display(),
                    source.display()
                ));
            } else {
                create_link(&source, destination)?;
            }
            return Ok(LinkOutcome::Linked);
        };

        if meta.file_type().is_symlink() && fs::points_to(destination, &source) {
            return Ok(LinkOutcome::AlreadyCorrect);
        }

        let backup = if self.options.dry_run {
            let backup = self.backups.plan(destination);
            self.log.dry_run(&format!(
                "would back up {} to {} and link -> {}",
                destination.display(),
                backup.display(),
                source.display()
            ));
            backup
        } else {
            let backup = self.backups.move_aside(destination)?;
            self.log.debug(&format!(
                "backed up {} to {}",
                destination.display(),
                backup.display()
            ));
            if let Err(e) = create_link(&source, destination) {
                return Err(restore_backup(e, destination, &backup, self.log));
            }
            backup
        };
        Ok(LinkOutcome::BackedUpAndLinked { backup })
    }

    fn append(
        &self,
        source: Option<&Path>,
        destination: &Path,
        line: &str,
    ) -> Result<LinkOutcome, LinkError> {
        let line = match source {
            Some(relative) => {
                let source = self.source(relative)?;
                line.replace(SOURCE_TOKEN, &source.to_string_lossy())
            }
            None => line.to_string(),
        };

        let failed = |e| LinkError::AppendFailed {
            path: destination.to_path_buf(),
            source: e,
        };

        let existing = match std::fs::read_to_string(destination) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(failed(e)),
        };

        if contains_line(&existing, &line) {
            return Ok(LinkOutcome::SkippedAlreadyPresent);
        }

        if self.options.dry_run {
            self.log
                .dry_run(&format!("would append to {}: {line}", destination.display()));
            return Ok(LinkOutcome::Appended);
        }

        fs::ensure_parent_dir(destination).map_err(failed)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(destination)
            .map_err(failed)?;
        let separator = if existing.is_empty() || existing.ends_with('\n') {
            ""
        } else {
            "\n"
        };
        writeln!(file, "{separator}{line}").map_err(failed)?;
        Ok(LinkOutcome::Appended)
    }
}

/// Whether `content` has a line equal to `line`, ignoring surrounding
/// whitespace on both.
#[must_use]
pub fn contains_line(content: &str, line: &str) -> bool {
    let wanted = line.trim();
    content.lines().any(|existing| existing.trim() == wanted)
}

/// Move `backup` back to `destination` after a failed link.
///
/// Returns `err` when the original is back in place, or
/// [`LinkError::LinkFailedAfterBackup`] naming where it was left.
fn restore_backup(err: LinkError, destination: &Path, backup: &Path, log: &dyn Log) -> LinkError {
    match fs::move_path(backup, destination) {
        Ok(()) => {
            log.debug(&format!(
                "restored {} from {}",
                destination.display(),
                backup.display()
            ));
            err
        }
        Err(_) => LinkError::LinkFailedAfterBackup {
            path: destination.to_path_buf(),
            backup: backup.to_path_buf(),
            reason: err.to_string(),
        },
    }
}

fn create_link(source: &Path, destination: &Path) -> Result<(), LinkError> {
    fs::ensure_parent_dir(destination).map_err(|e| LinkError::DestinationUnwritable {
        path: destination.parent().unwrap_or(destination).to_path_buf(),
        source: e,
    })?;
    fs::create_symlink(source, destination).map_err(|e| LinkError::DestinationUnwritable {
        path: destination.to_path_buf(),
        source: e,
    })
}

//! Domain-specific error types for the config linker.
//!
//! Internal modules return typed errors built with [`thiserror`]; command
//! handlers at the CLI boundary convert them to [`anyhow::Error`] via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! LinkError:     one mapping entry could not be applied (never aborts the batch)
//! ConfigError:   the mapping file or settings could not be resolved
//! PlatformError: the current platform is unknown or unsupported
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while applying a single mapping entry.
///
/// Every variant except [`LinkError::BackupDirNotDirectory`] is entry-scoped:
/// the linker records it in the report and moves on to the next entry.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The declared source path is absent under the configs root.
    #[error("source does not exist: {}", path.display())]
    SourceMissing {
        /// Absolute path that was expected to exist.
        path: PathBuf,
    },

    /// Creating the destination's parent directories or the link failed.
    #[error("cannot write destination {}: {source}", path.display())]
    DestinationUnwritable {
        /// Path that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The pre-existing destination could not be moved out of the way.
    #[error("cannot back up {}: {source}", path.display())]
    BackupFailed {
        /// Destination that was being backed up.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The destination was moved to the backup directory, the link could not
    /// be created, and moving the backup back failed too.
    #[error(
        "cannot link {} ({reason}); original left at {}",
        path.display(),
        backup.display()
    )]
    LinkFailedAfterBackup {
        /// Destination that was being replaced.
        path: PathBuf,
        /// Where the original destination now lives.
        backup: PathBuf,
        /// Why the link could not be created.
        reason: String,
    },

    /// Reading or appending to the append target failed.
    #[error("cannot append to {}: {source}", path.display())]
    AppendFailed {
        /// File that was being read or appended to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The backup directory path is occupied by something other than a directory.
    #[error("backup path is not a directory: {}", path.display())]
    BackupDirNotDirectory {
        /// Configured backup directory.
        path: PathBuf,
    },
}

impl LinkError {
    /// Short, stable name of the error kind, used in reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SourceMissing { .. } => "SourceMissing",
            Self::DestinationUnwritable { .. } => "DestinationUnwritable",
            Self::BackupFailed { .. } => "BackupFailed",
            Self::LinkFailedAfterBackup { .. } => "LinkFailedAfterBackup",
            Self::AppendFailed { .. } => "AppendFailed",
            Self::BackupDirNotDirectory { .. } => "BackupDirNotDirectory",
        }
    }
}

/// Errors that arise from loading the mapping file and resolving settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The mapping file could not be read.
    #[error("cannot read config file {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The mapping file is not valid TOML or is missing required fields.
    #[error("invalid config file {}: {message}", path.display())]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser message, including the location of the problem.
        message: String,
    },

    /// A destination references a variable other than `HOME`.
    #[error("cannot expand '{value}': {message}")]
    Placeholder {
        /// The raw destination string.
        value: String,
        /// What went wrong during expansion.
        message: String,
    },

    /// A destination is still relative after placeholder expansion.
    #[error("destination must be absolute or start with ~ or $HOME: '{0}'")]
    RelativeDestination(String),

    /// The home directory could not be determined.
    #[error("cannot determine the home directory; pass --home")]
    NoHome,

    /// The repository root could not be located.
    #[error("cannot determine repository root; use --root or set DEVENV_ROOT")]
    NoRoot,
}

/// Errors that arise from platform identification.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The operating system the binary runs on is not supported.
    #[error("platform '{platform}' is not supported")]
    Unsupported {
        /// Name reported by the standard library (e.g. `"windows"`).
        platform: String,
    },

    /// A platform identifier in config or on the command line is unknown.
    #[error("unknown platform '{0}': expected darwin or linux")]
    Unknown(String),
}

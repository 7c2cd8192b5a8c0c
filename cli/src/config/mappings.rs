//! Mapping file loading.
//!
//! `conf/links.toml` is a list of `[[link]]` records. Each record names a
//! source under `configs/`, a destination (usually under `~`), the platforms
//! it applies to, and optionally a line to append instead of symlinking.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::placeholders::expand_home;
use crate::error::ConfigError;
use crate::platform::Platform;

/// One declared source → destination rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingEntry {
    /// Replace the destination with a symlink to the source.
    Link {
        /// Path relative to the configs root.
        source: PathBuf,
        /// Absolute destination path.
        destination: PathBuf,
        /// Platforms this entry applies to.
        platforms: BTreeSet<Platform>,
    },
    /// Append a line to the destination file, at most once.
    Append {
        /// Path relative to the configs root; substituted for `{src}` in `line`.
        source: Option<PathBuf>,
        /// Absolute path of the file to append to.
        destination: PathBuf,
        /// Line to append, without a trailing newline.
        line: String,
        /// Platforms this entry applies to.
        platforms: BTreeSet<Platform>,
    },
}

impl MappingEntry {
    /// Create a link entry.
    #[must_use]
    pub fn link(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        platforms: impl IntoIterator<Item = Platform>,
    ) -> Self {
        Self::Link {
            source: source.into(),
            destination: destination.into(),
            platforms: platforms.into_iter().collect(),
        }
    }

    /// Create an append entry.
    #[must_use]
    pub fn append(
        source: Option<PathBuf>,
        destination: impl Into<PathBuf>,
        line: impl Into<String>,
        platforms: impl IntoIterator<Item = Platform>,
    ) -> Self {
        Self::Append {
            source,
            destination: destination.into(),
            line: line.into(),
            platforms: platforms.into_iter().collect(),
        }
    }

    /// Platforms this entry applies to.
    #[must_use]
    pub const fn platforms(&self) -> &BTreeSet<Platform> {
        match self {
            Self::Link { platforms, .. } | Self::Append { platforms, .. } => platforms,
        }
    }

    /// Absolute destination path.
    #[must_use]
    pub fn destination(&self) -> &Path {
        match self {
            Self::Link { destination, .. } | Self::Append { destination, .. } => destination,
        }
    }

    /// Source path relative to the configs root, if the entry has one.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        match self {
            Self::Link { source, .. } => Some(source),
            Self::Append { source, .. } => source.as_deref(),
        }
    }

    /// Whether this entry should be processed on `platform`.
    #[must_use]
    pub fn applies_to(&self, platform: Platform) -> bool {
        self.platforms().contains(&platform)
    }

    /// Human-readable description used in logs and reports.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Link {
                source,
                destination,
                ..
            } => format!("{} -> {}", destination.display(), source.display()),
            Self::Append {
                destination, line, ..
            } => format!("{} << {line}", destination.display()),
        }
    }
}

/// A parsed mapping file.
#[derive(Debug, Clone, Default)]
pub struct MappingFile {
    /// Backup directory override, already expanded.
    pub backup_dir: Option<PathBuf>,
    /// Entries in declaration order.
    pub entries: Vec<MappingEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMappingFile {
    backup_dir: Option<String>,
    #[serde(default)]
    link: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    src: String,
    dst: String,
    platform: Vec<Platform>,
    append: Option<String>,
}

impl RawEntry {
    fn resolve(self, home: &Path) -> Result<MappingEntry, ConfigError> {
        let destination = expand_home(&self.dst, home)?;
        let source = PathBuf::from(self.src);
        Ok(match self.append {
            Some(line) => MappingEntry::append(Some(source), destination, line, self.platform),
            None => MappingEntry::link(source, destination, self.platform),
        })
    }
}

/// Load the mapping file at `path`, expanding placeholders against `home`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read, and any error
/// from [`parse`].
pub fn load(path: &Path, home: &Path) -> Result<MappingFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content, path, home)
}

/// Parse mapping file `content`; `path` is only used in error messages.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for invalid TOML, missing required fields,
/// unknown keys or unknown platforms, and placeholder errors for destinations.
pub fn parse(content: &str, path: &Path, home: &Path) -> Result<MappingFile, ConfigError> {
    let raw: RawMappingFile = toml::from_str(content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    let backup_dir = raw
        .backup_dir
        .as_deref()
        .map(|dir| expand_home(dir, home))
        .transpose()?;

    let entries = raw
        .link
        .into_iter()
        .map(|entry| entry.resolve(home))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MappingFile {
        backup_dir,
        entries,
    })
}

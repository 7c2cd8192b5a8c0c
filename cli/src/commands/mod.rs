//! Top-level subcommand orchestration.
pub mod completions;
pub mod ensure_path;
pub mod link;
pub mod link_bin;
pub mod setup;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::OutputFormat;
use crate::config::Settings;
use crate::config::mappings::MappingEntry;
use crate::linker::{self, LinkOptions, LinkReport};
use crate::logging::Log;

/// Run `entries` through the linker with sources resolved under `sources`.
///
/// # Errors
///
/// Returns an error if the backup directory path exists and is not a
/// directory.
pub fn link_entries(
    settings: &Settings,
    entries: &[MappingEntry],
    sources: PathBuf,
    backup_dir: Option<&Path>,
    log: &dyn Log,
) -> Result<LinkReport> {
    let backup_dir = settings.backup_dir(backup_dir);
    log.debug(&format!("backup directory: {}", backup_dir.display()));
    let options = LinkOptions::new(sources, backup_dir).dry_run(settings.dry_run);
    linker::link_all(entries, settings.platform, &options, log).context("linking aborted")
}

/// Emit `report` in `format` and fail if any entry failed.
///
/// # Errors
///
/// Returns an error naming the number of failed entries, or if the JSON
/// report cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn finish(report: &LinkReport, format: OutputFormat, log: &dyn Log) -> Result<()> {
    match format {
        OutputFormat::Text => report.log_to(log),
        OutputFormat::Json => {
            let json = report.to_json().context("serializing report")?;
            println!("{json}");
        }
    }

    let failed = report.failures().count();
    if failed > 0 {
        anyhow::bail!("{failed} entry(ies) failed");
    }
    Ok(())
}

/// Version string embedded at build time.
#[must_use]
pub fn version_string() -> &'static str {
    option_env!("DEVENV_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

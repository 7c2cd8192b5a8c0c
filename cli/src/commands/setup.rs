//! Command: put `~/.local/bin` on `PATH`, then link every mapping.
use anyhow::Result;

use crate::config::Settings;
use crate::linker::LinkReport;
use crate::logging::Log;

/// Run `ensure-path` followed by `link` and merge their reports.
///
/// # Errors
///
/// Returns the first stage error; entry failures from either stage are
/// recorded in the merged report.
pub fn run(settings: &Settings, shell: Option<&str>, log: &dyn Log) -> Result<LinkReport> {
    let mut report = super::ensure_path::run(settings, shell, log)?;
    report.extend(super::link::run(settings, log)?);
    Ok(report)
}

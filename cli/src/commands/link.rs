//! Command: link every mapping in `conf/links.toml`.
use anyhow::{Context as _, Result};

use crate::config::Settings;
use crate::config::{mappings, validation};
use crate::linker::LinkReport;
use crate::logging::Log;

/// Load the mapping file, log validation warnings, and link every entry.
///
/// # Errors
///
/// Returns an error if the mapping file cannot be loaded or the backup
/// directory is unusable. Entry failures are recorded in the report.
pub fn run(settings: &Settings, log: &dyn Log) -> Result<LinkReport> {
    log.info(&format!("devenv {}", super::version_string()));

    log.stage("Loading mappings");
    let path = settings.mapping_file();
    let file = mappings::load(&path, &settings.home)
        .with_context(|| format!("loading {}", path.display()))?;
    let applicable = file
        .entries
        .iter()
        .filter(|e| e.applies_to(settings.platform))
        .count();
    log.info(&format!(
        "loaded {} mappings, {applicable} for {}",
        file.entries.len(),
        settings.platform
    ));

    let configs_dir = settings.configs_dir();
    let warnings = validation::validate(&file.entries, &configs_dir);
    if !warnings.is_empty() {
        log.warn(&format!(
            "found {} configuration warning(s):",
            warnings.len()
        ));
        for warning in &warnings {
            log.warn(&format!(
                "  entry {} [{}]: {}",
                warning.index + 1,
                warning.item,
                warning.message
            ));
        }
    }

    log.stage("Linking configs");
    super::link_entries(
        settings,
        &file.entries,
        configs_dir,
        file.backup_dir.as_deref(),
        log,
    )
}

//! Home-directory placeholder expansion for mapping destinations.
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Expand `~`, `$HOME` and `${HOME}` in `raw` against `home` and return an
/// absolute path.
///
/// No other variables are consulted, so the result never depends on the
/// process environment.
///
/// # Errors
///
/// Returns [`ConfigError::Placeholder`] if `raw` references any variable other
/// than `HOME`, and [`ConfigError::RelativeDestination`] if the expanded path
/// is not absolute.
pub fn expand_home(raw: &str, home: &Path) -> Result<PathBuf, ConfigError> {
    let home_str = home.to_string_lossy();
    let expanded = shellexpand::full_with_context(
        raw,
        || Some(home_str.as_ref()),
        |var| match var {
            "HOME" => Ok(Some(home_str.as_ref())),
            other => Err(format!("only HOME may be referenced, found ${other}")),
        },
    )
    .map_err(|e| ConfigError::Placeholder {
        value: raw.to_string(),
        message: e.cause,
    })?;

    let path = PathBuf::from(expanded.as_ref());
    if path.is_absolute() {
        Ok(path)
    } else {
        Err(ConfigError::RelativeDestination(raw.to_string()))
    }
}

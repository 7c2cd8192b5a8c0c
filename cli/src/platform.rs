//! Platform identifiers used to filter mapping entries.
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::PlatformError;

/// Operating system a mapping entry can apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// macOS.
    Darwin,
    /// Any Linux distribution.
    Linux,
}

impl Platform {
    /// Every supported platform, in display order.
    pub const ALL: [Self; 2] = [Self::Darwin, Self::Linux];

    /// Detect the platform this binary was built for.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] on targets other than macOS and
    /// Linux.
    pub fn detect() -> Result<Self, PlatformError> {
        Self::from_target_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value onto a platform.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] for any other operating system.
    pub fn from_target_os(os: &str) -> Result<Self, PlatformError> {
        match os {
            "macos" => Ok(Self::Darwin),
            "linux" => Ok(Self::Linux),
            other => Err(PlatformError::Unsupported {
                platform: other.to_string(),
            }),
        }
    }

    /// The identifier used in mapping files (`"darwin"` or `"linux"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::Linux => "linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "darwin" | "macos" => Ok(Self::Darwin),
            "linux" => Ok(Self::Linux),
            _ => Err(PlatformError::Unknown(s.to_string())),
        }
    }
}

//! Configuration structures for uikit-docs.
//!
//! This module provides configuration types for every component:
//!
//! - [`DateConfig`] - Flexible date parser settings (two-digit year pivot)
//! - [`InstallConfig`] - Install command generation (registry CLI package)
//! - [`PrefsConfig`] - Where user preferences are persisted
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`] and deserialize with
//! `#[serde(default)]`, so a configuration file only needs the options it
//! overrides.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for the flexible date parser.
///
/// # Examples
///
/// ```
/// use ud_core::DateConfig;
///
/// let config = DateConfig::default();
/// assert_eq!(config.century_pivot, 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DateConfig {
    /// Two-digit years below this value map to 20xx, the rest to 19xx.
    ///
    /// With the default of 30, `29` becomes 2029 and `30` becomes 1930.
    /// `0` maps every two-digit year to the 1900s, `100` maps all of them
    /// to the 2000s.
    pub century_pivot: u8,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self { century_pivot: 30 }
    }
}

/// Settings for generating install commands.
///
/// # Examples
///
/// ```
/// use ud_core::InstallConfig;
///
/// let config = InstallConfig::default();
/// assert_eq!(config.cli_package, "uikit-cli");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// npm package name of the registry CLI used by `add` commands.
    pub cli_package: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            cli_package: "uikit-cli".to_owned(),
        }
    }
}

/// Settings for preference persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefsConfig {
    /// Path of the JSON preferences file.
    ///
    /// `None` lets the caller pick a location (the CLI uses
    /// `./.uikit-docs/preferences.json`).
    pub path: Option<Utf8PathBuf>,
}

/// Root configuration for uikit-docs.
///
/// # Examples
///
/// ```
/// use ud_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"date": {"century_pivot": 50}}"#)?;
/// assert_eq!(config.date.century_pivot, 50);
/// assert_eq!(config.install.cli_package, "uikit-cli");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Date parser configuration.
    pub date: DateConfig,

    /// Install command configuration.
    pub install: InstallConfig,

    /// Preference persistence configuration.
    pub prefs: PrefsConfig,
}

impl Config {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist,
    /// [`ConfigError::Parse`] for malformed JSON, and
    /// [`ConfigError::InvalidOption`] if validation fails.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_owned()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option values that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] naming the first bad option.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.date.century_pivot > 100 {
            return Err(ConfigError::invalid_option(
                "date.century_pivot",
                format!("must be at most 100, got {}", self.date.century_pivot),
            ));
        }
        if self.install.cli_package.trim().is_empty() {
            return Err(ConfigError::invalid_option(
                "install.cli_package",
                "must not be empty",
            ));
        }
        if self
            .prefs
            .path
            .as_ref()
            .is_some_and(|p| p.as_str().is_empty())
        {
            return Err(ConfigError::invalid_option(
                "prefs.path",
                "must not be an empty path",
            ));
        }
        Ok(())
    }
}

//! Error types for the ud-core crate.
//!
//! This module provides [`ConfigError`] for configuration loading and
//! validation, and [`ParsePackageManagerError`] for rejecting unknown
//! package manager names.

use camino::Utf8PathBuf;

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use ud_core::ConfigError;
///
/// let error = ConfigError::InvalidOption {
///     option: "date.century_pivot".to_owned(),
///     reason: "must be at most 100".to_owned(),
/// };
/// assert!(error.to_string().contains("century_pivot"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {0}")]
    NotFound(Utf8PathBuf),

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The dotted name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading configuration.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

/// A package manager name that is not one of `npm`, `pnpm`, `yarn` or `bun`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown package manager '{0}' (expected npm, pnpm, yarn or bun)")]
pub struct ParsePackageManagerError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = ConfigError::NotFound(Utf8PathBuf::from("/etc/uikit-docs.json"));
        assert_eq!(
            error.to_string(),
            "configuration file not found: /etc/uikit-docs.json"
        );
    }

    #[test]
    fn test_invalid_option_display() {
        let error = ConfigError::invalid_option("install.cli_package", "must not be empty");
        let msg = error.to_string();
        assert!(msg.contains("install.cli_package"));
        assert!(msg.contains("must not be empty"));
    }

    #[test]
    fn test_parse_package_manager_display() {
        let error = ParsePackageManagerError("cargo".to_owned());
        assert!(error.to_string().contains("'cargo'"));
    }
}

//! Error types for the ud-docs crate.
//!
//! # Error Recovery Strategy
//!
//! - **I/O errors** ([`DocsError::Io`]): Fatal for the operation that hit them
//! - **Parse errors** ([`DocsError::Parse`]): Recoverable when loading
//!   preferences (defaults are used), fatal for a search index
//! - **Install errors** ([`DocsError::Install`]): Caller input problem,
//!   reported back unchanged

use camino::{Utf8Path, Utf8PathBuf};

/// Errors from preference persistence, index loading, and install snippets.
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being accessed.
        path: Utf8PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A file did not contain the expected JSON.
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        /// File being parsed.
        path: Utf8PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// An install command could not be built.
    #[error(transparent)]
    Install(#[from] InstallError),
}

impl DocsError {
    /// Creates a new [`DocsError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`DocsError::Parse`] error.
    #[inline]
    pub fn parse(path: impl Into<Utf8PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the file existed but held unusable content.
    #[inline]
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } => Some(path),
            Self::Install(_) => None,
        }
    }
}

/// Errors building an install command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstallError {
    /// No components or packages were given.
    #[error("nothing to install")]
    Empty,

    /// A registry component name is not lowercase kebab-case.
    #[error("invalid component name '{0}' (use lowercase letters, digits and '-')")]
    InvalidComponent(String),

    /// An npm package spec is empty or contains whitespace.
    #[error("invalid package '{0}'")]
    InvalidPackage(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_docs_error_io() {
        let err = DocsError::io(
            "prefs.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_corrupt());
        assert_eq!(err.path().map(Utf8Path::as_str), Some("prefs.json"));
        assert_eq!(err.to_string(), "I/O error on prefs.json: denied");
    }

    #[test]
    fn test_docs_error_parse() {
        let source = serde_json::from_str::<u8>("{").unwrap_err();
        let err = DocsError::parse("index.json", source);
        assert!(err.is_corrupt());
        assert!(err.to_string().starts_with("invalid JSON in index.json"));
    }

    #[test]
    fn test_install_error_is_transparent() {
        let err = DocsError::from(InstallError::InvalidComponent("Button".to_owned()));
        assert!(err.path().is_none());
        assert_eq!(
            err.to_string(),
            "invalid component name 'Button' (use lowercase letters, digits and '-')"
        );
    }
}

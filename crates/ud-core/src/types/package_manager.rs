//! JavaScript package managers.
//!
//! This module provides the [`PackageManager`] enum used for the preferred
//! package manager preference and for rendering install snippets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParsePackageManagerError;

/// A JavaScript package manager.
///
/// # Examples
///
/// ```
/// use ud_core::PackageManager;
///
/// let pm: PackageManager = "PNPM".parse()?;
/// assert_eq!(pm, PackageManager::Pnpm);
/// assert_eq!(pm.to_string(), "pnpm");
/// # Ok::<(), ud_core::ParsePackageManagerError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageManager {
    /// npm, bundled with Node.js.
    #[default]
    Npm,
    /// pnpm.
    Pnpm,
    /// Yarn (berry).
    Yarn,
    /// Bun.
    Bun,
}

impl PackageManager {
    /// Every package manager, in display order.
    pub const ALL: [Self; 4] = [Self::Npm, Self::Pnpm, Self::Yarn, Self::Bun];

    /// Returns the executable name.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PackageManager {
    type Err = ParsePackageManagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|pm| pm.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParsePackageManagerError(trimmed.to_owned()))
    }
}

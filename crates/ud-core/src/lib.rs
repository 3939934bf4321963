//! Core types, errors, and configuration for uikit-docs.
//!
//! This crate provides the foundational types shared across the workspace:
//!
//! - [`ConfigError`] and [`ParsePackageManagerError`] for consistent error handling
//! - Configuration structures ([`Config`], [`DateConfig`], [`InstallConfig`], [`PrefsConfig`])
//! - Shared domain types ([`PackageManager`])
//!
//! # Examples
//!
//! ```
//! use ud_core::{Config, PackageManager};
//!
//! let config = Config::default();
//! assert_eq!(config.date.century_pivot, 30);
//! assert_eq!(PackageManager::default(), PackageManager::Npm);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, DateConfig, InstallConfig, PrefsConfig};
pub use error::{ConfigError, ParsePackageManagerError};
pub use types::PackageManager;

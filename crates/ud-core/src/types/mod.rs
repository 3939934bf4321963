//! Domain types shared across the workspace.
//!
//! - [`package_manager`] - JavaScript package managers the install snippets target
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use ud_core::types::PackageManager;
//! use ud_core::PackageManager as SameType;
//! ```

mod package_manager;

pub use package_manager::PackageManager;

//! Documentation-site services for uikit-docs.
//!
//! - [`prefs`]: persisted user preferences ([`PreferenceStore`])
//! - [`install`]: per-package-manager install snippets ([`InstallRequest`])
//! - [`search`]: scored page search over a JSON index ([`search()`])

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod install;
pub mod prefs;
pub mod search;

pub use error::{DocsError, InstallError};
pub use install::{InstallCommand, InstallRequest};
pub use prefs::{JsonFileBackend, MemoryBackend, PreferenceBackend, PreferenceStore, Preferences};
pub use search::{DocEntry, SearchHit, load_index, search};

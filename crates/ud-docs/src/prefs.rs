//! Persisted user preferences.
//!
//! The documentation site remembers two choices across visits: which
//! package manager install snippets default to, and whether pages use the
//! wide layout. [`PreferenceStore`] holds the current [`Preferences`] and
//! writes every change through a [`PreferenceBackend`].
//!
//! # Loading
//!
//! Preferences are read once when the store is opened. A backend with
//! nothing stored yields [`Preferences::default`]. A backend whose stored
//! value is unreadable is logged and also yields the defaults; the bad
//! value is overwritten by the next change.
//!
//! # Examples
//!
//! ```
//! use ud_core::PackageManager;
//! use ud_docs::{MemoryBackend, PreferenceStore};
//!
//! let store = PreferenceStore::open(MemoryBackend::new());
//! assert_eq!(store.package_manager(), PackageManager::Npm);
//!
//! store.set_package_manager(PackageManager::Pnpm)?;
//! store.set_widescreen(true)?;
//! assert!(store.get().widescreen);
//! # Ok::<(), ud_docs::DocsError>(())
//! ```

use std::fmt;
use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use ud_core::PackageManager;

use crate::error::DocsError;

/// User preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Package manager selected in install snippets.
    pub package_manager: PackageManager,
    /// Whether pages use the full window width.
    pub widescreen: bool,
}

/// Storage for [`Preferences`].
pub trait PreferenceBackend: fmt::Debug + Send + Sync {
    /// Loads stored preferences, or `None` if nothing has been stored.
    ///
    /// # Errors
    ///
    /// Returns an error if stored preferences exist but cannot be read.
    fn load(&self) -> Result<Option<Preferences>, DocsError>;

    /// Replaces the stored preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the preferences cannot be written.
    fn save(&self, prefs: &Preferences) -> Result<(), DocsError>;
}

/// Stores preferences as a JSON file.
///
/// Writes go to a uniquely named temporary file in the same directory that
/// is then renamed over the target. A crash mid-write leaves the previous
/// file intact, and concurrent writers never share a temporary file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: Utf8PathBuf,
}

impl JsonFileBackend {
    /// Creates a backend for `path`. The file need not exist.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the preferences file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl PreferenceBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<Preferences>, DocsError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(DocsError::io(&self.path, err)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|err| DocsError::parse(&self.path, err))
    }

    fn save(&self, prefs: &Preferences) -> Result<(), DocsError> {
        let dir = match self.path.parent().filter(|p| !p.as_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|err| DocsError::io(parent, err))?;
                parent
            }
            None => Utf8Path::new("."),
        };

        let json = serde_json::to_string_pretty(prefs)
            .map_err(|err| DocsError::parse(&self.path, err))?;
        let mut temp = NamedTempFile::new_in(dir).map_err(|err| DocsError::io(dir, err))?;
        temp.write_all(json.as_bytes())
            .map_err(|err| DocsError::io(&self.path, err))?;
        temp.persist(&self.path)
            .map_err(|err| DocsError::io(&self.path, err.error))?;

        debug!(path = %self.path, "Saved preferences");
        Ok(())
    }
}

/// Keeps preferences in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    stored: Mutex<Option<Preferences>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that already holds `prefs`.
    #[must_use]
    pub fn with(prefs: Preferences) -> Self {
        Self {
            stored: Mutex::new(Some(prefs)),
        }
    }

    /// Returns the last saved preferences.
    #[must_use]
    pub fn stored(&self) -> Option<Preferences> {
        *self.stored.lock()
    }
}

impl PreferenceBackend for MemoryBackend {
    fn load(&self) -> Result<Option<Preferences>, DocsError> {
        Ok(self.stored())
    }

    fn save(&self, prefs: &Preferences) -> Result<(), DocsError> {
        *self.stored.lock() = Some(*prefs);
        Ok(())
    }
}

/// Shared preference state backed by persistent storage.
///
/// `PreferenceStore` is `Send + Sync`; clone-free reads take a shared lock,
/// changes take the write lock for the duration of the save so stored and
/// in-memory values change in the same order.
#[derive(Debug)]
pub struct PreferenceStore<B = Box<dyn PreferenceBackend>> {
    backend: B,
    current: RwLock<Preferences>,
}

impl<B: PreferenceBackend> PreferenceStore<B> {
    /// Opens a store, loading whatever the backend holds.
    pub fn open(backend: B) -> Self {
        let current = match backend.load() {
            Ok(Some(prefs)) => prefs,
            Ok(None) => {
                debug!("No stored preferences, using defaults");
                Preferences::default()
            }
            Err(err) => {
                warn!(error = %err, "Could not load preferences, using defaults");
                Preferences::default()
            }
        };
        Self {
            backend,
            current: RwLock::new(current),
        }
    }

    /// Returns the backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the current preferences.
    #[must_use]
    pub fn get(&self) -> Preferences {
        *self.current.read()
    }

    /// Returns the preferred package manager.
    #[must_use]
    pub fn package_manager(&self) -> PackageManager {
        self.current.read().package_manager
    }

    /// Returns whether the wide layout is enabled.
    #[must_use]
    pub fn widescreen(&self) -> bool {
        self.current.read().widescreen
    }

    /// Sets the preferred package manager and saves.
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails; the in-memory value is still changed.
    pub fn set_package_manager(&self, manager: PackageManager) -> Result<(), DocsError> {
        self.update(|prefs| prefs.package_manager = manager).map(drop)
    }

    /// Enables or disables the wide layout and saves.
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails; the in-memory value is still changed.
    pub fn set_widescreen(&self, widescreen: bool) -> Result<(), DocsError> {
        self.update(|prefs| prefs.widescreen = widescreen).map(drop)
    }

    /// Applies `change` to the preferences and saves the result.
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails; the in-memory value is still changed.
    pub fn update(&self, change: impl FnOnce(&mut Preferences)) -> Result<Preferences, DocsError> {
        let mut current = self.current.write();
        change(&mut current);
        let prefs = *current;
        self.backend.save(&prefs)?;
        Ok(prefs)
    }
}

impl PreferenceStore {
    /// Opens a store over a boxed backend.
    pub fn open_boxed(backend: impl PreferenceBackend + 'static) -> Self {
        Self::open(Box::new(backend))
    }
}

impl<B: PreferenceBackend + ?Sized> PreferenceBackend for Box<B> {
    fn load(&self) -> Result<Option<Preferences>, DocsError> {
        (**self).load()
    }

    fn save(&self, prefs: &Preferences) -> Result<(), DocsError> {
        (**self).save(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_stored() {
        let store = PreferenceStore::open(MemoryBackend::new());
        assert_eq!(store.get(), Preferences::default());
        assert_eq!(store.package_manager(), PackageManager::Npm);
        assert!(!store.widescreen());
        assert_eq!(store.backend().stored(), None);
    }

    #[test]
    fn test_loads_stored_value() {
        let stored = Preferences {
            package_manager: PackageManager::Bun,
            widescreen: true,
        };
        let store = PreferenceStore::open(MemoryBackend::with(stored));
        assert_eq!(store.get(), stored);
    }

    #[test]
    fn test_every_change_is_saved() {
        let store = PreferenceStore::open(MemoryBackend::new());

        store.set_package_manager(PackageManager::Yarn).unwrap();
        assert_eq!(
            store.backend().stored().map(|p| p.package_manager),
            Some(PackageManager::Yarn)
        );

        store.set_widescreen(true).unwrap();
        assert_eq!(store.backend().stored(), Some(store.get()));

        let prefs = store
            .update(|p| {
                p.package_manager = PackageManager::Pnpm;
                p.widescreen = false;
            })
            .unwrap();
        assert_eq!(prefs.package_manager, PackageManager::Pnpm);
        assert_eq!(store.backend().stored(), Some(prefs));
    }

    #[test]
    fn test_json_file_missing_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("prefs.json")).unwrap();
        let backend = JsonFileBackend::new(&path);
        assert!(backend.load().unwrap().is_none());
        assert_eq!(PreferenceStore::open(backend).get(), Preferences::default());
    }

    #[test]
    fn test_json_file_round_trip_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("nested/dir/prefs.json")).unwrap();

        let store = PreferenceStore::open(JsonFileBackend::new(&path));
        store.set_package_manager(PackageManager::Pnpm).unwrap();
        store.set_widescreen(true).unwrap();
        assert!(path.exists());
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);

        let reopened = PreferenceStore::open(JsonFileBackend::new(&path));
        assert_eq!(reopened.get(), store.get());

        let contents = fs::read_to_string(&path).unwrap();
        insta::assert_snapshot!(contents, @r#"
        {
          "package_manager": "pnpm",
          "widescreen": true
        }
        "#);
    }

    #[test]
    fn test_concurrent_saves_leave_one_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("prefs.json")).unwrap();

        std::thread::scope(|scope| {
            for (i, manager) in PackageManager::ALL.into_iter().cycle().take(16).enumerate() {
                let backend = JsonFileBackend::new(&path);
                scope.spawn(move || {
                    let prefs = Preferences {
                        package_manager: manager,
                        widescreen: i % 2 == 0,
                    };
                    for _ in 0..10 {
                        backend.save(&prefs).unwrap();
                    }
                });
            }
        });

        assert!(JsonFileBackend::new(&path).load().unwrap().is_some());
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["prefs.json"]);
    }

    #[test]
    fn test_json_file_corrupt_yields_defaults_then_heals() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("prefs.json")).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let backend = JsonFileBackend::new(&path);
        assert!(backend.load().unwrap_err().is_corrupt());

        let store = PreferenceStore::open(backend);
        assert_eq!(store.get(), Preferences::default());

        store.set_widescreen(true).unwrap();
        let healed = JsonFileBackend::new(&path).load().unwrap();
        assert_eq!(healed.map(|p| p.widescreen), Some(true));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("prefs.json")).unwrap();
        fs::write(&path, r#"{"widescreen": true}"#).unwrap();

        let prefs = JsonFileBackend::new(&path).load().unwrap().unwrap();
        assert!(prefs.widescreen);
        assert_eq!(prefs.package_manager, PackageManager::Npm);
    }

    #[test]
    fn test_boxed_store() {
        let store = PreferenceStore::open_boxed(MemoryBackend::new());
        store.set_widescreen(true).unwrap();
        assert!(store.widescreen());
    }
}

//! File-backed implementation of the `KeyValueStore` port.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use exotour_core::error::TourError;
use exotour_core::storage::KeyValueStore;
use tracing::{debug, info};

/// File name used by [`JsonFileStore::open_default`].
pub const STATE_FILE_NAME: &str = "exotour-state.json";

/// Key/value pairs kept in a JSON object file.
///
/// The file is read once at open. Every `set` rewrites the whole file
/// through a temporary sibling and a rename, so a crash mid-write leaves
/// either the old or the new contents.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Opens the store kept in [`STATE_FILE_NAME`] inside `dir`.
    ///
    /// # Errors
    ///
    /// See [`JsonFileStore::open`].
    pub fn open_default(dir: impl AsRef<Path>) -> Result<Self, TourError> {
        Self::open(dir, STATE_FILE_NAME)
    }

    /// Opens the store kept in `file_name` inside `dir`, creating `dir` if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Validation` if `file_name` is not a plain file
    /// name, and `TourError::Infrastructure` if the directory cannot be
    /// created, the file cannot be read, or its contents are not a JSON
    /// object of strings.
    pub fn open(dir: impl AsRef<Path>, file_name: &str) -> Result<Self, TourError> {
        let dir = dir.as_ref();
        let mut components = Path::new(file_name).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(TourError::Validation(format!(
                "state file name must be a plain file name, got {file_name:?}"
            )));
        }
        fs::create_dir_all(dir).map_err(|e| {
            TourError::Infrastructure(format!(
                "cannot create state directory {}: {e}",
                dir.display()
            ))
        })?;
        let path = dir.join(file_name);

        let entries = match fs::read_to_string(&path) {
            Ok(source) => serde_json::from_str(&source).map_err(|e| {
                TourError::Infrastructure(format!("corrupt state file {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(TourError::Infrastructure(format!(
                    "cannot read state file {}: {e}",
                    path.display()
                )));
            }
        };
        info!(path = %path.display(), keys = entries.len(), "state store opened");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, TourError> {
        self.entries
            .lock()
            .map_err(|_| TourError::Infrastructure("state store lock poisoned".to_owned()))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), TourError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| TourError::Infrastructure(format!("cannot encode state: {e}")))?;
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);
        fs::write(&temp, json).map_err(|e| {
            TourError::Infrastructure(format!("cannot write {}: {e}", temp.display()))
        })?;
        fs::rename(&temp, &self.path).map_err(|e| {
            TourError::Infrastructure(format!(
                "cannot replace state file {}: {e}",
                self.path.display()
            ))
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, TourError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TourError> {
        let mut entries = self.lock()?;
        let mut updated = entries.clone();
        updated.insert(key.to_owned(), value.to_owned());
        self.persist(&updated)?;
        *entries = updated;
        debug!(key, "state key written");
        Ok(())
    }
}

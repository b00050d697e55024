use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use finder_core::{PresentationSettings, SETTINGS_KEY};
use finder_logging::{finder_info, finder_warn};

use crate::persist::{write_atomically, PersistError};

/// Minimal key to serialized-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), PersistError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// A JSON object on disk, rewritten atomically on every `set`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store; an
    /// unreadable or corrupt file is logged and treated as empty too.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_entries(path: &Path) -> BTreeMap<String, String> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(err) => {
            finder_warn!("Failed to read store {:?}: {}", path, err);
            return BTreeMap::new();
        }
    };
    match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(err) => {
            finder_warn!("Failed to parse store {:?}: {}", path, err);
            BTreeMap::new()
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value);
        let content = serde_json::to_string_pretty(&self.entries)?;
        write_atomically(&self.path, &content)
    }
}

/// Loads and writes [`PresentationSettings`] through a [`KeyValueStore`].
pub struct SettingsStore<S> {
    store: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Defaults on first run; per-field defaults for partial or damaged data.
    pub fn load(&self) -> PresentationSettings {
        match self.store.get(SETTINGS_KEY) {
            Some(raw) => PresentationSettings::from_json(&raw),
            None => {
                finder_info!("No stored presentation settings; using defaults");
                PresentationSettings::default()
            }
        }
    }

    pub fn save(&mut self, settings: &PresentationSettings) -> Result<(), PersistError> {
        self.store.set(SETTINGS_KEY, settings.to_json()?)
    }

    pub fn inner(&self) -> &S {
        &self.store
    }
}

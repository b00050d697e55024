use std::path::Path;

use finder_core::PresentationSettings;
use finder_engine::{JsonFileStore, SettingsStore};
use finder_logging::{finder_error, finder_info};

/// Write-through presentation settings backed by the local key/value file.
pub(crate) struct SettingsPersistence {
    store: SettingsStore<JsonFileStore>,
}

impl SettingsPersistence {
    pub fn open(path: &Path) -> Self {
        Self {
            store: SettingsStore::new(JsonFileStore::open(path)),
        }
    }

    pub fn load(&self) -> PresentationSettings {
        let settings = self.store.load();
        finder_info!(
            "Loaded presentation settings from {:?}",
            self.store.inner().path()
        );
        settings
    }

    /// Failures are logged; the in-memory settings stay authoritative.
    pub fn save(&mut self, settings: &PresentationSettings) {
        if let Err(err) = self.store.save(settings) {
            finder_error!(
                "Failed to write settings to {:?}: {}",
                self.store.inner().path(),
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finder_core::{Column, FontSize};
    use tempfile::TempDir;

    #[test]
    fn save_then_reopen_restores_settings() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".finder_settings.json");

        let mut settings = PresentationSettings::default();
        settings.set_column_width(Column::Source, 10);
        settings.font_size = FontSize::Large;

        let mut persistence = SettingsPersistence::open(&path);
        persistence.save(&settings);

        let restored = SettingsPersistence::open(&path).load();
        assert_eq!(restored, settings);
        assert_eq!(restored.column_width(Column::Source), finder_core::MIN_COLUMN_WIDTH);
    }

    #[test]
    fn unwritable_location_does_not_panic() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let mut persistence = SettingsPersistence::open(&blocker.join("settings.json"));
        persistence.save(&PresentationSettings::default());
        assert_eq!(persistence.load(), PresentationSettings::default());
    }
}

use sync_logging::{sync_error, sync_warn};
use wordsync_core::Settings;
use wordsync_engine::SettingsStore;

/// Loads settings once at startup; any failure falls back to the defaults.
pub(crate) fn load_settings(store: &dyn SettingsStore) -> Settings {
    match store.load() {
        Ok(settings) => settings,
        Err(err) => {
            sync_warn!("Using default settings: {}", err);
            Settings::default()
        }
    }
}

pub(crate) fn save_settings(store: &dyn SettingsStore, settings: &Settings) {
    if let Err(err) = store.save(settings) {
        sync_error!("Failed to persist settings: {}", err);
    }
}

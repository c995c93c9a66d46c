use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sync_logging::sync_info;
use thiserror::Error;
use wordsync_core::Settings;

use crate::persist::{write_atomic, PersistError};

#[derive(Debug, Error)]
pub enum SettingsStoreError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings from {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to serialize settings: {0}")]
    Serialize(String),
    #[error(transparent)]
    Write(#[from] PersistError),
}

/// Flat key-value persistence for [`Settings`].
pub trait SettingsStore: Send + Sync {
    /// Reads the stored record merged over the defaults. A store with nothing in
    /// it yields the defaults.
    fn load(&self) -> Result<Settings, SettingsStoreError>;
    fn save(&self, settings: &Settings) -> Result<(), SettingsStoreError>;
}

/// Stores settings as a RON record in a single file.
#[derive(Debug, Clone)]
pub struct RonSettingsStore {
    path: PathBuf,
}

impl RonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for RonSettingsStore {
    fn load(&self) -> Result<Settings, SettingsStoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Settings::default());
            }
            Err(source) => {
                return Err(SettingsStoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let settings: Settings =
            ron::from_str(&content).map_err(|err| SettingsStoreError::Parse {
                path: self.path.clone(),
                message: err.to_string(),
            })?;
        sync_info!("Loaded settings from {:?}", self.path);
        Ok(settings.sanitized())
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsStoreError> {
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(settings, pretty)
            .map_err(|err| SettingsStoreError::Serialize(err.to_string()))?;
        write_atomic(&self.path, &content)?;
        sync_info!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

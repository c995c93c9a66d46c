use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PROPERTY_NAME: &str = "word_count";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("property name must not be empty")]
    EmptyPropertyName,
}

/// User configuration. Missing fields in a persisted record fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    property_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            property_name: DEFAULT_PROPERTY_NAME.to_string(),
        }
    }
}

impl Settings {
    pub fn new(property_name: &str) -> Result<Self, SettingsError> {
        let mut settings = Self::default();
        settings.set_property_name(property_name)?;
        Ok(settings)
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    pub fn set_property_name(&mut self, name: &str) -> Result<(), SettingsError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SettingsError::EmptyPropertyName);
        }
        self.property_name = trimmed.to_string();
        Ok(())
    }

    /// Repairs a record loaded from storage whose property name is blank.
    pub fn sanitized(self) -> Self {
        if self.property_name.trim().is_empty() {
            Self::default()
        } else {
            Self {
                property_name: self.property_name.trim().to_string(),
            }
        }
    }
}

use crate::view_model::AppViewModel;
use crate::{ActiveDocumentTracker, DocumentId, Settings};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    settings: Settings,
    tracker: ActiveDocumentTracker,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            tracker: ActiveDocumentTracker::new(),
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            active_document: self.tracker.current().cloned(),
            property_name: self.settings.property_name().to_string(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn active_document(&self) -> Option<&DocumentId> {
        self.tracker.current()
    }

    pub(crate) fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub(crate) fn tracker_mut(&mut self) -> &mut ActiveDocumentTracker {
        &mut self.tracker
    }
}

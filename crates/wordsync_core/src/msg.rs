use crate::{DocumentId, Settings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Host moved focus to another document, or to nothing.
    FocusChanged(Option<DocumentId>),
    /// User invoked the "sync word count" command.
    SyncNowInvoked,
    /// User invoked the "remove tracked property" command.
    RemoveTrackedInvoked,
    /// User edited the property name in the settings surface.
    PropertyNameEdited(String),
    /// Settings were read from storage at startup.
    SettingsLoaded(Settings),
    /// Host is unloading the plugin.
    Shutdown,
}

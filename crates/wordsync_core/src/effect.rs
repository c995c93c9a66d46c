use crate::{DocumentId, Settings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SyncDocument {
        document: DocumentId,
        property_name: String,
        trigger: SyncTrigger,
    },
    RemoveProperty {
        document: DocumentId,
        property_name: String,
    },
    PersistSettings(Settings),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    /// The document just lost focus.
    FocusLost,
    /// The user asked for an immediate sync.
    Manual,
}

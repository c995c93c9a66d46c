use std::io;

use thiserror::Error;
use wordsync_core::{DocumentId, SyncTrigger};

use crate::frontmatter::FrontmatterError;
use crate::persist::PersistError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncCommand {
    Sync {
        document: DocumentId,
        property_name: String,
        trigger: SyncTrigger,
    },
    RemoveProperty {
        document: DocumentId,
        property_name: String,
    },
}

impl SyncCommand {
    pub fn document(&self) -> &DocumentId {
        match self {
            SyncCommand::Sync { document, .. } | SyncCommand::RemoveProperty { document, .. } => {
                document
            }
        }
    }
}

#[derive(Debug)]
pub enum EngineEvent {
    Completed {
        command: SyncCommand,
        result: Result<SyncOutcome, SyncError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The tracked field now holds `count`; `previous` is the value seen in the
    /// cached header before the write.
    Updated {
        count: u32,
        previous: Option<serde_json::Value>,
    },
    /// The tracked field was deleted from the header.
    Removed,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The document has no frontmatter at all.
    NoHeader,
    /// The frontmatter does not declare the tracked field.
    NotTracked,
}

/// Failure reported by a host collaborator.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("document not found: {0}")]
    NotFound(DocumentId),
    #[error("document path escapes the vault: {0}")]
    OutsideVault(DocumentId),
    #[error("io error on {document}: {source}")]
    Io {
        document: DocumentId,
        #[source]
        source: io::Error,
    },
    #[error("unreadable frontmatter in {document}: {source}")]
    Frontmatter {
        document: DocumentId,
        #[source]
        source: FrontmatterError,
    },
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("document disappeared before it could be synced: {0}")]
    DocumentMissing(DocumentId),
    #[error("failed to read {document}: {source}")]
    Read {
        document: DocumentId,
        #[source]
        source: HostError,
    },
    #[error("failed to update header of {document}: {source}")]
    Mutate {
        document: DocumentId,
        #[source]
        source: HostError,
    },
}

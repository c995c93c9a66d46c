use wordsync_core::{DocumentId, Header};

use crate::HostError;

/// Edit applied to a mutable view of a document header.
pub type HeaderEdit = Box<dyn FnOnce(&mut Header) + Send>;

/// Reads the persisted text of a document.
#[async_trait::async_trait]
pub trait TextReader: Send + Sync {
    async fn read(&self, document: &DocumentId) -> Result<String, HostError>;
}

/// Cached snapshot of parsed headers.
#[async_trait::async_trait]
pub trait MetadataCache: Send + Sync {
    /// Header as of the last refresh; `None` when the document has no header or
    /// is unknown to the cache.
    fn header(&self, document: &DocumentId) -> Option<Header>;

    /// Brings the snapshot of `document` up to date with its last save. Hosts
    /// whose cache never goes stale keep the default.
    async fn refresh(&self, _document: &DocumentId) -> Result<(), HostError> {
        Ok(())
    }
}

/// Read-modify-write access to a header.
///
/// Implementations must serialise edits to the same document and persist the
/// result before returning.
#[async_trait::async_trait]
pub trait HeaderMutator: Send + Sync {
    async fn mutate_header(&self, document: &DocumentId, edit: HeaderEdit)
        -> Result<(), HostError>;
}

/// Everything the driver needs from a host.
pub trait Vault: TextReader + MetadataCache + HeaderMutator {}

impl<T> Vault for T where T: TextReader + MetadataCache + HeaderMutator + ?Sized {}

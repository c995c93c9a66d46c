use std::collections::HashMap;
use std::fs::Metadata;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use sync_logging::{sync_debug, sync_warn};
use wordsync_core::{DocumentId, Header};

use crate::frontmatter::{render_document, split_document};
use crate::persist::write_atomic;
use crate::{HeaderEdit, HeaderMutator, HostError, MetadataCache, TextReader};

type DocumentLock = Arc<tokio::sync::Mutex<()>>;

/// Host backed by a directory of markdown files.
///
/// A cached header stays valid while the file keeps the modification time and
/// length it had when parsed; [`MetadataCache::refresh`] re-parses it otherwise.
pub struct FsVault {
    root: PathBuf,
    cache: Mutex<HashMap<DocumentId, CachedHeader>>,
    locks: Mutex<HashMap<DocumentId, DocumentLock>>,
}

#[derive(Debug, Clone)]
struct CachedHeader {
    stamp: FileStamp,
    header: Option<Header>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileStamp {
    fn of(meta: &Metadata) -> Self {
        Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        }
    }
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Mutex::new(HashMap::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Drops the cached header of `document` so the next refresh re-reads the file.
    pub fn invalidate(&self, document: &DocumentId) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(document);
    }

    fn resolve(&self, document: &DocumentId) -> Result<PathBuf, HostError> {
        let relative = document.as_path();
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || document.as_str().is_empty() {
            return Err(HostError::OutsideVault(document.clone()));
        }
        Ok(self.root.join(relative))
    }

    fn document_lock(&self, document: &DocumentId) -> DocumentLock {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(document.clone())
            .or_default()
            .clone()
    }

    /// Forgets the lock of `document` unless another edit is holding or awaiting it.
    fn release_lock(&self, document: &DocumentId, lock: DocumentLock) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map, one here.
        if Arc::strong_count(&lock) <= 2 {
            locks.remove(document);
        }
    }

    fn cached_stamp(&self, document: &DocumentId) -> Option<FileStamp> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(document)
            .map(|cached| cached.stamp)
    }

    fn store_header(&self, document: &DocumentId, stamp: FileStamp, header: Option<Header>) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(document.clone(), CachedHeader { stamp, header });
    }

    /// Re-stats `path` after a write and records `header` against the new stamp.
    async fn remember_written(&self, document: &DocumentId, path: &Path, header: Option<Header>) {
        match tokio::fs::metadata(path).await {
            Ok(meta) => self.store_header(document, FileStamp::of(&meta), header),
            Err(_) => self.invalidate(document),
        }
    }

    async fn mutate_locked(
        &self,
        document: &DocumentId,
        path: PathBuf,
        edit: HeaderEdit,
    ) -> Result<(), HostError> {
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| Self::io_error(document, err))?;
        let (block, body) = split_document(&text).map_err(|source| HostError::Frontmatter {
            document: document.clone(),
            source,
        })?;
        let original = block.as_ref().map(|block| block.header().clone());
        let mut header = original.clone().unwrap_or_default();
        edit(&mut header);

        if original.as_ref() == Some(&header) || (original.is_none() && header.is_empty()) {
            sync_debug!("Header of {} unchanged; nothing written", document);
            self.remember_written(document, &path, original).await;
            return Ok(());
        }

        let rendered = render_document(block.as_ref(), &header, body).map_err(|source| {
            HostError::Frontmatter {
                document: document.clone(),
                source,
            }
        })?;
        let target = path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&target, &rendered))
            .await
            .map_err(|err| Self::io_error(document, io::Error::other(err)))??;

        self.remember_written(document, &path, Some(header)).await;
        Ok(())
    }

    fn io_error(document: &DocumentId, source: io::Error) -> HostError {
        if source.kind() == io::ErrorKind::NotFound {
            HostError::NotFound(document.clone())
        } else {
            HostError::Io {
                document: document.clone(),
                source,
            }
        }
    }
}

#[async_trait::async_trait]
impl TextReader for FsVault {
    async fn read(&self, document: &DocumentId) -> Result<String, HostError> {
        let path = self.resolve(document)?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| Self::io_error(document, err))
    }
}

#[async_trait::async_trait]
impl MetadataCache for FsVault {
    fn header(&self, document: &DocumentId) -> Option<Header> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(document)
            .and_then(|cached| cached.header.clone())
    }

    async fn refresh(&self, document: &DocumentId) -> Result<(), HostError> {
        let path = self.resolve(document)?;
        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.invalidate(document);
                return Ok(());
            }
            Err(err) => return Err(Self::io_error(document, err)),
        };
        let stamp = FileStamp::of(&meta);
        if self.cached_stamp(document) == Some(stamp) {
            return Ok(());
        }

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| Self::io_error(document, err))?;
        let header = match split_document(&text) {
            Ok((block, _)) => block.map(|block| block.header().clone()),
            Err(err) => {
                sync_warn!("Ignoring unreadable header of {}: {}", document, err);
                None
            }
        };
        self.store_header(document, stamp, header);
        Ok(())
    }
}

#[async_trait::async_trait]
impl HeaderMutator for FsVault {
    async fn mutate_header(
        &self,
        document: &DocumentId,
        edit: HeaderEdit,
    ) -> Result<(), HostError> {
        let path = self.resolve(document)?;
        let lock = self.document_lock(document);
        let result = {
            let _guard = lock.lock().await;
            self.mutate_locked(document, path, edit).await
        };
        self.release_lock(document, lock);
        result
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn set_count(count: u32) -> HeaderEdit {
        Box::new(move |header: &mut Header| {
            header.insert("word_count".into(), json!(count));
        })
    }

    #[tokio::test]
    async fn locks_are_dropped_after_each_edit() {
        let temp = TempDir::new().unwrap();
        for name in ["a.md", "b.md"] {
            fs::write(temp.path().join(name), "---\nword_count: 0\n---\nbody").unwrap();
        }
        let vault = FsVault::new(temp.path());

        for name in ["a.md", "b.md", "a.md"] {
            vault
                .mutate_header(&DocumentId::new(name), set_count(1))
                .await
                .unwrap();
        }
        assert!(vault.locks.lock().unwrap().is_empty());

        // A failed edit releases its lock too.
        let missing = vault
            .mutate_header(&DocumentId::new("gone.md"), set_count(1))
            .await;
        assert!(missing.is_err());
        assert!(vault.locks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn waiting_edit_keeps_the_lock_alive() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.md"), "---\nword_count: 0\n---\nbody").unwrap();
        let vault = FsVault::new(temp.path());
        let document = DocumentId::new("a.md");

        let held = vault.document_lock(&document);
        let guard = held.lock().await;
        let waiter = vault.document_lock(&document);
        drop(guard);
        vault.release_lock(&document, held);
        assert!(vault.locks.lock().unwrap().contains_key(&document));

        vault.release_lock(&document, waiter);
        assert!(vault.locks.lock().unwrap().is_empty());
    }
}

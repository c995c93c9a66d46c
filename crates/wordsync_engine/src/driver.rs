use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sync_logging::{sync_debug, sync_info};
use wordsync_core::{is_eligible, DocumentId, Header, SyncTrigger, WordCharCounter, WordCounter};

use crate::{HostError, SkipReason, SyncError, SyncOutcome, Vault};

/// Runs gate, count and header write for one document at a time.
#[derive(Clone)]
pub struct SyncDriver {
    counter: Arc<dyn WordCounter>,
}

impl Default for SyncDriver {
    fn default() -> Self {
        Self::new(Arc::new(WordCharCounter))
    }
}

impl SyncDriver {
    pub fn new(counter: Arc<dyn WordCounter>) -> Self {
        Self { counter }
    }

    /// Sync triggered by `document` losing focus.
    pub async fn sync_if_eligible(
        &self,
        vault: &dyn Vault,
        document: &DocumentId,
        property_name: &str,
    ) -> Result<SyncOutcome, SyncError> {
        self.sync(vault, document, property_name, SyncTrigger::FocusLost)
            .await
    }

    /// Sync requested explicitly by the user.
    pub async fn sync_now(
        &self,
        vault: &dyn Vault,
        document: &DocumentId,
        property_name: &str,
    ) -> Result<SyncOutcome, SyncError> {
        self.sync(vault, document, property_name, SyncTrigger::Manual)
            .await
    }

    pub async fn sync(
        &self,
        vault: &dyn Vault,
        document: &DocumentId,
        property_name: &str,
        trigger: SyncTrigger,
    ) -> Result<SyncOutcome, SyncError> {
        let header = self.current_header(vault, document).await?;
        if let Some(reason) = skip_reason(header.as_ref(), property_name) {
            sync_debug!("{:?} sync of {} skipped: {:?}", trigger, document, reason);
            return Ok(SyncOutcome::Skipped(reason));
        }
        let previous = header
            .as_ref()
            .and_then(|header| header.get(property_name).cloned());

        let text = vault
            .read(document)
            .await
            .map_err(|source| read_error(document, source))?;
        let count = self.counter.count(&text);

        let key = property_name.to_string();
        let applied = Arc::new(AtomicBool::new(false));
        let flag = applied.clone();
        vault
            .mutate_header(
                document,
                Box::new(move |header: &mut Header| {
                    // The field may have been dropped by a save since the snapshot.
                    if let Some(slot) = header.get_mut(&key) {
                        *slot = serde_json::Value::from(count);
                        flag.store(true, Ordering::Release);
                    }
                }),
            )
            .await
            .map_err(|source| mutate_error(document, source))?;

        if !applied.load(Ordering::Acquire) {
            sync_debug!("{} no longer declares {}; left alone", document, property_name);
            return Ok(SyncOutcome::Skipped(SkipReason::NotTracked));
        }
        sync_info!(
            "{:?} sync of {}: {} = {} (was {:?})",
            trigger,
            document,
            property_name,
            count,
            previous
        );
        Ok(SyncOutcome::Updated { count, previous })
    }

    /// Deletes the tracked field from a document that declares it.
    pub async fn remove_property(
        &self,
        vault: &dyn Vault,
        document: &DocumentId,
        property_name: &str,
    ) -> Result<SyncOutcome, SyncError> {
        let header = self.current_header(vault, document).await?;
        if let Some(reason) = skip_reason(header.as_ref(), property_name) {
            return Ok(SyncOutcome::Skipped(reason));
        }
        let key = property_name.to_string();
        let removed = Arc::new(AtomicBool::new(false));
        let flag = removed.clone();
        vault
            .mutate_header(
                document,
                Box::new(move |header: &mut Header| {
                    if header.shift_remove(&key).is_some() {
                        flag.store(true, Ordering::Release);
                    }
                }),
            )
            .await
            .map_err(|source| mutate_error(document, source))?;

        if !removed.load(Ordering::Acquire) {
            return Ok(SyncOutcome::Skipped(SkipReason::NotTracked));
        }
        sync_info!("removed {} from {}", property_name, document);
        Ok(SyncOutcome::Removed)
    }

    async fn current_header(
        &self,
        vault: &dyn Vault,
        document: &DocumentId,
    ) -> Result<Option<Header>, SyncError> {
        vault
            .refresh(document)
            .await
            .map_err(|source| read_error(document, source))?;
        Ok(vault.header(document))
    }
}

fn skip_reason(header: Option<&Header>, property_name: &str) -> Option<SkipReason> {
    match header {
        None => Some(SkipReason::NoHeader),
        Some(_) if !is_eligible(header, property_name) => Some(SkipReason::NotTracked),
        Some(_) => None,
    }
}

fn read_error(document: &DocumentId, source: HostError) -> SyncError {
    match source {
        HostError::NotFound(_) => SyncError::DocumentMissing(document.clone()),
        source => SyncError::Read {
            document: document.clone(),
            source,
        },
    }
}

fn mutate_error(document: &DocumentId, source: HostError) -> SyncError {
    match source {
        HostError::NotFound(_) => SyncError::DocumentMissing(document.clone()),
        source => SyncError::Mutate {
            document: document.clone(),
            source,
        },
    }
}

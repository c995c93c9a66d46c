use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wordsync_core::{DocumentId, Header, WordCounter};
use wordsync_engine::{
    HeaderEdit, HeaderMutator, HostError, MetadataCache, SkipReason, SyncDriver, SyncError,
    SyncOutcome, TextReader,
};

#[derive(Default)]
struct MemoryVault {
    headers: Mutex<HashMap<DocumentId, Header>>,
    /// Headers reported by the cache in place of the stored ones.
    stale: Mutex<HashMap<DocumentId, Header>>,
    texts: Mutex<HashMap<DocumentId, String>>,
    writes: Mutex<usize>,
    fail_reads: bool,
}

impl MemoryVault {
    fn with(path: &str, header: Option<Value>, text: &str) -> Self {
        let vault = Self::default();
        if let Some(Value::Object(map)) = header {
            vault.headers.lock().unwrap().insert(doc(path), map);
        }
        vault.texts.lock().unwrap().insert(doc(path), text.to_string());
        vault
    }

    /// Deletes the file but leaves the cached header behind.
    fn delete_text(&self, path: &str) {
        self.texts.lock().unwrap().remove(&doc(path));
    }

    /// Keeps reporting `header` for `path` whatever is stored.
    fn pin_stale(&self, path: &str, header: Value) {
        if let Value::Object(map) = header {
            self.stale.lock().unwrap().insert(doc(path), map);
        }
    }

    fn stored_value(&self, path: &str) -> Option<Value> {
        self.headers.lock().unwrap().get(&doc(path)).cloned().map(Value::Object)
    }

    fn header_value(&self, path: &str) -> Option<Value> {
        self.header(&doc(path)).map(Value::Object)
    }

    fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl TextReader for MemoryVault {
    async fn read(&self, document: &DocumentId) -> Result<String, HostError> {
        if self.fail_reads {
            return Err(HostError::Io {
                document: document.clone(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        self.texts
            .lock()
            .unwrap()
            .get(document)
            .cloned()
            .ok_or_else(|| HostError::NotFound(document.clone()))
    }
}

#[async_trait::async_trait]
impl MetadataCache for MemoryVault {
    fn header(&self, document: &DocumentId) -> Option<Header> {
        if let Some(stale) = self.stale.lock().unwrap().get(document) {
            return Some(stale.clone());
        }
        self.headers.lock().unwrap().get(document).cloned()
    }
}

#[async_trait::async_trait]
impl HeaderMutator for MemoryVault {
    async fn mutate_header(
        &self,
        document: &DocumentId,
        edit: HeaderEdit,
    ) -> Result<(), HostError> {
        if !self.texts.lock().unwrap().contains_key(document) {
            return Err(HostError::NotFound(document.clone()));
        }
        let mut headers = self.headers.lock().unwrap();
        let header = headers.entry(document.clone()).or_default();
        edit(header);
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

fn doc(path: &str) -> DocumentId {
    DocumentId::new(path)
}

#[tokio::test]
async fn tracked_field_is_set_to_word_count() {
    let vault = MemoryVault::with("a.md", Some(json!({ "word_count": 0 })), "Hello world");

    let outcome = SyncDriver::default()
        .sync_if_eligible(&vault, &doc("a.md"), "word_count")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::Updated {
            count: 2,
            previous: Some(json!(0)),
        }
    );
    assert_eq!(vault.header_value("a.md"), Some(json!({ "word_count": 2 })));
}

#[tokio::test]
async fn header_without_field_is_left_unchanged() {
    let vault = MemoryVault::with("a.md", Some(json!({ "title": "T" })), "Hello world");

    let outcome = SyncDriver::default()
        .sync_if_eligible(&vault, &doc("a.md"), "word_count")
        .await
        .unwrap();

    assert_eq!(outcome, SyncOutcome::Skipped(SkipReason::NotTracked));
    assert_eq!(vault.header_value("a.md"), Some(json!({ "title": "T" })));
    assert_eq!(vault.writes(), 0);
}

#[tokio::test]
async fn document_without_header_is_skipped() {
    let vault = MemoryVault::with("a.md", None, "Hello world");

    let outcome = SyncDriver::default()
        .sync_now(&vault, &doc("a.md"), "word_count")
        .await
        .unwrap();

    assert_eq!(outcome, SyncOutcome::Skipped(SkipReason::NoHeader));
    assert_eq!(vault.writes(), 0);
}

#[tokio::test]
async fn only_the_tracked_key_is_written() {
    let vault = MemoryVault::with(
        "a.md",
        Some(json!({ "title": "T", "tags": ["x"], "word_count": "stale", "done": true })),
        "---\ntitle: T\n---\none two three four",
    );

    SyncDriver::default()
        .sync_now(&vault, &doc("a.md"), "word_count")
        .await
        .unwrap();

    assert_eq!(
        vault.header_value("a.md"),
        Some(json!({ "title": "T", "tags": ["x"], "word_count": 4, "done": true }))
    );
}

#[tokio::test]
async fn custom_property_name_is_honoured() {
    let vault = MemoryVault::with(
        "a.md",
        Some(json!({ "word_count": 1, "words": null })),
        "a b c",
    );

    SyncDriver::default()
        .sync_if_eligible(&vault, &doc("a.md"), "words")
        .await
        .unwrap();

    assert_eq!(
        vault.header_value("a.md"),
        Some(json!({ "word_count": 1, "words": 3 }))
    );
}

#[tokio::test]
async fn vanished_document_aborts_without_writing() {
    let vault = MemoryVault::with("a.md", Some(json!({ "word_count": 0 })), "text");
    vault.delete_text("a.md");

    let err = SyncDriver::default()
        .sync_now(&vault, &doc("a.md"), "word_count")
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::DocumentMissing(ref missing) if *missing == doc("a.md")));
    assert_eq!(vault.writes(), 0);
    assert_eq!(vault.header_value("a.md"), Some(json!({ "word_count": 0 })));
}

#[tokio::test]
async fn read_failure_is_reported_and_nothing_written() {
    let mut vault = MemoryVault::with("a.md", Some(json!({ "word_count": 0 })), "text");
    vault.fail_reads = true;

    let err = SyncDriver::default()
        .sync_if_eligible(&vault, &doc("a.md"), "word_count")
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Read { .. }));
    assert_eq!(vault.writes(), 0);
    assert_eq!(vault.header_value("a.md"), Some(json!({ "word_count": 0 })));
}

#[tokio::test]
async fn remove_property_deletes_only_the_tracked_key() {
    let vault = MemoryVault::with(
        "a.md",
        Some(json!({ "title": "T", "word_count": 9 })),
        "text",
    );
    let driver = SyncDriver::default();

    let outcome = driver
        .remove_property(&vault, &doc("a.md"), "word_count")
        .await
        .unwrap();
    assert_eq!(outcome, SyncOutcome::Removed);
    assert_eq!(vault.header_value("a.md"), Some(json!({ "title": "T" })));

    let outcome = driver
        .remove_property(&vault, &doc("a.md"), "word_count")
        .await
        .unwrap();
    assert_eq!(outcome, SyncOutcome::Skipped(SkipReason::NotTracked));
}

struct FixedCounter(u32);

impl WordCounter for FixedCounter {
    fn count(&self, _text: &str) -> u32 {
        self.0
    }
}

#[tokio::test]
async fn driver_uses_injected_counter() {
    let vault = MemoryVault::with("a.md", Some(json!({ "word_count": 0 })), "ignored");
    let driver = SyncDriver::new(Arc::new(FixedCounter(42)));

    driver
        .sync_now(&vault, &doc("a.md"), "word_count")
        .await
        .unwrap();

    assert_eq!(vault.header_value("a.md"), Some(json!({ "word_count": 42 })));
}

#[tokio::test]
async fn field_dropped_since_the_snapshot_is_not_reinserted() {
    let vault = MemoryVault::with("a.md", Some(json!({ "title": "t" })), "Hello world");
    vault.pin_stale("a.md", json!({ "title": "t", "word_count": 0 }));
    let driver = SyncDriver::default();

    let outcome = driver
        .sync_if_eligible(&vault, &doc("a.md"), "word_count")
        .await
        .unwrap();
    assert_eq!(outcome, SyncOutcome::Skipped(SkipReason::NotTracked));

    let outcome = driver
        .remove_property(&vault, &doc("a.md"), "word_count")
        .await
        .unwrap();
    assert_eq!(outcome, SyncOutcome::Skipped(SkipReason::NotTracked));
    assert_eq!(vault.stored_value("a.md"), Some(json!({ "title": "t" })));
}

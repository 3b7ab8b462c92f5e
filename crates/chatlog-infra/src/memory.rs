//! Process-local document store.
//!
//! Backs `serve --memory` and tests. Documents live in a `DashMap` keyed by
//! a UUID v7 `_id`, so "first match" on lookup is the oldest document.
//! Like the hosted store, nothing enforces `sessionId` uniqueness.

use std::sync::atomic::{AtomicUsize, Ordering};

use chatlog_core::store::{DocumentPatch, DocumentStore, DocumentType, NewDocument, StoredDocument};
use chatlog_types::error::StoreError;
use dashmap::DashMap;
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryDocumentStore {
    docs: DashMap<String, Map<String, Value>>,
    operations: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store calls (find, create, patch) served so far.
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::Relaxed)
    }

    /// Number of documents of a type.
    pub fn count(&self, doc_type: DocumentType) -> usize {
        self.docs
            .iter()
            .filter(|entry| type_of(entry.value()) == Some(doc_type.as_str()))
            .count()
    }

    fn record(&self) {
        self.operations.fetch_add(1, Ordering::Relaxed);
    }
}

fn type_of(doc: &Map<String, Value>) -> Option<&str> {
    doc.get("_type").and_then(Value::as_str)
}

impl DocumentStore for InMemoryDocumentStore {
    async fn find_by_session(
        &self,
        doc_type: DocumentType,
        session_id: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        self.record();
        let hit = self
            .docs
            .iter()
            .filter(|entry| {
                type_of(entry.value()) == Some(doc_type.as_str())
                    && entry.value().get("sessionId").and_then(Value::as_str) == Some(session_id)
            })
            .min_by(|a, b| a.key().cmp(b.key()))
            .map(|entry| entry.value().clone());

        hit.map(|doc| StoredDocument::from_value(Value::Object(doc)))
            .transpose()
    }

    async fn create(&self, document: NewDocument) -> Result<StoredDocument, StoreError> {
        self.record();
        let Value::Object(mut body) = document.to_value() else {
            return Err(StoreError::Serialization("document is not an object".to_string()));
        };
        let id = Uuid::now_v7().to_string();
        body.insert("_id".to_string(), Value::from(id.clone()));
        self.docs.insert(id.clone(), body.clone());
        tracing::debug!(document_id = %id, doc_type = %document.doc_type, "Created in-memory document");
        Ok(StoredDocument { id, body })
    }

    async fn patch(&self, patch: DocumentPatch) -> Result<(), StoreError> {
        self.record();
        let mut doc = self
            .docs
            .get_mut(&patch.id)
            .ok_or_else(|| StoreError::NotFound(patch.id.clone()))?;
        doc.extend(patch.set);
        Ok(())
    }
}

//! Store selection.
//!
//! `DocumentStore` uses RPITIT and is not object-safe, so the configured
//! backend is picked once at startup and dispatched through an enum.

use chatlog_core::store::{DocumentPatch, DocumentStore, DocumentType, NewDocument, StoredDocument};
use chatlog_types::config::{StoreBackend, StoreConfig};
use chatlog_types::error::StoreError;
use secrecy::SecretString;

use crate::memory::InMemoryDocumentStore;
use crate::sanity::SanityClient;

pub enum ConfiguredStore {
    Sanity(SanityClient),
    Memory(InMemoryDocumentStore),
}

impl ConfiguredStore {
    /// Build the backend named by `config.backend`, or the in-memory store
    /// when `force_memory` is set.
    pub fn from_config(
        config: &StoreConfig,
        token: Option<SecretString>,
        force_memory: bool,
    ) -> Result<Self, StoreError> {
        if force_memory || config.backend == StoreBackend::Memory {
            tracing::info!("Using in-memory document store");
            return Ok(Self::Memory(InMemoryDocumentStore::new()));
        }
        if token.is_none() {
            tracing::warn!("No store token set, writes to Sanity will likely be rejected");
        }
        let client = SanityClient::from_config(config, token)?;
        tracing::info!(dataset = %config.dataset, "Using Sanity document store");
        Ok(Self::Sanity(client))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Sanity(_) => "sanity",
            Self::Memory(_) => "memory",
        }
    }
}

impl DocumentStore for ConfiguredStore {
    async fn find_by_session(
        &self,
        doc_type: DocumentType,
        session_id: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        match self {
            Self::Sanity(s) => s.find_by_session(doc_type, session_id).await,
            Self::Memory(s) => s.find_by_session(doc_type, session_id).await,
        }
    }

    async fn create(&self, document: NewDocument) -> Result<StoredDocument, StoreError> {
        match self {
            Self::Sanity(s) => s.create(document).await,
            Self::Memory(s) => s.create(document).await,
        }
    }

    async fn patch(&self, patch: DocumentPatch) -> Result<(), StoreError> {
        match self {
            Self::Sanity(s) => s.patch(patch).await,
            Self::Memory(s) => s.patch(patch).await,
        }
    }
}

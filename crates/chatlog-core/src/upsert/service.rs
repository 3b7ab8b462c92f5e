//! Transcript service: the entry points the HTTP layer calls.
//!
//! Two entry points mirror the two routes that write transcripts:
//! - [`TranscriptService::log_transcript`] upserts the conversation only.
//! - [`TranscriptService::save_chat_message`] upserts the legacy chat
//!   session, then the conversation. The two writes are independent; if
//!   the second fails the first stays written.

use chatlog_types::conversation::Conversation;
use chatlog_types::error::{StoreError, UpsertError};
use chatlog_types::session::LegacyChatSession;
use chatlog_types::transcript::LogRequest;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::store::{DocumentStore, DocumentType};
use crate::upsert::conversation::upsert_conversation;
use crate::upsert::legacy::upsert_legacy_session;
use crate::upsert::{TranscriptBatch, UpsertOutcome};

/// Result of the dual-write path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualUpsertOutcome {
    pub legacy: UpsertOutcome,
    pub conversation: UpsertOutcome,
}

/// Orchestrates validation and the upserts against one document store.
///
/// Generic over `DocumentStore` and `Clock` so core never depends on infra.
pub struct TranscriptService<S: DocumentStore, C: Clock> {
    store: S,
    clock: C,
}

impl<S: DocumentStore, C: Clock> TranscriptService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Access the document store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Upsert the conversation document for the request's session.
    ///
    /// Validation failures return before any store call.
    pub async fn log_transcript(&self, request: &LogRequest) -> Result<UpsertOutcome, UpsertError> {
        let batch = validate(request)?;
        Ok(upsert_conversation(&self.store, &self.clock, batch).await?)
    }

    /// Upsert the legacy chat session, then the conversation.
    pub async fn save_chat_message(
        &self,
        request: &LogRequest,
    ) -> Result<DualUpsertOutcome, UpsertError> {
        let batch = validate(request)?;
        let legacy = upsert_legacy_session(&self.store, &self.clock, batch).await?;
        let conversation = upsert_conversation(&self.store, &self.clock, batch).await?;
        Ok(DualUpsertOutcome {
            legacy,
            conversation,
        })
    }

    /// Read back the conversation for a session, if one exists.
    pub async fn find_conversation(
        &self,
        session_id: &str,
    ) -> Result<Option<Conversation>, StoreError> {
        self.store
            .find_by_session(DocumentType::Conversation, session_id)
            .await?
            .map(|doc| doc.into_typed())
            .transpose()
    }

    /// Read back the legacy chat session for a session, if one exists.
    pub async fn find_legacy_session(
        &self,
        session_id: &str,
    ) -> Result<Option<LegacyChatSession>, StoreError> {
        self.store
            .find_by_session(DocumentType::ChatSession, session_id)
            .await?
            .map(|doc| doc.into_typed())
            .transpose()
    }
}

fn validate(request: &LogRequest) -> Result<TranscriptBatch<'_>, UpsertError> {
    info!(
        email = request.email.as_deref().unwrap_or(""),
        session_id = request.session_id.as_deref().unwrap_or(""),
        message_count = request.message_count(),
        "Transcript received"
    );
    TranscriptBatch::from_request(request).inspect_err(|_| {
        warn!(
            has_email = request.email.as_deref().is_some_and(|s| !s.is_empty()),
            has_session_id = request.session_id.as_deref().is_some_and(|s| !s.is_empty()),
            message_count = request.message_count(),
            "Transcript validation failed"
        );
    })
}

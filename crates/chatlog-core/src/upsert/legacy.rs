//! Legacy `chatSession` document upsert.
//!
//! Same check-then-act as the conversation path, against the older shape.
//! `lastActivityAt` is the write time, not the last message's timestamp, and
//! `messageHistory` stores messages as received (message ids included).

use chatlog_types::error::StoreError;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::store::{DocumentPatch, DocumentStore, DocumentType, NewDocument};
use crate::upsert::{TranscriptBatch, UpsertOutcome};

pub async fn upsert_legacy_session<S, C>(
    store: &S,
    clock: &C,
    batch: TranscriptBatch<'_>,
) -> Result<UpsertOutcome, StoreError>
where
    S: DocumentStore,
    C: Clock,
{
    let existing = store
        .find_by_session(DocumentType::ChatSession, batch.session_id)
        .await?;

    let now = clock.now_iso();
    let history = serde_json::to_value(batch.messages)?;

    match existing {
        Some(doc) => {
            debug!(
                session_id = batch.session_id,
                document_id = %doc.id,
                "Patching legacy chat session"
            );
            let patch = DocumentPatch::new(doc.id.as_str())
                .set("lastActivityAt", now)
                .set("messageHistory", history);
            store.patch(patch).await?;
            info!(session_id = batch.session_id, document_id = %doc.id, "Legacy chat session patched");
            Ok(UpsertOutcome::Patched { id: doc.id })
        }
        None => {
            let document = NewDocument::new(DocumentType::ChatSession)
                .field("email", batch.email)
                .field("sessionId", batch.session_id)
                .field("startedAt", now.clone())
                .field("lastActivityAt", now)
                .field("messageHistory", history);
            let created = store.create(document).await?;
            info!(
                session_id = batch.session_id,
                document_id = %created.id,
                "Legacy chat session created"
            );
            Ok(UpsertOutcome::Created { id: created.id })
        }
    }
}

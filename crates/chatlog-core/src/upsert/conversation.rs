//! Conversation document upsert.

use chatlog_types::conversation::{ConversationMessage, ConversationStatus};
use chatlog_types::error::StoreError;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::ids;
use crate::store::{DocumentPatch, DocumentStore, DocumentType, NewDocument};
use crate::upsert::{TranscriptBatch, UpsertOutcome};

/// Materialize `batch` into the session's conversation document.
///
/// - Hit: set `lastMessageAt`, replace `messages` wholesale, set
///   `status = active`. `startedAt`, `email` and `metadata` are untouched.
/// - Miss: create with `startedAt = now` plus the identifying fields.
pub async fn upsert_conversation<S, C>(
    store: &S,
    clock: &C,
    batch: TranscriptBatch<'_>,
) -> Result<UpsertOutcome, StoreError>
where
    S: DocumentStore,
    C: Clock,
{
    let now = clock.now_iso();
    let last_message_at = batch.last_timestamp_or(&now);
    let messages = serde_json::to_value(conversation_messages(&batch, clock.now_millis()))?;

    let existing = store
        .find_by_session(DocumentType::Conversation, batch.session_id)
        .await?;

    match existing {
        Some(doc) => {
            debug!(
                session_id = batch.session_id,
                document_id = %doc.id,
                "Patching existing conversation"
            );
            let patch = DocumentPatch::new(doc.id.as_str())
                .set("lastMessageAt", last_message_at)
                .set("messages", messages)
                .set("status", ConversationStatus::Active.to_string());
            store.patch(patch).await?;
            info!(
                session_id = batch.session_id,
                document_id = %doc.id,
                message_count = batch.messages.len(),
                "Conversation patched"
            );
            Ok(UpsertOutcome::Patched { id: doc.id })
        }
        None => {
            debug!(session_id = batch.session_id, "Creating new conversation");
            let mut document = NewDocument::new(DocumentType::Conversation)
                .field("email", batch.email)
                .field("sessionId", batch.session_id)
                .field("status", ConversationStatus::Active.to_string())
                .field("startedAt", now)
                .field("lastMessageAt", last_message_at)
                .field("messages", messages);
            if let Some(metadata) = batch.metadata {
                document = document.field("metadata", serde_json::to_value(metadata)?);
            }
            let created = store.create(document).await?;
            info!(
                session_id = batch.session_id,
                document_id = %created.id,
                message_count = batch.messages.len(),
                "Conversation created"
            );
            Ok(UpsertOutcome::Created { id: created.id })
        }
    }
}

/// Project the batch into stored entries, keyed by message id or a
/// generated key.
fn conversation_messages(batch: &TranscriptBatch<'_>, now_millis: i64) -> Vec<ConversationMessage> {
    batch
        .messages
        .iter()
        .map(|m| {
            let key = m
                .message_id
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| ids::message_key(now_millis));
            ConversationMessage::from_transcript(m, key)
        })
        .collect()
}

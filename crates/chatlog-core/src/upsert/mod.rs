//! Create-or-update of session transcripts into the document store.
//!
//! Both record shapes follow the same check-then-act sequence: fetch by
//! `sessionId`, then patch the hit or create a new document. The sequence is
//! not atomic. Two concurrent first-time upserts for one session can both
//! observe "no document" and both create, leaving duplicates. This is a
//! known defect of the stored data model and is left as is.

pub mod conversation;
pub mod legacy;
pub mod service;

use chatlog_types::conversation::ConversationMetadata;
use chatlog_types::error::UpsertError;
use chatlog_types::message::TranscriptMessage;
use chatlog_types::transcript::LogRequest;

/// A validated upsert input borrowed from a [`LogRequest`].
#[derive(Debug, Clone, Copy)]
pub struct TranscriptBatch<'a> {
    pub email: &'a str,
    pub session_id: &'a str,
    pub messages: &'a [TranscriptMessage],
    pub metadata: Option<&'a ConversationMetadata>,
}

impl<'a> TranscriptBatch<'a> {
    /// Validate a request: email, session id and messages must all be
    /// present and non-empty.
    pub fn from_request(request: &'a LogRequest) -> Result<Self, UpsertError> {
        let email = request
            .email
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(UpsertError::MissingFields)?;
        let session_id = request
            .session_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(UpsertError::MissingFields)?;
        let messages = request
            .messages
            .as_deref()
            .filter(|m| !m.is_empty())
            .ok_or(UpsertError::MissingFields)?;

        Ok(Self {
            email,
            session_id,
            messages,
            metadata: request.metadata.as_ref().filter(|m| !m.is_empty()),
        })
    }

    /// Timestamp of the last message, or `fallback` when it is empty.
    pub fn last_timestamp_or(&self, fallback: &str) -> String {
        self.messages
            .last()
            .map(|m| m.timestamp.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// What an upsert did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created { id: String },
    Patched { id: String },
}

impl UpsertOutcome {
    pub fn id(&self) -> &str {
        match self {
            UpsertOutcome::Created { id } | UpsertOutcome::Patched { id } => id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, UpsertOutcome::Created { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlog_types::message::MessageRole;

    fn msg(ts: &str) -> TranscriptMessage {
        TranscriptMessage::new(MessageRole::User, "hi", ts, "m1")
    }

    #[test]
    fn validation_rejects_each_missing_field() {
        let full = LogRequest::new("a@b.com", "s1", vec![msg("t")]);
        assert!(TranscriptBatch::from_request(&full).is_ok());

        let mut no_email = full.clone();
        no_email.email = Some(String::new());
        assert!(TranscriptBatch::from_request(&no_email).is_err());

        let mut no_session = full.clone();
        no_session.session_id = None;
        assert!(TranscriptBatch::from_request(&no_session).is_err());

        let mut no_messages = full.clone();
        no_messages.messages = Some(Vec::new());
        assert!(matches!(
            TranscriptBatch::from_request(&no_messages),
            Err(UpsertError::MissingFields)
        ));
    }

    #[test]
    fn last_timestamp_falls_back_when_empty() {
        let req = LogRequest::new("a@b.com", "s1", vec![msg("t1"), msg("")]);
        let batch = TranscriptBatch::from_request(&req).unwrap();
        assert_eq!(batch.last_timestamp_or("now"), "now");

        let req = LogRequest::new("a@b.com", "s1", vec![msg(""), msg("t2")]);
        let batch = TranscriptBatch::from_request(&req).unwrap();
        assert_eq!(batch.last_timestamp_or("now"), "t2");
    }

    #[test]
    fn empty_metadata_is_dropped() {
        let mut req = LogRequest::new("a@b.com", "s1", vec![msg("t")]);
        req.metadata = Some(ConversationMetadata::default());
        let batch = TranscriptBatch::from_request(&req).unwrap();
        assert!(batch.metadata.is_none());
    }
}

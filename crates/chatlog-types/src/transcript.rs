//! Wire contract of the transcript logging endpoints.
//!
//! ```json
//! POST /api/chat/log
//! { "email": "a@b.com", "sessionId": "s1", "messages": [ ... ] }
//!
//! 200 { "success": true }
//! 400 { "success": false, "error": "Missing required fields" }
//! ```

use serde::{Deserialize, Serialize};

use crate::conversation::ConversationMetadata;
use crate::message::TranscriptMessage;

/// Request body sent by the relay on every new message.
///
/// Every field is optional at the serde level so that a missing or `null`
/// field is reported as a validation failure rather than a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<TranscriptMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ConversationMetadata>,
}

impl LogRequest {
    /// Build a request carrying the full message history of a session.
    pub fn new(
        email: impl Into<String>,
        session_id: impl Into<String>,
        messages: Vec<TranscriptMessage>,
    ) -> Self {
        Self {
            email: Some(email.into()),
            session_id: Some(session_id.into()),
            messages: Some(messages),
            metadata: None,
        }
    }

    /// Number of messages carried, for logging.
    pub fn message_count(&self) -> usize {
        self.messages.as_ref().map_or(0, Vec::len)
    }
}

/// Structured result of a logging call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

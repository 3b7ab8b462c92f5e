//! Legacy chat session document.
//!
//! The older record shape, still written alongside conversations so the
//! admin studio keeps showing it. It duplicates conversation data with its
//! own write path and no reconciliation.

use serde::{Deserialize, Serialize};

use crate::message::TranscriptMessage;

/// Document `_type` of legacy session records.
pub const CHAT_SESSION_TYPE: &str = "chatSession";

/// Optional browser context on a legacy session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
}

/// A persisted legacy chat session document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyChatSession {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub session_id: String,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<String>,
    #[serde(default)]
    pub message_history: Vec<TranscriptMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SessionMetadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_session_keeps_message_ids() {
        let doc = serde_json::json!({
            "_id": "doc-1",
            "email": "a@b.com",
            "sessionId": "s1",
            "startedAt": "2024-01-01T00:00:00Z",
            "lastActivityAt": "2024-01-01T00:00:05Z",
            "messageHistory": [
                {"role": "user", "content": "hi", "timestamp": "2024-01-01T00:00:00Z", "messageId": "m1"}
            ],
            "metadata": {"referrer": "https://example.com"}
        });
        let session: LegacyChatSession = serde_json::from_value(doc).unwrap();
        assert_eq!(session.message_history[0].message_id.as_deref(), Some("m1"));
        assert_eq!(
            session.metadata.unwrap().referrer.as_deref(),
            Some("https://example.com")
        );
    }
}

//! Transcript logging handlers.
//!
//! Endpoints:
//! - POST /api/chat/log     - upsert the conversation for a session
//! - POST /api/chat/session - upsert the legacy chat session, then the conversation
//!
//! The body is parsed by hand so malformed JSON yields the same
//! `{ success: false, error }` shape as a validation failure.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::USER_AGENT;

use chatlog_types::conversation::ConversationMetadata;
use chatlog_types::transcript::{LogRequest, LogResponse};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/chat/log
pub async fn log_transcript(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<LogResponse>, AppError> {
    let request = parse_request(&headers, &body)?;
    let outcome = state.transcript_service.log_transcript(&request).await?;
    tracing::debug!(document_id = outcome.id(), created = outcome.is_created(), "Conversation logged");
    Ok(Json(LogResponse::ok()))
}

/// POST /api/chat/session
pub async fn save_chat_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<LogResponse>, AppError> {
    let request = parse_request(&headers, &body)?;
    let outcome = state.transcript_service.save_chat_message(&request).await?;
    tracing::debug!(
        legacy_id = outcome.legacy.id(),
        conversation_id = outcome.conversation.id(),
        "Chat session saved"
    );
    Ok(Json(LogResponse::ok()))
}

fn parse_request(headers: &HeaderMap, body: &[u8]) -> Result<LogRequest, AppError> {
    let mut request: LogRequest = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Rejected malformed transcript body");
        AppError::MalformedBody(e.to_string())
    })?;
    fill_metadata(&mut request, headers);
    Ok(request)
}

/// Fill `userAgent` and `ipAddress` from request headers where the body
/// left them unset.
fn fill_metadata(request: &mut LogRequest, headers: &HeaderMap) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let user_agent = header(USER_AGENT.as_str());
    let ip_address = header("x-forwarded-for").and_then(|v| {
        v.split(',')
            .next()
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(str::to_string)
    });

    let metadata = request.metadata.get_or_insert_with(ConversationMetadata::default);
    if metadata.user_agent.is_none() {
        metadata.user_agent = user_agent;
    }
    if metadata.ip_address.is_none() {
        metadata.ip_address = ip_address;
    }
    if metadata.is_empty() {
        request.metadata = None;
    }
}

//! Outbound ports of the relay: delivery to the backend and local storage.

use chatlog_types::error::RelayError;
use chatlog_types::transcript::LogRequest;

/// Delivers a session's full history to the logging endpoint.
///
/// Implemented by `HttpTranscriptSink` in chatlog-infra.
pub trait TranscriptSink: Send + Sync {
    /// POST the request. Any non-success status is an error.
    fn deliver(
        &self,
        request: &LogRequest,
    ) -> impl std::future::Future<Output = Result<(), RelayError>> + Send;
}

/// Persistent single-value storage for the captured user email.
///
/// Implemented by `FileEmailStore` in chatlog-infra.
pub trait EmailStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<Option<String>, RelayError>> + Send;

    fn save(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<(), RelayError>> + Send;
}

//! HTTP delivery of relay transcripts to the logging endpoint.

use chatlog_core::relay::TranscriptSink;
use chatlog_types::error::RelayError;
use chatlog_types::transcript::LogRequest;

/// POSTs `LogRequest` bodies as JSON to a fixed endpoint.
pub struct HttpTranscriptSink {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTranscriptSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("chatlog-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

impl TranscriptSink for HttpTranscriptSink {
    async fn deliver(&self, request: &LogRequest) -> Result<(), RelayError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        tracing::debug!(
            endpoint = %self.endpoint,
            messages = request.message_count(),
            "Transcript delivered"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use chatlog_types::message::{MessageRole, TranscriptMessage};
    use serde_json::{Value, json};

    use super::*;

    type Received = Arc<Mutex<Vec<Value>>>;

    async fn spawn(status: StatusCode) -> (String, Received) {
        let received: Received = Arc::default();
        let app = Router::new()
            .route(
                "/api/chat/log",
                post(
                    move |State(rx): State<Received>, Json(body): Json<Value>| async move {
                        rx.lock().unwrap().push(body);
                        (status, Json(json!({"success": status.is_success()})))
                    },
                ),
            )
            .with_state(received.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/api/chat/log"), received)
    }

    fn request() -> LogRequest {
        LogRequest::new(
            "a@b.com",
            "s1",
            vec![TranscriptMessage::new(
                MessageRole::User,
                "hi",
                "2024-01-01T00:00:00.000Z",
                "m1",
            )],
        )
    }

    #[tokio::test]
    async fn posts_camel_case_body() {
        let (endpoint, received) = spawn(StatusCode::OK).await;
        let sink = HttpTranscriptSink::new(endpoint);
        sink.deliver(&request()).await.unwrap();

        let bodies = received.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["email"], "a@b.com");
        assert_eq!(bodies[0]["sessionId"], "s1");
        assert_eq!(bodies[0]["messages"][0]["messageId"], "m1");
    }

    #[tokio::test]
    async fn non_success_status_is_error() {
        let (endpoint, _received) = spawn(StatusCode::INTERNAL_SERVER_ERROR).await;
        let sink = HttpTranscriptSink::new(endpoint);
        let err = sink.deliver(&request()).await.unwrap_err();
        assert!(matches!(err, RelayError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let sink = HttpTranscriptSink::new("http://127.0.0.1:1/api/chat/log");
        let err = sink.deliver(&request()).await.unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)));
    }
}

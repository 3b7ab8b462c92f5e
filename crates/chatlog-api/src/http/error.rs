//! Application error type mapping to HTTP status codes and the
//! `{ success: false, error }` body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use chatlog_types::error::{StoreError, UpsertError};
use chatlog_types::transcript::LogResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Missing or empty required fields.
    Validation(String),
    /// Body is not valid JSON or has the wrong shape.
    MalformedBody(String),
    /// Document store failure.
    Store(StoreError),
}

impl From<UpsertError> for AppError {
    fn from(e: UpsertError) -> Self {
        match e {
            UpsertError::MissingFields => AppError::Validation(e.to_string()),
            UpsertError::Store(e) => AppError::Store(e),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Validation(msg) => msg,
            AppError::MalformedBody(msg) => format!("Invalid request body: {msg}"),
            AppError::Store(e) => {
                tracing::error!(error = %e, "Transcript write failed");
                e.to_string()
            }
        };

        (status, Json(LogResponse::failure(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlog_types::error::MISSING_REQUIRED_FIELDS;

    #[test]
    fn upsert_errors_map_to_status() {
        assert_eq!(
            AppError::from(UpsertError::MissingFields).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(UpsertError::Store(StoreError::Connection("down".into()))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_keeps_message() {
        match AppError::from(UpsertError::MissingFields) {
            AppError::Validation(msg) => assert_eq!(msg, MISSING_REQUIRED_FIELDS),
            other => panic!("unexpected: {other:?}"),
        }
    }
}

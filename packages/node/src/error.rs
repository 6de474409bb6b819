//! Application-level error type returned by handlers.
//!
//! All variants serialise to the [`ErrorResponse`] envelope
//! (`{success: false, text, timestamp}`) and map to an HTTP status code.

use amity::ValidationError;
use amity_api::ErrorResponse;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::engine::EngineError;

/// An error that a handler can return; converts directly to an HTTP response.
#[derive(Debug)]
pub enum AppError {
    /// Invalid input or a rejected relation rule (400).
    BadRequest(String),
    /// Undecodable body or storage failure (500).
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, text) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorResponse::new(text))).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Storage(inner) => AppError::Internal(inner.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Internal(e.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    #[test]
    fn relation_rules_are_bad_requests() {
        let e = AppError::from(EngineError::AlreadyBlocked);
        assert!(matches!(e, AppError::BadRequest(ref m) if m == "target email has already being blocked"));

        let e = AppError::from(EngineError::UserNotFound("x@y.com".into()));
        assert!(matches!(e, AppError::BadRequest(_)));
    }

    #[test]
    fn storage_failures_are_internal() {
        let e = AppError::from(EngineError::Storage(StorageError::Internal("disk full".into())));
        assert!(matches!(e, AppError::Internal(ref m) if m.contains("disk full")));
    }

    #[test]
    fn response_status_codes() {
        let resp = AppError::BadRequest("nope".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = AppError::Internal("boom".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

//! API error types and their HTTP response mapping.

use crate::libs::messages::Message;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failure taxonomy of the HTTP API.
///
/// Every failure is surfaced directly to the caller; there are no retries
/// and no partial-failure states.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing required field or invalid enum value.
    #[error("{0}")]
    Validation(String),

    /// Delete target absent.
    #[error("{0}")]
    NotFound(String),

    /// Underlying store fault.
    #[error("{0}")]
    Storage(String),
}

/// Generic failure body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn validation(message: Message) -> Self {
        Self::Validation(message.to_string())
    }

    pub fn not_found(message: Message) -> Self {
        Self::NotFound(message.to_string())
    }

    pub fn storage(message: Message) -> Self {
        Self::Storage(message.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Controller failures become storage errors; the outermost context message
/// is what reaches the client, the cause chain stays internal.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::validation(Message::MissingRequiredParams).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::not_found(Message::RecordNotFound).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::storage(Message::DbError).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_display_matches_messages() {
        assert_eq!(ApiError::validation(Message::MissingRequiredParams).to_string(), "缺少必需参数");
        assert_eq!(ApiError::not_found(Message::RecordNotFound).to_string(), "记录不存在");
        assert_eq!(ApiError::validation(Message::InvalidRecordType).to_string(), "无效的记录类型");
    }

    #[test]
    fn test_controller_error_keeps_context_message() {
        let err = anyhow::anyhow!("no such table: sleep_records").context(Message::UpdateFailed);
        let api = ApiError::from(err);
        assert_eq!(api.to_string(), "更新失败");
        assert_eq!(api.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::db::StoreError;

pub const NOT_FOUND_MESSAGE: &str = "TODO item not found";
pub const INVALID_PAGING_STATE_MESSAGE: &str = "Invalid paging state";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message) | Self::NotFound(message) | Self::Internal(message) => {
                message.as_str()
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::not_found(NOT_FOUND_MESSAGE),
            StoreError::InvalidPagingState => AppError::bad_request(INVALID_PAGING_STATE_MESSAGE),
            // Store errors reach the caller verbatim.
            StoreError::Backend(message) => AppError::internal(message),
        }
    }
}

pub(crate) fn log_app_error(err: &AppError, status: StatusCode) {
    tracing::error!(status = status.as_u16(), error = %err, "request failed");
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log_app_error(&self, status);
        }
        let body = Json(ErrorBody {
            error: self.message().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use uuid::Uuid;

    use super::{AppError, NOT_FOUND_MESSAGE};
    use crate::db::StoreError;

    #[test]
    fn not_found_uses_fixed_message() {
        let err = AppError::from(StoreError::NotFound { id: Uuid::now_v7() });

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), NOT_FOUND_MESSAGE);
    }

    #[test]
    fn backend_errors_keep_their_message() {
        let err = AppError::from(StoreError::Backend("replica timeout".to_string()));

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "replica timeout");
    }

    #[test]
    fn invalid_paging_state_is_a_client_error() {
        let response = AppError::from(StoreError::InvalidPagingState).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

use crate::application::lending::LendingError;
use crate::domain::ValidationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    Lending(LendingError),
    /// リクエスト本文やクエリの形式が不正
    BadRequest(String),
    NotFound(String),
}

impl From<LendingError> for ApiError {
    fn from(err: LendingError) -> Self {
        ApiError::Lending(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Lending(LendingError::InvalidArgument(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            // 400 Bad Request - 入力値が不正
            ApiError::Lending(LendingError::InvalidArgument(e)) => {
                (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", e.to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),

            // 404 Not Found - リクエストされたリソースが存在しない
            ApiError::Lending(e @ LendingError::DocumentNotFound(_)) => {
                (StatusCode::NOT_FOUND, "DOCUMENT_NOT_FOUND", e.to_string())
            }
            ApiError::Lending(e @ LendingError::NotCurrentlyBorrowed(_)) => (
                StatusCode::NOT_FOUND,
                "NOT_CURRENTLY_BORROWED",
                e.to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),

            // 409 Conflict - 資料は貸出中
            ApiError::Lending(e @ LendingError::AlreadyBorrowed(_)) => {
                (StatusCode::CONFLICT, "ALREADY_BORROWED", e.to_string())
            }

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ApiError::Lending(LendingError::StorageError(e)) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Failed to access loan storage".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}

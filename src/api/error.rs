use crate::application::{ApplicationError, ErrorKind};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーと、境界での入力検証エラーを扱う。
#[derive(Debug)]
pub enum ApiError {
    Application(ApplicationError),
    /// ヘッダー・クエリ・ボディの検証エラー（アプリケーション層に届かない）
    InvalidRequest(String),
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        ApiError::Application(err)
    }
}

// 抽出器の拒否はすべて400として {error, message} の形で返す

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

/// エラー分類からHTTPステータスとエラーコードを決める
fn status_and_code(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::BadRequest => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        ErrorKind::UnsupportedState => (StatusCode::BAD_REQUEST, "UNSUPPORTED_STATE"),
        ErrorKind::CommentBadRequest => (StatusCode::BAD_REQUEST, "COMMENT_NOT_ALLOWED"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::InvalidRequest(message) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
            }
            ApiError::Application(err) => {
                let (status, code) = status_and_code(err.kind());

                let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
                    // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                    match std::error::Error::source(&err) {
                        Some(source) => tracing::error!("{}: {}", err, source),
                        None => tracing::error!("{}", err),
                    }
                    "An unexpected error occurred".to_string()
                } else {
                    tracing::debug!(code, "request failed: {}", err);
                    err.to_string()
                };

                (status, code, message)
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApplicationError::UserNotFound(UserId::new(1));
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unsupported_state_maps_to_400() {
        let err = ApplicationError::UnsupportedState("UNKNOWN".to_string());
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_duplicate_email_maps_to_409() {
        let err = ApplicationError::EmailAlreadyExists("a@b.c".to_string());
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_repository_error_maps_to_500() {
        let err = ApplicationError::RepositoryError("connection refused".into());
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

/// Error types for vidtube-service
///
/// Every handler-level failure is converted to the uniform error envelope
/// `{ statusCode, message, success: false, errors: [] }` and the request
/// terminates. Missing entities are always reported as 404, ownership
/// mismatches as 403, malformed input as 400.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for vidtube-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Media storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Internal detail (SQL text, connection errors) stays in the logs.
        let message = match self {
            AppError::Database(e) => {
                tracing::error!("database error: {e}");
                "Internal server error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(status).json(serde_json::json!({
            "statusCode": status.as_u16(),
            "message": message,
            "success": false,
            "errors": [],
        }))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    fn envelope(err: AppError) -> serde_json::Value {
        let resp = err.error_response();
        let body = resp.into_body().try_into_bytes().unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Storage("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Database(sqlx::Error::PoolClosed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_envelope_has_uniform_shape() {
        let body = envelope(AppError::NotFound("Video not found".into()));
        assert_eq!(body["statusCode"], 404);
        assert_eq!(body["message"], "Not found: Video not found");
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"], serde_json::json!([]));
    }

    #[test]
    fn database_detail_is_not_leaked() {
        let body = envelope(AppError::Database(sqlx::Error::PoolClosed));
        assert_eq!(body["statusCode"], 500);
        assert_eq!(body["message"], "Internal server error");
    }
}

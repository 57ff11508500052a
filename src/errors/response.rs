use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use crate::errors::AppError;

// Every error becomes a status code plus a `{ "message": ... }` body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),

            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),

            AppError::UsernameTaken => (StatusCode::BAD_REQUEST, self.to_string()),

            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),

            AppError::Validation(msg) | AppError::Upload(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            // Internal failures keep their detail in the log only
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::File(e) => {
                tracing::error!("File error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "File storage error".to_string())
            }
            AppError::Hash(e) => {
                tracing::error!("Password hashing error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Token(e) => {
                tracing::error!("Token issuance error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Blocking(e) => {
                tracing::error!("spawn_blocking join error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::InvalidCredentials.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::UsernameTaken.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("Employee x".into()).into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Validation("bad".into()).into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized("no".into()).into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_detail_not_leaked() {
        let err = AppError::File(std::io::Error::new(std::io::ErrorKind::Other, "/secret/path"));
        let body = body_json(err.into_response()).await;
        assert_eq!(body["message"], "File storage error");
    }

    #[tokio::test]
    async fn test_message_body() {
        let body = body_json(AppError::UsernameTaken.into_response()).await;
        assert_eq!(body["message"], "Username already exists");
    }
}

// Domain error type shared by services and handlers, plus a result alias.
use axum::extract::rejection::{JsonRejection, QueryRejection};
use thiserror::Error;

pub mod response;

#[derive(Error, Debug)]
pub enum AppError {
    // Same variant and message for unknown user and wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Background task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

// Malformed request bodies and query strings are caller errors
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    pub fn employee_not_found(id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("Employee {}", id))
    }
}

// Custom result type
pub type AppResult<T> = Result<T, AppError>;

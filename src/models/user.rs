use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash, never the plaintext
}

/// JWT payload carried by bearer tokens.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String, // username
    pub jti: String, // unique token id
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

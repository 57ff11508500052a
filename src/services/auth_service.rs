use bcrypt::{hash, verify};
use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;
use crate::errors::{AppError, AppResult};
use crate::models::{Claims, User};
use super::{repository::UserRepository, token::TokenIssuer};

const DUMMY_PASSWORD: &str = "employee-portal-dummy-password";

// bcrypt is CPU-bound; keep it off the async workers
async fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_owned();
    Ok(tokio::task::spawn_blocking(move || hash(password, cost)).await??)
}

async fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    Ok(tokio::task::spawn_blocking(move || verify(password, &password_hash)).await??)
}

/// Registration, login and token validation.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenIssuer>,
    bcrypt_cost: u32,
    // Verified against for unknown usernames so both failures cost the same
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenIssuer>, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> AppResult<()> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Validation("Username and password are required".into()));
        }

        if self.users.find_by_username(username).await?.is_some() {
            tracing::info!("Registration rejected, username taken: {}", username);
            return Err(AppError::UsernameTaken);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: hash_password(password, self.bcrypt_cost).await?,
        };

        // The UNIQUE constraint still catches a concurrent registration
        self.users.insert_user(&user).await?;

        tracing::info!("Registered user: {}", username);
        Ok(())
    }

    pub async fn login(&self, username: &str, password: &str) -> AppResult<String> {
        tracing::info!("Login attempt for user: {}", username);

        let user = match self.users.find_by_username(username.trim()).await? {
            Some(user) => user,
            None => {
                let dummy = self
                    .dummy_hash
                    .get_or_try_init(|| hash_password(DUMMY_PASSWORD, self.bcrypt_cost))
                    .await?;
                verify_password(password, dummy).await?;
                tracing::info!("Login failed for user: {}", username);
                return Err(AppError::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash).await? {
            tracing::info!("Login failed for user: {}", username);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.username)?;
        tracing::info!("Login successful for user: {}", user.username);
        Ok(token)
    }

    pub fn validate(&self, token: &str) -> AppResult<Claims> {
        self.tokens.validate(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::sqlite_store::tests::memory_store;

    async fn auth_service() -> AuthService {
        let config = Config::for_tests("unused");
        let store = Arc::new(memory_store().await);
        AuthService::new(
            store,
            Arc::new(TokenIssuer::new(&config.auth)),
            config.auth.bcrypt_cost,
        )
    }

    #[tokio::test]
    async fn test_register_twice_fails() {
        let auth = auth_service().await;
        auth.register("alice", "password123").await.unwrap();

        let second = auth.register("alice", "other-password").await;
        assert!(matches!(second, Err(AppError::UsernameTaken)));
    }

    #[tokio::test]
    async fn test_password_is_hashed() {
        let config = Config::for_tests("unused");
        let store = Arc::new(memory_store().await);
        let auth = AuthService::new(store.clone(), Arc::new(TokenIssuer::new(&config.auth)), 4);
        auth.register("alice", "password123").await.unwrap();

        let user = store.find_by_username("alice").await.unwrap().unwrap();
        assert_ne!(user.password_hash, "password123");
        assert!(verify("password123", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_login_issues_valid_token() {
        let auth = auth_service().await;
        auth.register("alice", "password123").await.unwrap();

        let token = auth.login("alice", "password123").await.unwrap();
        let claims = auth.validate(&token).unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let auth = auth_service().await;
        auth.register("alice", "password123").await.unwrap();

        let wrong_password = auth.login("alice", "nope").await.unwrap_err();
        let unknown_user = auth.login("mallory", "password123").await.unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_user, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_unknown_user_still_verifies_a_hash() {
        let auth = auth_service().await;
        assert!(auth.dummy_hash.get().is_none());

        let result = auth.login("mallory", "password123").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));

        let dummy = auth.dummy_hash.get().unwrap();
        assert!(dummy.starts_with("$2"));
        assert!(verify(DUMMY_PASSWORD, dummy).unwrap());
    }

    #[tokio::test]
    async fn test_blocking_hash_helpers() {
        let hashed = hash_password("password123", 4).await.unwrap();
        assert!(verify_password("password123", &hashed).await.unwrap());
        assert!(!verify_password("wrong", &hashed).await.unwrap());
        assert!(matches!(
            verify_password("password123", "not-a-hash").await,
            Err(AppError::Hash(_))
        ));
    }

    #[tokio::test]
    async fn test_register_requires_credentials() {
        let auth = auth_service().await;
        assert!(matches!(auth.register("  ", "pw").await, Err(AppError::Validation(_))));
        assert!(matches!(auth.register("bob", "").await, Err(AppError::Validation(_))));
    }
}

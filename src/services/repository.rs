use async_trait::async_trait;
use uuid::Uuid;
use crate::errors::AppResult;
use crate::models::{Employee, SearchQuery, User};

/// Credential storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Fails with `AppError::UsernameTaken` when the username already exists.
    async fn insert_user(&self, user: &User) -> AppResult<()>;
}

/// Employee record storage. Listing order is insertion order unless a
/// search asks for a salary sort.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Employee>>;

    async fn get(&self, id: Uuid) -> AppResult<Option<Employee>>;

    async fn insert(&self, employee: &Employee) -> AppResult<()>;

    /// Returns false when no row matched.
    async fn update(&self, employee: &Employee) -> AppResult<bool>;

    /// Returns false when no row matched.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn set_image_path(&self, id: Uuid, image_path: Option<&str>) -> AppResult<bool>;

    async fn search(&self, query: &SearchQuery) -> AppResult<Vec<Employee>>;
}

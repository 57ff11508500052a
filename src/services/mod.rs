mod repository;
mod sqlite_store;
mod token;
mod auth_service;
mod image_store;
mod employee_service;
mod export_service;

pub use repository::{EmployeeRepository, UserRepository};
pub use sqlite_store::SqliteStore;
pub use token::TokenIssuer;
pub use auth_service::AuthService;
pub use image_store::{ImageStore, IMAGE_URL_PREFIX};
pub use employee_service::EmployeeService;
pub use export_service::ExportService;

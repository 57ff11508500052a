mod user;
mod forms;
mod employee;

pub use user::{User, Claims};
pub use forms::{CredentialsForm, TokenResponse, MessageResponse, ImageUploadResponse, SearchForm};
pub use employee::{Employee, EmployeeFields, SearchQuery, SortOrder};

mod auth;
mod employees;

pub use auth::{handle_login, handle_register};
pub use employees::{
    add_employee, delete_employee, export_employees, get_employee, list_employees,
    search_employees, update_employee, upload_image,
};

use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

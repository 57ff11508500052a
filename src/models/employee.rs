use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub salary: f64,
    pub image_path: Option<String>,
}

impl Employee {
    pub fn new(fields: EmployeeFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            salary: fields.salary,
            image_path: None,
        }
    }

    /// Full replace of the mutable fields. The image path is left alone.
    pub fn apply(&mut self, fields: EmployeeFields) {
        self.name = fields.name;
        self.email = fields.email;
        self.phone = fields.phone;
        self.salary = fields.salary;
    }
}

/// Body of add and update requests.
#[derive(Debug, Deserialize, Clone)]
pub struct EmployeeFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub salary: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Insertion order
    #[default]
    Natural,
    SalaryAsc,
    SalaryDesc,
}

impl SortOrder {
    // Only the exact strings "asc" and "desc" select a salary sort.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("asc") => SortOrder::SalaryAsc,
            Some("desc") => SortOrder::SalaryDesc,
            _ => SortOrder::Natural,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub min_salary: Option<f64>,
    pub sort: SortOrder,
}

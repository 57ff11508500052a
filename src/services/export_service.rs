use std::fmt::Write;
use std::sync::Arc;
use crate::errors::AppResult;
use crate::models::Employee;
use super::repository::EmployeeRepository;

const CSV_HEADER: &str = "Id,Name,Email,Phone,Salary,imagePath";

#[derive(Clone)]
pub struct ExportService {
    repo: Arc<dyn EmployeeRepository>,
}

impl ExportService {
    pub fn new(repo: Arc<dyn EmployeeRepository>) -> Self {
        Self { repo }
    }

    /// Full snapshot of every record as UTF-8 CSV.
    pub async fn export_csv(&self) -> AppResult<Vec<u8>> {
        let employees = self.repo.list().await?;
        tracing::info!("Exporting {} employees to CSV", employees.len());
        Ok(render_csv(&employees).into_bytes())
    }
}

pub fn render_csv(employees: &[Employee]) -> String {
    let mut out = String::with_capacity(64 * (employees.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for e in employees {
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{},{},{},{},{},{}",
            e.id,
            escape(&e.name),
            escape(&e.email),
            escape(&e.phone),
            e.salary,
            escape(e.image_path.as_deref().unwrap_or("")),
        );
    }

    out
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

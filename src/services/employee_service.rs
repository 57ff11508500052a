use std::sync::Arc;
use uuid::Uuid;
use crate::errors::{AppError, AppResult};
use crate::models::{Employee, EmployeeFields, SearchQuery};
use super::{image_store::ImageStore, repository::EmployeeRepository};

/// CRUD, search and image attachment for employee records.
#[derive(Clone)]
pub struct EmployeeService {
    repo: Arc<dyn EmployeeRepository>,
    images: ImageStore,
}

impl EmployeeService {
    pub fn new(repo: Arc<dyn EmployeeRepository>, images: ImageStore) -> Self {
        Self { repo, images }
    }

    pub async fn list(&self) -> AppResult<Vec<Employee>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Option<Employee>> {
        self.repo.get(id).await
    }

    pub async fn create(&self, fields: EmployeeFields) -> AppResult<Employee> {
        validate_fields(&fields)?;

        let employee = Employee::new(fields);
        self.repo.insert(&employee).await?;

        tracing::info!("Created employee {}", employee.id);
        Ok(employee)
    }

    pub async fn update(&self, id: Uuid, fields: EmployeeFields) -> AppResult<Employee> {
        validate_fields(&fields)?;

        let mut employee = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::employee_not_found(id))?;
        employee.apply(fields);

        if !self.repo.update(&employee).await? {
            // Deleted between the read and the write
            return Err(AppError::employee_not_found(id));
        }

        tracing::info!("Updated employee {}", id);
        Ok(employee)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let employee = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::employee_not_found(id))?;

        if !self.repo.delete(id).await? {
            return Err(AppError::employee_not_found(id));
        }

        if let Some(image_path) = &employee.image_path {
            self.images.remove(image_path).await;
        }

        tracing::info!("Deleted employee {}", id);
        Ok(())
    }

    pub async fn search(&self, query: &SearchQuery) -> AppResult<Vec<Employee>> {
        tracing::debug!("Searching employees: {:?}", query);
        self.repo.search(query).await
    }

    /// Replaces the record's image. Not atomic: the old file is deleted before
    /// the new one is written and the row updated.
    pub async fn attach_image(&self, id: Uuid, bytes: &[u8], filename: &str) -> AppResult<String> {
        let extension = self.images.validate(filename, bytes.len())?;

        let employee = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::employee_not_found(id))?;

        if let Some(previous) = &employee.image_path {
            self.images.remove(previous).await;
        }

        let image_path = self.images.save(bytes, &extension).await?;

        if !self.repo.set_image_path(id, Some(&image_path)).await? {
            self.images.remove(&image_path).await;
            return Err(AppError::employee_not_found(id));
        }

        tracing::info!("Attached image {} to employee {}", image_path, id);
        Ok(image_path)
    }
}

fn validate_fields(fields: &EmployeeFields) -> AppResult<()> {
    if !fields.salary.is_finite() || fields.salary < 0.0 {
        return Err(AppError::Validation("Salary must be a non-negative number".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortOrder;
    use crate::services::sqlite_store::tests::memory_store;
    use tempfile::TempDir;

    const MIB: usize = 1024 * 1024;

    async fn service() -> (EmployeeService, TempDir) {
        let dir = TempDir::new().unwrap();
        let images = ImageStore::new(dir.path(), 5 * MIB);
        let service = EmployeeService::new(Arc::new(memory_store().await), images);
        (service, dir)
    }

    fn fields(name: &str, salary: f64) -> EmployeeFields {
        EmployeeFields {
            name: name.into(),
            email: "someone@example.com".into(),
            phone: "555-0100".into(),
            salary,
        }
    }

    #[tokio::test]
    async fn test_create_get_update() {
        let (service, _dir) = service().await;
        let created = service.create(fields("Alice", 60000.0)).await.unwrap();
        assert!(created.image_path.is_none());

        assert_eq!(service.get(created.id).await.unwrap(), Some(created.clone()));

        let updated = service.update(created.id, fields("Alice Smith", 61000.0)).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Alice Smith");
        assert_eq!(service.get(created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_missing_records_are_not_found() {
        let (service, _dir) = service().await;
        let id = Uuid::new_v4();

        assert!(service.get(id).await.unwrap().is_none());
        assert!(matches!(service.update(id, fields("X", 1.0)).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_negative_salary_rejected() {
        let (service, _dir) = service().await;
        assert!(matches!(service.create(fields("X", -1.0)).await, Err(AppError::Validation(_))));
        assert!(matches!(service.create(fields("X", f64::NAN)).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_search_delegates_filters() {
        let (service, _dir) = service().await;
        service.create(fields("Alice", 60000.0)).await.unwrap();
        service.create(fields("Bob", 45000.0)).await.unwrap();
        service.create(fields("Dana", 90000.0)).await.unwrap();

        let query = SearchQuery {
            min_salary: Some(50000.0),
            sort: SortOrder::SalaryDesc,
            ..Default::default()
        };
        let found = service.search(&query).await.unwrap();
        let salaries: Vec<f64> = found.iter().map(|e| e.salary).collect();
        assert_eq!(salaries, vec![90000.0, 60000.0]);
    }

    #[tokio::test]
    async fn test_attach_image_validation() {
        let (service, _dir) = service().await;
        let employee = service.create(fields("Alice", 60000.0)).await.unwrap();

        let gif = service.attach_image(employee.id, b"GIF89a", "photo.gif").await;
        assert!(matches!(gif, Err(AppError::Validation(_))));

        let too_big = vec![0u8; 6 * MIB];
        let png = service.attach_image(employee.id, &too_big, "photo.png").await;
        assert!(matches!(png, Err(AppError::Validation(_))));

        assert!(service.get(employee.id).await.unwrap().unwrap().image_path.is_none());
    }

    #[tokio::test]
    async fn test_attach_image_success_and_replace() {
        let (service, dir) = service().await;
        let employee = service.create(fields("Alice", 60000.0)).await.unwrap();

        let jpg = vec![0xFFu8; MIB];
        let first = service.attach_image(employee.id, &jpg, "photo.jpg").await.unwrap();
        assert!(first.starts_with("/images/") && first.ends_with(".jpg"));
        assert_eq!(
            service.get(employee.id).await.unwrap().unwrap().image_path.as_deref(),
            Some(first.as_str())
        );

        let second = service.attach_image(employee.id, b"png", "photo.PNG").await.unwrap();
        assert_ne!(first, second);

        // Only the replacement is left on disk
        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
        assert_eq!(
            service.get(employee.id).await.unwrap().unwrap().image_path,
            Some(second)
        );
    }

    #[tokio::test]
    async fn test_attach_image_unknown_employee() {
        let (service, dir) = service().await;
        let result = service.attach_image(Uuid::new_v4(), b"png", "photo.png").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_image() {
        let (service, dir) = service().await;
        let employee = service.create(fields("Alice", 60000.0)).await.unwrap();
        service.attach_image(employee.id, b"png", "photo.png").await.unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

        service.delete(employee.id).await.unwrap();
        assert!(service.get(employee.id).await.unwrap().is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

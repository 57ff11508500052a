use async_trait::async_trait;
use sqlx::{
    sqlite::{SqlitePool, SqlitePoolOptions},
    QueryBuilder, Sqlite,
};
use std::time::Duration;
use uuid::Uuid;
use crate::config::DatabaseConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{Employee, SearchQuery, SortOrder, User};
use super::repository::{EmployeeRepository, UserRepository};

const EMPLOYEE_COLUMNS: &str = "id, name, email, phone, salary, image_path";

// SQLite's lower() only folds ASCII, so names are folded here instead
fn fold(name: &str) -> String {
    name.to_lowercase()
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the pool and applies the embedded migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let mut options = SqlitePoolOptions::new().max_connections(config.max_connections);

        // An in-memory database lives only as long as its connection
        if config.url.contains(":memory:") {
            options = options
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = options.connect(&config.url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!("Connected to database: {}", config.url);
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> AppResult<()> {
        let result = sqlx::query("INSERT INTO users (id, username, password_hash) VALUES (?, ?, ?)")
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::UsernameTaken),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl EmployeeRepository for SqliteStore {
    async fn list(&self) -> AppResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM employees ORDER BY rowid",
            EMPLOYEE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM employees WHERE id = ?",
            EMPLOYEE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn insert(&self, employee: &Employee) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO employees (id, name, name_folded, email, phone, salary, image_path)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(employee.id)
        .bind(&employee.name)
        .bind(fold(&employee.name))
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(employee.salary)
        .bind(&employee.image_path)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, employee: &Employee) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE employees
             SET name = ?, name_folded = ?, email = ?, phone = ?, salary = ?
             WHERE id = ?",
        )
        .bind(&employee.name)
        .bind(fold(&employee.name))
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(employee.salary)
        .bind(employee.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_image_path(&self, id: Uuid, image_path: Option<&str>) -> AppResult<bool> {
        let result = sqlx::query("UPDATE employees SET image_path = ? WHERE id = ?")
            .bind(image_path)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, query: &SearchQuery) -> AppResult<Vec<Employee>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM employees WHERE 1 = 1",
            EMPLOYEE_COLUMNS
        ));

        // instr() rather than LIKE so '%' and '_' in the input match literally
        if let Some(name) = query.name.as_deref().filter(|n| !n.is_empty()) {
            builder
                .push(" AND instr(name_folded, ")
                .push_bind(fold(name))
                .push(") > 0");
        }

        if let Some(min_salary) = query.min_salary {
            builder.push(" AND salary >= ").push_bind(min_salary);
        }

        builder.push(match query.sort {
            SortOrder::Natural => " ORDER BY rowid",
            SortOrder::SalaryAsc => " ORDER BY salary ASC, rowid",
            SortOrder::SalaryDesc => " ORDER BY salary DESC, rowid",
        });

        tracing::debug!("Employee search SQL: {}", builder.sql());

        let employees = builder
            .build_query_as::<Employee>()
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }
}

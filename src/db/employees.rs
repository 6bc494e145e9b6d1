use crate::models::Employee;
use sqlx::SqlitePool;
use tracing::info;

pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an employee by ID
    pub async fn get(&self, id: i64) -> Result<Option<Employee>, sqlx::Error> {
        sqlx::query_as::<_, Employee>("SELECT id, name FROM employees WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// List all employees in registration order
    pub async fn list(&self) -> Result<Vec<Employee>, sqlx::Error> {
        sqlx::query_as::<_, Employee>("SELECT id, name FROM employees ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    /// Register a new employee
    pub async fn create(&self, name: &str) -> Result<Employee, sqlx::Error> {
        let result = sqlx::query("INSERT INTO employees (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        info!("Created employee {} ({})", id, name);
        self.get(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Rename an employee. Returns false if no such employee.
    pub async fn update_name(&self, id: i64, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE employees SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!("Renamed employee {} to {}", id, name);
        }
        Ok(updated)
    }

    /// Delete an employee along with their leaves and every replacement row
    /// they appear in, on either side. Returns false if no such employee.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query("DELETE FROM leaves WHERE employee_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "DELETE FROM replacements WHERE employee_on_leave_id = ? OR replacement_employee_id = ?",
        )
        .bind(id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted employee {}", id);
        }
        Ok(deleted)
    }

    /// Total headcount, the denominator of the leave quota
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }
}

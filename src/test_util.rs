use crate::db::{EmployeeRepository, LeaveRepository, ReplacementRepository};
use crate::AppState;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

/// In-memory pool with the full schema, mirroring the startup migrations.
/// Capped at one connection: every `sqlite::memory:` connection is its own
/// database.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE leaves (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            employee_id INTEGER NOT NULL REFERENCES employees(id)
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE replacements (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_on_leave_id INTEGER NOT NULL REFERENCES employees(id),
            replacement_employee_id INTEGER NOT NULL,
            date TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    pool
}

pub async fn test_state() -> AppState {
    let pool = create_test_pool().await;
    AppState {
        employee_repo: Arc::new(EmployeeRepository::new(pool.clone())),
        leave_repo: Arc::new(LeaveRepository::new(pool.clone())),
        replacement_repo: Arc::new(ReplacementRepository::new(pool)),
    }
}

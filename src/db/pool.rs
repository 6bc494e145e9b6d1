use sqlx::SqlitePool;
use tracing::info;

#[derive(Clone)]
pub struct DbPool(SqlitePool);

impl DbPool {
    pub async fn new(db_path: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path)).await?;
        Ok(Self(pool))
    }

    pub fn inner(&self) -> &SqlitePool {
        &self.0
    }
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    info!("Running database migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
    "#,
    )
    .execute(pool.inner())
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS leaves (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            employee_id INTEGER NOT NULL REFERENCES employees(id)
        )
    "#,
    )
    .execute(pool.inner())
    .await?;

    // replacement_employee_id intentionally has no FK; the employee-delete
    // cascade removes rows on both sides.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS replacements (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_on_leave_id INTEGER NOT NULL REFERENCES employees(id),
            replacement_employee_id INTEGER NOT NULL,
            date TEXT NOT NULL
        )
    "#,
    )
    .execute(pool.inner())
    .await?;

    info!("Database migrations completed");
    Ok(())
}

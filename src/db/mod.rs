pub use employees::EmployeeRepository;
pub use leaves::LeaveRepository;
pub use pool::DbPool;
pub use replacements::ReplacementRepository;

mod employees;
mod leaves;
mod pool;
mod replacements;

use chrono::NaiveDate;

pub type Database = DbPool;

/// Storage format for all leave/replacement dates, matching the wire format.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap_or(NaiveDate::MIN)
}

pub async fn init_db(db_path: &str) -> Result<Database, sqlx::Error> {
    let db = Database::new(db_path).await?;

    pool::run_migrations(&db).await?;

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_db_creates_file_and_tables() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("leave_test.db");

        let db = init_db(path.to_str().unwrap()).await.unwrap();
        assert!(path.exists());

        // Migrations are idempotent and tables accept rows
        pool::run_migrations(&db).await.unwrap();
        sqlx::query("INSERT INTO employees (name) VALUES (?)")
            .bind("Alice")
            .execute(db.inner())
            .await
            .unwrap();
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-05"),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
        assert_eq!(parse_date("not a date"), NaiveDate::MIN);
    }
}

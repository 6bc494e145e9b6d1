use crate::db::{parse_date, DATE_FORMAT};
use crate::models::{Replacement, ReplacementRecord};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

pub struct ReplacementRepository {
    pool: SqlitePool,
}

impl ReplacementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Assign a covering employee for a leave
    pub async fn create(
        &self,
        employee_on_leave_id: i64,
        replacement_employee_id: i64,
        date: NaiveDate,
    ) -> Result<Replacement, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO replacements (employee_on_leave_id, replacement_employee_id, date)
             VALUES (?, ?, ?)",
        )
        .bind(employee_on_leave_id)
        .bind(replacement_employee_id)
        .bind(date.format(DATE_FORMAT).to_string())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(
            "Assigned employee {} to cover {} on {}",
            replacement_employee_id, employee_on_leave_id, date
        );
        self.get(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Get a replacement by ID
    pub async fn get(&self, id: i64) -> Result<Option<Replacement>, sqlx::Error> {
        let row = sqlx::query_as::<_, ReplacementRow>(
            "SELECT id, employee_on_leave_id, replacement_employee_id, date
             FROM replacements WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_replacement()))
    }

    /// The `/get_replacements` feed: names resolved, rows in insertion
    /// order, dates passed through as stored
    pub async fn list_records(&self) -> Result<Vec<ReplacementRecord>, sqlx::Error> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT away.name, cover.name, r.date FROM replacements r
             JOIN employees away ON away.id = r.employee_on_leave_id
             JOIN employees cover ON cover.id = r.replacement_employee_id
             ORDER BY r.id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(employee_on_leave, replacement_employee, date)| ReplacementRecord {
                employee_on_leave,
                replacement_employee,
                date,
            })
            .collect())
    }

    /// Find the replacement assigned for an employee's leave on a date
    pub async fn find_for(
        &self,
        employee_on_leave_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Replacement>, sqlx::Error> {
        let row = sqlx::query_as::<_, ReplacementRow>(
            "SELECT id, employee_on_leave_id, replacement_employee_id, date
             FROM replacements WHERE employee_on_leave_id = ? AND date = ?",
        )
        .bind(employee_on_leave_id)
        .bind(date.format(DATE_FORMAT).to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_replacement()))
    }

    /// Check whether an employee is already covering someone on a date
    pub async fn is_assigned_on(
        &self,
        replacement_employee_id: i64,
        date: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM replacements WHERE replacement_employee_id = ? AND date = ?",
        )
        .bind(replacement_employee_id)
        .bind(date.format(DATE_FORMAT).to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0 > 0)
    }

    /// Check for the inverse assignment: the proposed replacement is on
    /// leave that date with the requester covering them
    pub async fn mutual_exists(
        &self,
        employee_id: i64,
        replacement_employee_id: i64,
        date: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM replacements
             WHERE employee_on_leave_id = ? AND replacement_employee_id = ? AND date = ?",
        )
        .bind(replacement_employee_id)
        .bind(employee_id)
        .bind(date.format(DATE_FORMAT).to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0 > 0)
    }

    /// Move a replacement to a new date (follows its leave)
    pub async fn update_date(&self, id: i64, date: NaiveDate) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE replacements SET date = ? WHERE id = ?")
            .bind(date.format(DATE_FORMAT).to_string())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete the replacement tied to an employee's leave on a date
    pub async fn delete_for(
        &self,
        employee_on_leave_id: i64,
        date: NaiveDate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM replacements WHERE employee_on_leave_id = ? AND date = ?")
            .bind(employee_on_leave_id)
            .bind(date.format(DATE_FORMAT).to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Raw database row for replacements
#[derive(sqlx::FromRow)]
struct ReplacementRow {
    id: i64,
    employee_on_leave_id: i64,
    replacement_employee_id: i64,
    date: String,
}

impl ReplacementRow {
    fn into_replacement(self) -> Replacement {
        Replacement {
            id: self.id,
            employee_on_leave_id: self.employee_on_leave_id,
            replacement_employee_id: self.replacement_employee_id,
            date: parse_date(&self.date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::EmployeeRepository;
    use crate::test_util::create_test_pool;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_list_records_resolves_names_in_insertion_order() {
        let pool = create_test_pool().await;
        let employees = EmployeeRepository::new(pool.clone());
        let repo = ReplacementRepository::new(pool);

        let alice = employees.create("Alice").await.unwrap();
        let bob = employees.create("Bob").await.unwrap();
        let carol = employees.create("Carol").await.unwrap();

        repo.create(alice.id, bob.id, d("2024-01-05")).await.unwrap();
        repo.create(carol.id, alice.id, d("2024-01-02")).await.unwrap();

        let records = repo.list_records().await.unwrap();
        assert_eq!(records.len(), 2);
        // Insertion order, not date order
        assert_eq!(
            records[0],
            ReplacementRecord {
                employee_on_leave: "Alice".to_string(),
                replacement_employee: "Bob".to_string(),
                date: "2024-01-05".to_string(),
            }
        );
        assert_eq!(records[1].employee_on_leave, "Carol");
        assert_eq!(records[1].date, "2024-01-02");
    }

    #[tokio::test]
    async fn test_conflict_probes() {
        let pool = create_test_pool().await;
        let employees = EmployeeRepository::new(pool.clone());
        let repo = ReplacementRepository::new(pool);

        let alice = employees.create("Alice").await.unwrap();
        let bob = employees.create("Bob").await.unwrap();
        repo.create(alice.id, bob.id, d("2024-01-05")).await.unwrap();

        assert!(repo.is_assigned_on(bob.id, d("2024-01-05")).await.unwrap());
        assert!(!repo.is_assigned_on(bob.id, d("2024-01-06")).await.unwrap());
        assert!(!repo.is_assigned_on(alice.id, d("2024-01-05")).await.unwrap());

        // Bob asking Alice to cover him on the 5th is mutual
        assert!(repo
            .mutual_exists(bob.id, alice.id, d("2024-01-05"))
            .await
            .unwrap());
        assert!(!repo
            .mutual_exists(alice.id, bob.id, d("2024-01-05"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_find_update_delete() {
        let pool = create_test_pool().await;
        let employees = EmployeeRepository::new(pool.clone());
        let repo = ReplacementRepository::new(pool);

        let alice = employees.create("Alice").await.unwrap();
        let bob = employees.create("Bob").await.unwrap();
        repo.create(alice.id, bob.id, d("2024-01-05")).await.unwrap();

        let found = repo.find_for(alice.id, d("2024-01-05")).await.unwrap().unwrap();
        assert_eq!(found.employee_on_leave_id, alice.id);
        assert_eq!(found.replacement_employee_id, bob.id);
        assert_eq!(found.date, d("2024-01-05"));

        repo.update_date(found.id, d("2024-01-09")).await.unwrap();
        assert!(repo.find_for(alice.id, d("2024-01-05")).await.unwrap().is_none());
        assert!(repo.find_for(alice.id, d("2024-01-09")).await.unwrap().is_some());

        repo.delete_for(alice.id, d("2024-01-09")).await.unwrap();
        assert!(repo.find_for(alice.id, d("2024-01-09")).await.unwrap().is_none());
    }
}

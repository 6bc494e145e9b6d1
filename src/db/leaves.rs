use crate::db::{parse_date, DATE_FORMAT};
use crate::models::{Leave, LeaveEvent, ScheduleEntry};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

pub struct LeaveRepository {
    pool: SqlitePool,
}

impl LeaveRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a leave by ID
    pub async fn get(&self, id: i64) -> Result<Option<Leave>, sqlx::Error> {
        let row = sqlx::query_as::<_, LeaveRow>(
            "SELECT id, date, employee_id FROM leaves WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_leave()))
    }

    /// Record an approved leave
    pub async fn create(&self, employee_id: i64, date: NaiveDate) -> Result<Leave, sqlx::Error> {
        let result = sqlx::query("INSERT INTO leaves (date, employee_id) VALUES (?, ?)")
            .bind(date.format(DATE_FORMAT).to_string())
            .bind(employee_id)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        info!("Recorded leave {} for employee {} on {}", id, employee_id, date);
        self.get(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Number of leaves already recorded on a date, the numerator of the
    /// leave quota
    pub async fn count_on_date(&self, date: NaiveDate) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM leaves WHERE date = ?")
            .bind(date.format(DATE_FORMAT).to_string())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }

    /// Check whether an employee is on leave on a date
    pub async fn exists_for(&self, employee_id: i64, date: NaiveDate) -> Result<bool, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM leaves WHERE employee_id = ? AND date = ?",
        )
        .bind(employee_id)
        .bind(date.format(DATE_FORMAT).to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0 > 0)
    }

    /// Calendar feed: one event per leave, titled with the employee's name
    pub async fn list_events(&self) -> Result<Vec<LeaveEvent>, sqlx::Error> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT e.name, l.date FROM leaves l
             JOIN employees e ON e.id = l.employee_id
             ORDER BY l.id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(title, start)| LeaveEvent { title, start })
            .collect())
    }

    /// Leave schedule ordered by date, with the covering employee's name
    /// resolved per leave or the literal "No Replacement" fallback
    pub async fn schedule(&self) -> Result<Vec<ScheduleEntry>, sqlx::Error> {
        let rows: Vec<(i64, String, String, Option<String>)> = sqlx::query_as(
            "SELECT l.id, e.name, l.date, cover.name FROM leaves l
             JOIN employees e ON e.id = l.employee_id
             LEFT JOIN replacements r
                    ON r.employee_on_leave_id = l.employee_id AND r.date = l.date
             LEFT JOIN employees cover ON cover.id = r.replacement_employee_id
             ORDER BY l.date",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(leave_id, employee_name, date, cover)| ScheduleEntry {
                leave_id,
                employee_name,
                date,
                replacement_name: cover.unwrap_or_else(|| "No Replacement".to_string()),
            })
            .collect())
    }

    /// Move a leave to a new date. Returns false if no such leave.
    pub async fn update_date(&self, id: i64, date: NaiveDate) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE leaves SET date = ? WHERE id = ?")
            .bind(date.format(DATE_FORMAT).to_string())
            .bind(id)
            .execute(&self.pool)
            .await?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!("Moved leave {} to {}", id, date);
        }
        Ok(updated)
    }

    /// Delete a leave. Returns false if no such leave.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM leaves WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted leave {}", id);
        }
        Ok(deleted)
    }
}

/// Raw database row for leaves
#[derive(sqlx::FromRow)]
struct LeaveRow {
    id: i64,
    date: String,
    employee_id: i64,
}

impl LeaveRow {
    fn into_leave(self) -> Leave {
        Leave {
            id: self.id,
            date: parse_date(&self.date),
            employee_id: self.employee_id,
        }
    }
}

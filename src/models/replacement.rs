use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Replacement assignment from database. `replacement_employee_id` carries
/// no foreign key in the schema; the employee-delete cascade keeps both
/// sides consistent.
#[derive(Debug, Clone)]
pub struct Replacement {
    pub id: i64,
    pub employee_on_leave_id: i64,
    pub replacement_employee_id: i64,
    pub date: NaiveDate,
}

/// Wire shape of one entry in the `/get_replacements` feed. Names are
/// resolved server-side; the date is passed through as stored text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacementRecord {
    pub employee_on_leave: String,
    pub replacement_employee: String,
    pub date: String,
}

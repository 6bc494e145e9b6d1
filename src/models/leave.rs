use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Leave record from database
#[derive(Debug, Clone)]
pub struct Leave {
    pub id: i64,
    pub date: NaiveDate,
    pub employee_id: i64,
}

/// Request to take leave on one or more dates, naming who covers
#[derive(Debug, Deserialize)]
pub struct LeaveRequest {
    pub employee_id: i64,
    pub dates: Vec<String>,
    pub replacement_employee_id: i64,
}

/// Per-date outcome of a leave request
#[derive(Debug, Serialize)]
pub struct LeaveDecision {
    pub approved: Vec<String>,
    pub declined: Vec<String>,
}

/// Calendar event for the leaves feed
#[derive(Debug, Serialize)]
pub struct LeaveEvent {
    pub title: String,
    pub start: String,
}

/// One row of the leave schedule, joined with employee names
#[derive(Debug, Serialize)]
pub struct ScheduleEntry {
    pub leave_id: i64,
    pub employee_name: String,
    pub date: String,
    pub replacement_name: String,
}

/// Request to move a leave to a different date
#[derive(Debug, Deserialize)]
pub struct UpdateLeaveRequest {
    pub date: String,
}

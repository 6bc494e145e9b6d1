use serde::{Deserialize, Serialize};

/// Employee record from database
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i64,
    pub name: String,
}

/// Request to register a new employee
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: String,
}

/// Request to rename an employee
#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub name: String,
}

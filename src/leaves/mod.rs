use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;

use crate::db::DATE_FORMAT;
use crate::models::{Employee, LeaveDecision, LeaveRequest, UpdateLeaveRequest};
use crate::AppState;

pub fn routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", axum::routing::post(request_leave))
        .route("/schedule", axum::routing::get(schedule))
        .route(
            "/:id",
            axum::routing::put(edit_leave).delete(delete_leave),
        )
}

/// Company-wide cap: leaves already booked on a date must stay strictly
/// under 33% of headcount. Vacuously satisfied with no employees.
fn within_leave_limit(leaves_on_date: i64, total_employees: i64) -> bool {
    if total_employees == 0 {
        return true;
    }
    (leaves_on_date as f64) / (total_employees as f64) < 0.33
}

type ApiError = (StatusCode, Json<serde_json::Value>);

#[derive(Debug, thiserror::Error)]
enum LeaveRequestError {
    #[error("Employee {0} not found")]
    EmployeeNotFound(i64),
    #[error("Replacement employee {0} not found")]
    ReplacementNotFound(i64),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn db_error(e: sqlx::Error) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": "database_error",
            "message": e.to_string()
        })),
    )
}

/// POST /leaves
/// Request leave on one or more dates with a named covering employee.
/// Each date is approved or declined independently; a date is declined when
/// the company-wide quota is hit, the replacement is on leave themselves,
/// the assignment would be mutual, or the replacement already covers
/// someone else that day.
async fn request_leave(
    State(state): State<AppState>,
    Json(req): Json<LeaveRequest>,
) -> Result<Json<LeaveDecision>, ApiError> {
    let (employee, replacement, dates) = match validate_request(&state, &req).await {
        Ok(validated) => validated,
        Err(e) => {
            let (status, error_code) = match e {
                LeaveRequestError::EmployeeNotFound(_) => {
                    (StatusCode::NOT_FOUND, "employee_not_found")
                }
                LeaveRequestError::ReplacementNotFound(_) => {
                    (StatusCode::NOT_FOUND, "replacement_not_found")
                }
                LeaveRequestError::InvalidDate(_) => (StatusCode::BAD_REQUEST, "invalid_date"),
                LeaveRequestError::Database(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
                }
            };
            return Err((
                status,
                Json(serde_json::json!({
                    "error": error_code,
                    "message": e.to_string()
                })),
            ));
        }
    };

    let total_employees = state.employee_repo.count().await.map_err(db_error)?;

    let mut approved = Vec::new();
    let mut declined = Vec::new();

    for (raw, date) in dates {
        let leaves_on_date = state
            .leave_repo
            .count_on_date(date)
            .await
            .map_err(db_error)?;
        if !within_leave_limit(leaves_on_date, total_employees) {
            declined.push(raw);
            continue;
        }

        if state
            .leave_repo
            .exists_for(replacement.id, date)
            .await
            .map_err(db_error)?
        {
            declined.push(raw);
            continue;
        }

        if state
            .replacement_repo
            .mutual_exists(employee.id, replacement.id, date)
            .await
            .map_err(db_error)?
        {
            declined.push(raw);
            continue;
        }

        if state
            .replacement_repo
            .is_assigned_on(replacement.id, date)
            .await
            .map_err(db_error)?
        {
            declined.push(raw);
            continue;
        }

        state
            .leave_repo
            .create(employee.id, date)
            .await
            .map_err(db_error)?;
        state
            .replacement_repo
            .create(employee.id, replacement.id, date)
            .await
            .map_err(db_error)?;
        approved.push(raw);
    }

    Ok(Json(LeaveDecision { approved, declined }))
}

/// Resolve both parties and parse every date before any row is written;
/// one bad date rejects the whole request
async fn validate_request(
    state: &AppState,
    req: &LeaveRequest,
) -> Result<(Employee, Employee, Vec<(String, NaiveDate)>), LeaveRequestError> {
    let employee = state
        .employee_repo
        .get(req.employee_id)
        .await?
        .ok_or(LeaveRequestError::EmployeeNotFound(req.employee_id))?;

    let replacement = state
        .employee_repo
        .get(req.replacement_employee_id)
        .await?
        .ok_or(LeaveRequestError::ReplacementNotFound(
            req.replacement_employee_id,
        ))?;

    let mut dates = Vec::with_capacity(req.dates.len());
    for raw in &req.dates {
        let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_err(|_| LeaveRequestError::InvalidDate(raw.clone()))?;
        dates.push((raw.clone(), date));
    }

    Ok((employee, replacement, dates))
}

/// GET /get_leaves
/// Calendar feed of all recorded leaves
pub async fn get_leaves(State(state): State<AppState>) -> impl IntoResponse {
    match state.leave_repo.list_events().await {
        Ok(events) => Ok(Json(events)),
        Err(e) => Err(db_error(e)),
    }
}

/// GET /leaves/schedule
/// Leave schedule ordered by date, with covering employee names resolved
async fn schedule(State(state): State<AppState>) -> impl IntoResponse {
    match state.leave_repo.schedule().await {
        Ok(entries) => Ok(Json(entries)),
        Err(e) => Err(db_error(e)),
    }
}

/// PUT /leaves/:id (admin)
/// Move a leave to a new date; the replacement assignment follows it
async fn edit_leave(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateLeaveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let leave = state
        .leave_repo
        .get(id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| leave_not_found(id))?;

    let new_date = NaiveDate::parse_from_str(&req.date, DATE_FORMAT).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "invalid_date",
                "message": format!("Invalid date: {}", req.date)
            })),
        )
    })?;

    if let Some(replacement) = state
        .replacement_repo
        .find_for(leave.employee_id, leave.date)
        .await
        .map_err(db_error)?
    {
        state
            .replacement_repo
            .update_date(replacement.id, new_date)
            .await
            .map_err(db_error)?;
    }

    state
        .leave_repo
        .update_date(id, new_date)
        .await
        .map_err(db_error)?;

    Ok(Json(serde_json::json!({
        "leave_id": id,
        "date": new_date.format(DATE_FORMAT).to_string()
    })))
}

/// DELETE /leaves/:id (admin)
/// Remove a leave and its replacement assignment
async fn delete_leave(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let leave = state
        .leave_repo
        .get(id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| leave_not_found(id))?;

    state
        .replacement_repo
        .delete_for(leave.employee_id, leave.date)
        .await
        .map_err(db_error)?;
    state.leave_repo.delete(id).await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}

fn leave_not_found(id: i64) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "leave_not_found",
            "message": format!("Leave {} not found", id)
        })),
    )
}
